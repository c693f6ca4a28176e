//! Per-variable summaries
//!
//! Numerical variables get the moments and order statistics of
//! [`DescriptiveStats`]; categorical variables get a frequency table in
//! first-seen order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabstat_stats::descriptive::DescriptiveStats;

use crate::{
    AnalysisError,
    variable::{Variable, VariableKind, VariableValues},
};

/// Summary of one numerical variable (population dispersion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalSummary {
    pub variable: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

/// Occurrences of one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

/// Summary of one categorical variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub variable: String,
    pub count: usize,
    /// Value counts in first-seen order.
    pub frequencies: Vec<Frequency>,
    /// Most frequent value; ties go to the value seen first.
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableSummary {
    Numerical(NumericalSummary),
    Categorical(CategoricalSummary),
}

impl VariableSummary {
    /// Summarizes a variable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyColumn`] if the variable has no values,
    /// or [`AnalysisError::OutOfRange`] if its mean or variance is not
    /// representable as a finite `f64`.
    pub fn new(variable: &Variable) -> Result<Self, AnalysisError> {
        let empty = || AnalysisError::EmptyColumn {
            column: variable.name.clone(),
        };
        match &variable.values {
            VariableValues::Numerical(values) => {
                let stats = DescriptiveStats::new(values).ok_or_else(empty)?;
                if !(stats.mean.is_finite() && stats.variance.is_finite()) {
                    return Err(AnalysisError::OutOfRange {
                        column: variable.name.clone(),
                    });
                }
                Ok(VariableSummary::Numerical(NumericalSummary {
                    variable: variable.name.clone(),
                    count: stats.count,
                    mean: stats.mean,
                    median: stats.median,
                    mode: stats.mode,
                    std_dev: stats.std_dev,
                    variance: stats.variance,
                    min: stats.min,
                    max: stats.max,
                    q1: stats.q1,
                    q3: stats.q3,
                }))
            }
            VariableValues::Categorical(values) => {
                let summary = categorical_summary(&variable.name, values).ok_or_else(empty)?;
                Ok(VariableSummary::Categorical(summary))
            }
        }
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            VariableSummary::Numerical(s) => &s.variable,
            VariableSummary::Categorical(s) => &s.variable,
        }
    }

    #[must_use]
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableSummary::Numerical(_) => VariableKind::Numerical,
            VariableSummary::Categorical(_) => VariableKind::Categorical,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            VariableSummary::Numerical(s) => s.count,
            VariableSummary::Categorical(s) => s.count,
        }
    }
}

fn categorical_summary(name: &str, values: &[String]) -> Option<CategoricalSummary> {
    let mut index = HashMap::new();
    let mut frequencies: Vec<Frequency> = vec![];
    for value in values {
        let slot = *index.entry(value.as_str()).or_insert_with(|| {
            frequencies.push(Frequency {
                value: value.clone(),
                count: 0,
            });
            frequencies.len() - 1
        });
        frequencies[slot].count += 1;
    }

    // `max_by_key` keeps the last maximum, so scan in reverse
    let mode = frequencies
        .iter()
        .rev()
        .max_by_key(|f| f.count)?
        .value
        .clone();

    Some(CategoricalSummary {
        variable: name.to_owned(),
        count: values.len(),
        frequencies,
        mode,
    })
}

/// Summarizes every variable, in variable order.
///
/// # Errors
///
/// Returns the error of the first variable that cannot be summarized.
pub fn describe(variables: &[Variable]) -> Result<Vec<VariableSummary>, AnalysisError> {
    variables.iter().map(VariableSummary::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawCell;

    fn variable(cells: &[&str]) -> Variable {
        let cells = cells.iter().map(|c| RawCell::from(*c)).collect::<Vec<_>>();
        Variable::from_cells("v", &cells)
    }

    #[test]
    fn test_numerical_summary() {
        let summary = VariableSummary::new(&variable(&["4", "1", "3", "2", "5"])).unwrap();
        let VariableSummary::Numerical(s) = summary else {
            panic!("expected numerical summary");
        };
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert_eq!((s.min, s.max), (1.0, 5.0));
        assert_eq!((s.q1, s.q3), (2.0, 4.0));
        assert!((s.variance - 2.0).abs() < 1e-12);
        // every value unique: the minimum
        assert_eq!(s.mode, 1.0);
    }

    #[test]
    fn test_extreme_values() {
        let summary = VariableSummary::new(&variable(&["1e308"; 12])).unwrap();
        let VariableSummary::Numerical(s) = summary else {
            panic!("expected numerical summary");
        };
        assert_eq!((s.mean, s.median, s.max), (1e308, 1e308, 1e308));
        assert_eq!((s.variance, s.std_dev), (0.0, 0.0));

        let err = VariableSummary::new(&variable(&["-1e200", "1e200", "-1e200", "1e200"]))
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::OutOfRange {
                column: "v".into()
            }
        );
    }

    #[test]
    fn test_categorical_first_seen_order() {
        let summary =
            VariableSummary::new(&variable(&["b", "a", "b", "c", "a", ""])).unwrap();
        let VariableSummary::Categorical(s) = summary else {
            panic!("expected categorical summary");
        };
        assert_eq!(s.count, 5);
        let values = s
            .frequencies
            .iter()
            .map(|f| (f.value.as_str(), f.count))
            .collect::<Vec<_>>();
        assert_eq!(values, vec![("b", 2), ("a", 2), ("c", 1)]);
        assert_eq!(s.mode, "b");
    }

    #[test]
    fn test_empty_variable_is_error() {
        let err = VariableSummary::new(&variable(&["", " "])).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyColumn {
                column: "v".into()
            }
        );
    }

    #[test]
    fn test_order_statistics_are_ordered() {
        let summary =
            VariableSummary::new(&variable(&["9", "-2", "7.5", "0", "3", "3", "11", "-4"]))
                .unwrap();
        let VariableSummary::Numerical(s) = summary else {
            panic!("expected numerical summary");
        };
        assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
        assert_eq!(s.mode, 3.0);
    }
}
