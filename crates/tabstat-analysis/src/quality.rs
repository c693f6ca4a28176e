//! Overall data-quality score
//!
//! `score = 100 - 2·missing% - outlier% - 20·non_normal_fraction`, clamped to
//! `[0, 100]`.

use serde::{Deserialize, Serialize};

use crate::{SIGNIFICANCE_LEVEL, outlier::OutlierReport, testing::HypothesisTest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    #[display("excellent")]
    Excellent,
    #[display("good")]
    Good,
    #[display("fair")]
    Fair,
    #[display("poor")]
    Poor,
}

impl Grade {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::Excellent
        } else if score >= 70.0 {
            Grade::Good
        } else if score >= 50.0 {
            Grade::Fair
        } else {
            Grade::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub score: f64,
    pub grade: Grade,
    /// Missing cells over all cells, in percent.
    pub missing_percentage: f64,
    /// Outliers over numerical values, in percent.
    pub outlier_percentage: f64,
    /// Share of normality tests rejecting normality.
    pub non_normal_fraction: f64,
}

/// Counts fed into the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityInputs {
    pub total_cells: usize,
    pub missing_cells: usize,
    pub numerical_values: usize,
    pub outliers: usize,
    pub normality_tests: usize,
    pub non_normal_tests: usize,
}

impl QualityInputs {
    #[must_use]
    pub fn collect(
        total_cells: usize,
        missing_cells: usize,
        numerical_values: usize,
        outliers: &[OutlierReport],
        tests: &[HypothesisTest],
    ) -> Self {
        let normality = tests.iter().filter(|t| t.kind.is_normality());
        Self {
            total_cells,
            missing_cells,
            numerical_values,
            outliers: outliers.iter().map(OutlierReport::count).sum(),
            normality_tests: normality.clone().count(),
            non_normal_tests: normality
                .filter(|t| t.p_value < SIGNIFICANCE_LEVEL)
                .count(),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl DataQuality {
    /// Scores the inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_analysis::quality::{DataQuality, Grade, QualityInputs};
    ///
    /// let q = DataQuality::score(&QualityInputs {
    ///     total_cells: 100,
    ///     missing_cells: 5,
    ///     ..QualityInputs::default()
    /// });
    /// assert_eq!(q.score, 90.0);
    /// assert_eq!(q.grade, Grade::Excellent);
    /// ```
    #[must_use]
    pub fn score(inputs: &QualityInputs) -> Self {
        let missing_percentage = ratio(inputs.missing_cells, inputs.total_cells) * 100.0;
        let outlier_percentage = ratio(inputs.outliers, inputs.numerical_values) * 100.0;
        let non_normal_fraction = ratio(inputs.non_normal_tests, inputs.normality_tests);
        let score = (100.0 - 2.0 * missing_percentage - outlier_percentage
            - 20.0 * non_normal_fraction)
            .clamp(0.0, 100.0);
        Self {
            score,
            grade: Grade::from_score(score),
            missing_percentage,
            outlier_percentage,
            non_normal_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100.0), Grade::Excellent);
        assert_eq!(Grade::from_score(90.0), Grade::Excellent);
        assert_eq!(Grade::from_score(89.9), Grade::Good);
        assert_eq!(Grade::from_score(70.0), Grade::Good);
        assert_eq!(Grade::from_score(50.0), Grade::Fair);
        assert_eq!(Grade::from_score(49.99), Grade::Poor);
    }

    #[test]
    fn test_clamped() {
        let q = DataQuality::score(&QualityInputs {
            total_cells: 10,
            missing_cells: 9,
            numerical_values: 1,
            outliers: 1,
            normality_tests: 1,
            non_normal_tests: 1,
        });
        assert_eq!(q.score, 0.0);
        assert_eq!(q.grade, Grade::Poor);
    }

    #[test]
    fn test_no_numerical_values() {
        let q = DataQuality::score(&QualityInputs {
            total_cells: 4,
            ..QualityInputs::default()
        });
        assert_eq!(q.outlier_percentage, 0.0);
        assert_eq!(q.non_normal_fraction, 0.0);
        assert_eq!(q.score, 100.0);
    }

    #[test]
    fn test_monotone_in_missing() {
        let mut last = f64::INFINITY;
        for missing in 0..=200 {
            let q = DataQuality::score(&QualityInputs {
                total_cells: 200,
                missing_cells: missing,
                numerical_values: 150,
                outliers: 6,
                normality_tests: 4,
                non_normal_tests: 1,
            });
            assert!(q.score <= last);
            last = q.score;
        }
    }
}
