//! Variable type detection
//!
//! Turns every column of a [`RawTable`] into a typed [`Variable`]. A column
//! is numerical when *strictly more* than 80 % of its non-missing cells parse
//! as finite numbers; otherwise it is categorical.
//!
//! Numerical variables keep only the cells that parsed: a stray `"n/a"` in a
//! mostly numeric column is dropped and is **not** added to
//! [`Variable::missing_count`], which only counts empty cells. As a
//! consequence positions in [`Variable::values`] may drift from row
//! positions; [`Variable::rows`] keeps the original row of every value.

use serde::{Deserialize, Serialize};

use crate::table::{RawCell, RawTable};

/// Minimum share of parseable cells (exclusive) for a numerical column.
pub const NUMERIC_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[display("numerical")]
    Numerical,
    #[display("categorical")]
    Categorical,
}

/// Parsed values of a variable, missing cells excluded.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum VariableValues {
    Numerical(Vec<f64>),
    Categorical(Vec<String>),
}

impl VariableValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            VariableValues::Numerical(values) => values.len(),
            VariableValues::Categorical(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Column header.
    pub name: String,
    /// Parsed values in row order.
    pub values: VariableValues,
    /// Original row index of each entry of `values`.
    pub rows: Vec<usize>,
    /// Number of empty cells in the column.
    pub missing_count: usize,
}

impl Variable {
    /// Classifies one column.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_analysis::{table::RawCell, variable::{Variable, VariableKind}};
    ///
    /// let cells = ["1", "2", "", "x", "4", "5", "6"].map(RawCell::from);
    /// let var = Variable::from_cells("v", &cells);
    /// assert_eq!(var.kind(), VariableKind::Numerical);
    /// assert_eq!(var.numbers(), Some(&[1.0, 2.0, 4.0, 5.0, 6.0][..]));
    /// assert_eq!(var.missing_count, 1);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn from_cells<'a, I>(name: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a RawCell>,
    {
        let mut total = 0;
        let present = cells
            .into_iter()
            .enumerate()
            .inspect(|_| total += 1)
            .filter(|(_, cell)| !cell.is_missing())
            .collect::<Vec<_>>();
        let missing_count = total - present.len();

        let parsed = present
            .iter()
            .filter_map(|(row, cell)| cell.as_number().map(|v| (*row, v)))
            .collect::<Vec<_>>();

        let is_numerical = !present.is_empty()
            && parsed.len() as f64 / present.len() as f64 > NUMERIC_THRESHOLD;

        let (rows, values) = if is_numerical {
            let (rows, values) = parsed.into_iter().unzip();
            (rows, VariableValues::Numerical(values))
        } else {
            let (rows, values) = present
                .into_iter()
                .map(|(row, cell)| (row, cell.to_text()))
                .unzip();
            (rows, VariableValues::Categorical(values))
        };

        Self {
            name: name.to_owned(),
            values,
            rows,
            missing_count,
        }
    }

    #[must_use]
    pub fn kind(&self) -> VariableKind {
        match self.values {
            VariableValues::Numerical(_) => VariableKind::Numerical,
            VariableValues::Categorical(_) => VariableKind::Categorical,
        }
    }

    /// Numeric values, or `None` for a categorical variable.
    #[must_use]
    pub fn numbers(&self) -> Option<&[f64]> {
        match &self.values {
            VariableValues::Numerical(values) => Some(values),
            VariableValues::Categorical(_) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Detects one variable per column, in column order.
#[must_use]
pub fn detect_variables(table: &RawTable) -> Vec<Variable> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(index, name)| Variable::from_cells(name, table.column(index)))
        .collect()
}

/// A numerical variable borrowed together with its values.
#[derive(Debug, Clone, Copy)]
pub struct NumericView<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
    pub rows: &'a [usize],
}

/// Borrows the numerical variables, in column order.
pub fn numeric_views(variables: &[Variable]) -> Vec<NumericView<'_>> {
    variables
        .iter()
        .filter_map(|var| {
            var.numbers().map(|values| NumericView {
                name: &var.name,
                values,
                rows: &var.rows,
            })
        })
        .collect()
}
