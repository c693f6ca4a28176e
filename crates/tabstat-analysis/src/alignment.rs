//! Pairing of two numerical variables
//!
//! Numerical variables drop their missing and unparseable cells, so two
//! variables from the same table can have different lengths. Pairwise
//! analyses (correlation, regression) need `(x, y)` pairs and choose how to
//! build them with [`Alignment`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::variable::NumericView;

/// How two value sequences are paired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Pair by position and truncate to the shorter sequence.
    ///
    /// Positions are positions among *non-missing* values, so a gap in one
    /// column shifts its later values against the other column.
    #[default]
    Truncate,
    /// Pair values that came from the same table row; rows where either
    /// side is absent are dropped.
    RowIndex,
}

impl Alignment {
    /// Builds the paired `(x, y)` sequences.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_analysis::{alignment::Alignment, variable::NumericView};
    ///
    /// let x = NumericView { name: "x", values: &[1.0, 2.0, 3.0], rows: &[0, 1, 2] };
    /// let y = NumericView { name: "y", values: &[10.0, 30.0], rows: &[0, 2] };
    ///
    /// assert_eq!(Alignment::Truncate.pair(&x, &y), (vec![1.0, 2.0], vec![10.0, 30.0]));
    /// assert_eq!(Alignment::RowIndex.pair(&x, &y), (vec![1.0, 3.0], vec![10.0, 30.0]));
    /// ```
    #[must_use]
    pub fn pair(self, x: &NumericView<'_>, y: &NumericView<'_>) -> (Vec<f64>, Vec<f64>) {
        match self {
            Alignment::Truncate => {
                let n = x.values.len().min(y.values.len());
                (x.values[..n].to_vec(), y.values[..n].to_vec())
            }
            Alignment::RowIndex => {
                let y_by_row = y
                    .rows
                    .iter()
                    .copied()
                    .zip(y.values.iter().copied())
                    .collect::<HashMap<_, _>>();
                x.rows
                    .iter()
                    .zip(x.values)
                    .filter_map(|(row, &xv)| y_by_row.get(row).map(|&yv| (xv, yv)))
                    .unzip()
            }
        }
    }
}
