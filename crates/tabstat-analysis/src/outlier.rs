//! Tukey-fence outlier detection

use serde::{Deserialize, Serialize};
use tabstat_stats::percentiles::Quartiles;

use crate::variable::NumericView;

/// Multiplier of the IQR for Tukey's inner fences.
pub const TUKEY_K: f64 = 1.5;

/// Values of one variable lying strictly outside its fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub variable: String,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Positions within the variable's own value sequence.
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl OutlierReport {
    /// Detects outliers, or `None` when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_analysis::{outlier::OutlierReport, variable::NumericView};
    ///
    /// let var = NumericView { name: "x", values: &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], rows: &[] };
    /// let report = OutlierReport::detect(&var).unwrap();
    /// assert_eq!((report.lower_fence, report.upper_fence), (-1.5, 8.5));
    /// assert_eq!(report.indices, vec![5]);
    /// ```
    #[must_use]
    pub fn detect(var: &NumericView<'_>) -> Option<Self> {
        let quartiles = Quartiles::new(var.values)?;
        let (lower_fence, upper_fence) = quartiles.fences(TUKEY_K);
        let (indices, values): (Vec<_>, Vec<_>) = var
            .values
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, v)| v < lower_fence || v > upper_fence)
            .unzip();
        if indices.is_empty() {
            return None;
        }
        Some(Self {
            variable: var.name.to_owned(),
            lower_fence,
            upper_fence,
            indices,
            values,
        })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.indices.len()
    }
}

/// Detects outliers in every numerical variable, omitting clean ones.
#[must_use]
pub fn detect_outliers(variables: &[NumericView<'_>]) -> Vec<OutlierReport> {
    variables.iter().filter_map(OutlierReport::detect).collect()
}
