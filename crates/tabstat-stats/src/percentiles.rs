/// The three quartiles of a dataset.
///
/// # Examples
///
/// ```
/// use tabstat_stats::percentiles::Quartiles;
///
/// let quartiles = Quartiles::from_sorted(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
/// assert_eq!(quartiles.q1, 2.25);
/// assert_eq!(quartiles.median, 3.5);
/// assert_eq!(quartiles.q3, 4.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    /// 25th percentile.
    pub q1: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
}

impl Quartiles {
    /// Computes quartiles from sorted values.
    ///
    /// # Returns
    ///
    /// `None` if `sorted_values` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        Some(Self {
            q1: quantile(sorted_values, 0.25)?,
            median: quantile(sorted_values, 0.5)?,
            q3: quantile(sorted_values, 0.75)?,
        })
    }

    /// Computes quartiles from unsorted values.
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Interquartile range (`q3 - q1`).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey fences `(q1 - k·IQR, q3 + k·IQR)`.
    #[must_use]
    pub fn fences(&self, k: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - k * iqr, self.q3 + k * iqr)
    }
}

/// Computes a single quantile from sorted data.
///
/// Uses linear interpolation between closest ranks: the quantile `p` sits
/// at the fractional position `p · (n - 1)` of the sorted data.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `p` - The quantile to compute (0.0 to 1.0, clamped)
///
/// # Returns
///
/// The interpolated value, or `None` if the input is empty.
///
/// # Examples
///
/// ```
/// use tabstat_stats::percentiles::quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&values, 0.5), Some(2.5));
/// assert_eq!(quantile(&values, 0.0), Some(1.0));
/// assert_eq!(quantile(&values, 1.0), Some(4.0));
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile(sorted_values: &[f64], p: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let pos = p.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    Some(lo + frac * (hi - lo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert_eq!(quantile(&[], 0.5), None);
        assert!(Quartiles::from_sorted(&[]).is_none());
    }

    #[test]
    fn test_tukey_fences() {
        let quartiles = Quartiles::new(&[100.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((quartiles.iqr() - 2.5).abs() < 1e-12);
        let (lower, upper) = quartiles.fences(1.5);
        assert!((lower + 1.5).abs() < 1e-12);
        assert!((upper - 8.5).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_between_ranks() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&values, 0.25), Some(20.0));
        assert!((quantile(&values, 0.1).unwrap() - 14.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_unsorted_input_panics() {
        let _ = Quartiles::from_sorted(&[3.0, 1.0, 2.0]);
    }
}
