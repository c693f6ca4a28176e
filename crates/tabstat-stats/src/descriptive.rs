use std::collections::HashMap;

use crate::percentiles::Quartiles;

/// Descriptive statistics summarizing a numeric dataset.
///
/// Dispersion uses the population convention (divisor `n`), so a single
/// observation has zero variance rather than an undefined one.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median (second quartile, linear interpolation).
    pub median: f64,
    /// The most frequent value. See [`mode`] for the tie-break rule.
    pub mode: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The first quartile (25th percentile, linear interpolation).
    pub q1: f64,
    /// The third quartile (75th percentile, linear interpolation).
    pub q3: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from values in their original order.
    ///
    /// The order matters only for the mode tie-break; the values are
    /// copied and sorted internally for the order statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use tabstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new(&[5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.q1, 2.0);
    /// ```
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mode = mode(values)?;
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let quartiles = Quartiles::from_sorted(&sorted)?;
        let mean = mean(&sorted)?;
        let variance = variance(&sorted)?;
        let std_dev = std_dev(&sorted)?;

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median: quartiles.median,
            mode,
            variance,
            std_dev,
            q1: quartiles.q1,
            q3: quartiles.q3,
        })
    }

    /// Interquartile range (`q3 - q1`).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Arithmetic mean, or `None` for an empty slice.
///
/// Finite inputs always give a finite mean, even when their sum exceeds
/// the `f64` range.
///
/// ```
/// # use tabstat_stats::descriptive::mean;
/// assert_eq!(mean(&[1e308; 4]), Some(1e308));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        return Some(sum / values.len() as f64);
    }
    // the running sum overflowed; accumulate the mean itself instead
    let mut mean = 0.0;
    for (k, &v) in values.iter().enumerate() {
        let k = (k + 1) as f64;
        mean += v / k - mean / k;
    }
    Some(mean)
}

/// Sum of squared deviations from `mean`, as `(scale, ss)` with the true
/// value equal to `scale² · ss`.
fn square_deviations(values: &[f64], mean: f64) -> (f64, f64) {
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    if ss.is_finite() {
        return (1.0, ss);
    }
    let scale = values.iter().fold(mean.abs(), |acc, v| acc.max(v.abs()));
    let ss = values
        .iter()
        .map(|v| (v / scale - mean / scale).powi(2))
        .sum::<f64>();
    (scale, ss)
}

/// Population variance (divisor `n`), or `None` for an empty slice.
///
/// Infinite when the true variance exceeds the `f64` range.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn variance(values: &[f64]) -> Option<f64> {
    let (scale, ss) = square_deviations(values, mean(values)?);
    Some(scale * (scale * (ss / values.len() as f64)))
}

/// Population standard deviation, or `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let (scale, ss) = square_deviations(values, mean(values)?);
    Some(scale * (ss / values.len() as f64).sqrt())
}

/// Sample standard deviation (divisor `n - 1`), or `None` with fewer than two values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let (scale, ss) = square_deviations(values, mean(values)?);
    Some(scale * (ss / (values.len() - 1) as f64).sqrt())
}

/// Most frequent value.
///
/// Ties between equally frequent values go to the value seen first. When
/// every value is unique the minimum is returned.
///
/// # Examples
///
/// ```
/// # use tabstat_stats::descriptive::mode;
/// assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0]), Some(3.0));
/// assert_eq!(mode(&[4.0, 2.0, 9.0]), Some(2.0));
/// assert_eq!(mode(&[]), None);
/// ```
#[must_use]
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    let mut slots = HashMap::new();
    for &v in values {
        // -0.0 and 0.0 are the same observation
        let key = if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
        let slot = *slots.entry(key).or_insert_with(|| {
            counts.push((v, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let (mut best, mut best_count) = *counts.first()?;
    for &(v, count) in &counts[1..] {
        if count > best_count {
            best = v;
            best_count = count;
        }
    }
    if best_count == 1 {
        return values.iter().copied().min_by(f64::total_cmp);
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(&[]).is_none());
        assert!(mean(&[]).is_none());
        assert!(mode(&[]).is_none());
        assert!(sample_std_dev(&[1.0]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.q1, 42.0);
        assert_eq!(stats.q3, 42.0);
        assert_eq!(stats.mode, 42.0);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_population_convention() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = DescriptiveStats::new(&values).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.mode, 4.0);
        let s = sample_std_dev(&values).unwrap();
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_quartile_ordering() {
        let values = [9.0, -3.0, 14.5, 0.0, 2.0, 2.0, 7.25, 100.0, -40.0];
        let stats = DescriptiveStats::new(&values).unwrap();
        assert!(stats.min <= stats.q1);
        assert!(stats.q1 <= stats.median);
        assert!(stats.median <= stats.q3);
        assert!(stats.q3 <= stats.max);
    }

    #[test]
    fn test_mode_tie_break_first_seen() {
        assert_eq!(mode(&[5.0, 7.0, 7.0, 5.0, 1.0]), Some(5.0));
        assert_eq!(mode(&[7.0, 5.0, 5.0, 7.0, 1.0]), Some(7.0));
        assert_eq!(mode(&[0.0, -0.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        let stats = DescriptiveStats::new(&[1e308; 12]).unwrap();
        assert_eq!(stats.mean, 1e308);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.median, 1e308);

        let values = [1.5e308, 1.7e308, 1.6e308, 1.4e308];
        let m = mean(&values).unwrap();
        assert!((m / 1.55e308 - 1.0).abs() < 1e-12);
        let var = variance(&values).unwrap();
        assert!((var / 1.25e304 - 1.0).abs() < 1e-9);

        // squared deviations overflow; the sd is still representable
        let opposite = [-1.7e308, 1.7e308, -1.7e308, 1.7e308];
        assert_eq!(mean(&opposite), Some(0.0));
        assert!((std_dev(&opposite).unwrap() / 1.7e308 - 1.0).abs() < 1e-12);
        assert!(variance(&opposite).unwrap().is_infinite());
    }

    #[test]
    fn test_mode_all_unique_is_minimum() {
        assert_eq!(mode(&[8.0, 3.0, 5.0]), Some(3.0));
    }
}
