use crate::{descriptive, distribution};

/// Pearson product-moment correlation coefficient.
///
/// A zero-variance input yields `r = 0` instead of an undefined value.
///
/// # Returns
///
/// `None` if the slices differ in length or contain fewer than two values.
///
/// # Examples
///
/// ```
/// use tabstat_stats::correlation::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// assert_eq!(pearson(&[1.0, 1.0, 1.0], &[3.0, 1.0, 2.0]), Some(0.0));
/// ```
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = descriptive::mean(x)?;
    let my = descriptive::mean(y)?;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = sxx.sqrt() * syy.sqrt();
    if denom <= f64::MIN_POSITIVE || !denom.is_finite() {
        return Some(0.0);
    }
    let r = sxy / denom;
    Some(if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 })
}

/// Two-sided p-value of a correlation coefficient over `n` pairs.
///
/// `t = r·√((n-2)/(1-r²))` with `n - 2` degrees of freedom. Fewer than three
/// pairs carry no evidence, so the p-value is 1; a perfect correlation over
/// three or more pairs has p-value 0.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if n < 3 || r.is_nan() {
        return 1.0;
    }
    let r2 = r * r;
    if r2 >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r2)).sqrt();
    distribution::students_t_two_sided(t, df).unwrap_or(1.0)
}

/// Lag-`k` autocorrelation of a series.
///
/// The lagged cross-covariance is normalized by the population variance
/// (both with divisor `n`). A constant series has zero autocorrelation.
///
/// # Returns
///
/// `None` if `lag` is zero or not smaller than the series length, or if
/// the covariances exceed the `f64` range.
///
/// # Examples
///
/// ```
/// use tabstat_stats::correlation::autocorrelation;
///
/// let series = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
/// assert!(autocorrelation(&series, 1).unwrap() < -0.8);
/// assert!(autocorrelation(&series, 2).unwrap() > 0.6);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn autocorrelation(series: &[f64], lag: usize) -> Option<f64> {
    let n = series.len();
    if lag == 0 || lag >= n {
        return None;
    }
    let mean = descriptive::mean(series)?;
    let variance = descriptive::variance(series)?;
    if variance <= f64::MIN_POSITIVE {
        return Some(0.0);
    }
    let cov = series[..n - lag]
        .iter()
        .zip(&series[lag..])
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum::<f64>()
        / n as f64;
    let r = cov / variance;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
