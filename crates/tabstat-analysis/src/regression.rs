//! Pairwise simple linear regression
//!
//! For every pair of numerical variables `(i, j)` with `i < j` and more than
//! [`MIN_REGRESSION_VALUES`] values each, the later variable is regressed on
//! the earlier one.

use serde::{Deserialize, Serialize};
use tabstat_stats::{descriptive, distribution::f_upper_tail, regression::SimpleFit};
use tracing::debug;

use crate::{alignment::Alignment, variable::NumericView};

/// Both variables need strictly more values than this.
pub const MIN_REGRESSION_VALUES: usize = 10;

/// Half-width of the prediction band in residual standard deviations.
pub const BAND_Z: f64 = 1.96;

/// Fit of `response = intercept + slope · predictor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Explanatory variable (x), the earlier column of the pair.
    pub predictor: String,
    /// Explained variable (y), the later column of the pair.
    pub response: String,
    /// Number of aligned pairs.
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    pub f_statistic: f64,
    /// Upper tail of F(1, n - 2).
    pub p_value: f64,
    pub residuals: Vec<f64>,
    pub predictions: Vec<f64>,
    /// `predictions - BAND_Z · σ(residuals)`.
    pub lower_bound: Vec<f64>,
    /// `predictions + BAND_Z · σ(residuals)`.
    pub upper_bound: Vec<f64>,
}

impl RegressionResult {
    /// Regresses `y` on `x` over aligned pairs.
    ///
    /// Returns `None` if either variable is too short, either variable has
    /// zero variance over the aligned pairs, or a statistic of the fit
    /// exceeds the `f64` range.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(x: &NumericView<'_>, y: &NumericView<'_>, alignment: Alignment) -> Option<Self> {
        if x.values.len() <= MIN_REGRESSION_VALUES || y.values.len() <= MIN_REGRESSION_VALUES {
            debug!(
                predictor = x.name,
                response = y.name,
                "regression skipped: too few values"
            );
            return None;
        }
        let (xs, ys) = alignment.pair(x, y);
        let Some(fit) = SimpleFit::fit(&xs, &ys) else {
            debug!(
                predictor = x.name,
                response = y.name,
                pairs = xs.len(),
                "regression skipped: zero variance"
            );
            return None;
        };

        let n = fit.n as f64;
        let r2 = fit.r_squared;
        let adjusted_r_squared = 1.0 - (1.0 - r2) * (n - 1.0) / (n - 2.0);
        let f_statistic = r2 / (1.0 - r2).max(f64::EPSILON) * (n - 2.0);
        let p_value = f_upper_tail(f_statistic, 1.0, n - 2.0)?;

        let band = BAND_Z * descriptive::std_dev(&fit.residuals)?;
        let lower_bound = fit.fitted.iter().map(|p| p - band).collect::<Vec<_>>();
        let upper_bound = fit.fitted.iter().map(|p| p + band).collect::<Vec<_>>();

        let finite = [fit.intercept, fit.slope, adjusted_r_squared, f_statistic, p_value]
            .into_iter()
            .chain(fit.residuals.iter().copied())
            .chain(lower_bound.iter().copied())
            .chain(upper_bound.iter().copied())
            .all(f64::is_finite);
        if !finite {
            debug!(
                predictor = x.name,
                response = y.name,
                "regression skipped: statistics out of range"
            );
            return None;
        }

        Some(Self {
            predictor: x.name.to_owned(),
            response: y.name.to_owned(),
            n: fit.n,
            intercept: fit.intercept,
            slope: fit.slope,
            r_squared: r2,
            adjusted_r_squared,
            f_statistic,
            p_value,
            residuals: fit.residuals,
            predictions: fit.fitted,
            lower_bound,
            upper_bound,
        })
    }
}

/// Fits every eligible pair, in `(i, j)` order.
#[must_use]
pub fn fit_pairs(variables: &[NumericView<'_>], alignment: Alignment) -> Vec<RegressionResult> {
    let mut results = vec![];
    for (i, x) in variables.iter().enumerate() {
        for y in &variables[i + 1..] {
            results.extend(RegressionResult::fit(x, y, alignment));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg32;

    use super::*;

    fn view<'a>(name: &'a str, values: &'a [f64], rows: &'a [usize]) -> NumericView<'a> {
        NumericView { name, values, rows }
    }

    #[test]
    fn test_exact_line() {
        let x = (1..=20).map(f64::from).collect::<Vec<_>>();
        let y = x.iter().map(|v| 2.0 * v + 1.0).collect::<Vec<_>>();
        let rows: Vec<usize> = (0..20).collect();
        let result =
            RegressionResult::fit(&view("x", &x, &rows), &view("y", &y, &rows), Alignment::Truncate)
                .unwrap();
        assert_eq!(result.n, 20);
        assert!((result.slope - 2.0).abs() < 1e-10);
        assert!((result.intercept - 1.0).abs() < 1e-10);
        assert!((result.r_squared - 1.0).abs() < 1e-12);
        assert!(result.f_statistic.is_finite());
        assert!(result.p_value < 1e-10);
        assert!(result.residuals.iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_noisy_line_band() {
        let mut rng = Pcg32::seed_from_u64(1);
        let noise = Normal::new(0.0, 3.0).unwrap();
        let x = (0..60).map(f64::from).collect::<Vec<_>>();
        let y = x
            .iter()
            .map(|v| 0.5 * v - 4.0 + noise.sample(&mut rng))
            .collect::<Vec<_>>();
        let rows: Vec<usize> = (0..60).collect();
        let result =
            RegressionResult::fit(&view("x", &x, &rows), &view("y", &y, &rows), Alignment::Truncate)
                .unwrap();
        assert!((result.slope - 0.5).abs() < 0.1);
        assert!(result.adjusted_r_squared <= result.r_squared);
        assert!(result.p_value < 0.001);
        for ((lo, p), hi) in result
            .lower_bound
            .iter()
            .zip(&result.predictions)
            .zip(&result.upper_bound)
        {
            assert!(lo < p && p < hi);
        }
        let sum = result.residuals.iter().sum::<f64>();
        assert!(sum.abs() < 1e-8);
    }

    #[test]
    fn test_constant_response_skipped() {
        let rows: Vec<usize> = (0..15).collect();
        let x = (0..15).map(f64::from).collect::<Vec<_>>();
        let y = [4.5; 15];
        let fit = RegressionResult::fit(&view("x", &x, &rows), &view("y", &y, &rows), Alignment::Truncate);
        assert!(fit.is_none());
    }

    #[test]
    fn test_out_of_range_fit_skipped() {
        let rows: Vec<usize> = (0..12).collect();
        let x = (0..12).map(f64::from).collect::<Vec<_>>();
        let y = (0..12)
            .map(|i| if i % 2 == 0 { -1.5e308 } else { 1.5e308 })
            .collect::<Vec<_>>();
        let fit = RegressionResult::fit(&view("x", &x, &rows), &view("y", &y, &rows), Alignment::Truncate);
        assert!(fit.is_none());
    }

    #[test]
    fn test_pair_selection() {
        let rows: Vec<usize> = (0..12).collect();
        let a = (0..12).map(f64::from).collect::<Vec<_>>();
        let b = a.iter().map(|v| v * v).collect::<Vec<_>>();
        let short = [1.0, 2.0, 3.0];
        let flat = [3.0; 12];
        let vars = [
            view("a", &a, &rows),
            view("short", &short, &rows[..3]),
            view("b", &b, &rows),
            view("flat", &flat, &rows),
        ];
        let results = fit_pairs(&vars, Alignment::Truncate);
        let pairs = results
            .iter()
            .map(|r| (r.predictor.as_str(), r.response.as_str()))
            .collect::<Vec<_>>();
        // `short` is too short, `flat` has nothing to explain or predict
        assert_eq!(pairs, vec![("a", "b")]);
        assert!(results.iter().all(|r| r.p_value.is_finite()));
    }
}
