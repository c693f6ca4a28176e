use crate::descriptive;

/// Ordinary least squares fit of `y = intercept + slope · x`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFit {
    /// Number of `(x, y)` pairs.
    pub n: usize,
    /// Intercept (β₀).
    pub intercept: f64,
    /// Slope (β₁).
    pub slope: f64,
    /// Coefficient of determination (R²).
    pub r_squared: f64,
    /// Fitted values (ŷᵢ).
    pub fitted: Vec<f64>,
    /// Residuals (yᵢ - ŷᵢ).
    pub residuals: Vec<f64>,
}

impl SimpleFit {
    /// Fits a simple linear regression with the closed-form OLS estimator.
    ///
    /// β₁ = Sxy / Sxx, β₀ = ȳ - β₁·x̄.
    ///
    /// # Returns
    ///
    /// `None` if the slices differ in length, contain fewer than three
    /// pairs, or either `x` or `y` has zero variance. A constant response
    /// leaves R² undefined.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_stats::regression::SimpleFit;
    ///
    /// let fit = SimpleFit::fit(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert!((fit.slope - 2.0).abs() < 1e-12);
    /// assert!((fit.intercept - 1.0).abs() < 1e-12);
    /// assert!((fit.r_squared - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len();
        if n < 3 || n != y.len() {
            return None;
        }
        let mx = descriptive::mean(x)?;
        let my = descriptive::mean(y)?;

        let sxx = x.iter().map(|xi| (xi - mx).powi(2)).sum::<f64>();
        let ss_tot = y.iter().map(|yi| (yi - my).powi(2)).sum::<f64>();
        if sxx <= f64::MIN_POSITIVE || ss_tot <= f64::MIN_POSITIVE {
            return None;
        }
        let sxy = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (xi - mx) * (yi - my))
            .sum::<f64>();

        let slope = sxy / sxx;
        let intercept = my - slope * mx;

        let fitted = x.iter().map(|xi| intercept + slope * xi).collect::<Vec<_>>();
        let residuals = y
            .iter()
            .zip(&fitted)
            .map(|(yi, fi)| yi - fi)
            .collect::<Vec<_>>();

        let ss_res = residuals.iter().map(|r| r * r).sum::<f64>();
        let r_squared = (1.0 - ss_res / ss_tot).clamp(0.0, 1.0);

        Some(Self {
            n,
            intercept,
            slope,
            r_squared,
            fitted,
            residuals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_variance_predictor() {
        assert!(SimpleFit::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_constant_response() {
        assert!(SimpleFit::fit(&[1.0, 2.0, 3.0, 4.0], &[7.0; 4]).is_none());
    }

    #[test]
    fn test_too_few_points() {
        assert!(SimpleFit::fit(&[1.0, 2.0], &[1.0, 2.0]).is_none());
        assert!(SimpleFit::fit(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_residuals_sum_to_zero() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.2, 1.9, 3.4, 3.9, 5.3, 5.8];
        let fit = SimpleFit::fit(&x, &y).unwrap();
        let sum = fit.residuals.iter().sum::<f64>();
        assert!(sum.abs() < 1e-10);
        assert!(fit.r_squared > 0.95 && fit.r_squared <= 1.0);
        assert_eq!(fit.fitted.len(), 6);
    }
}
