//! Distribution functions used for p-values.
//!
//! Thin wrappers over `statrs` that return probabilities clamped to `[0, 1]`
//! and handle infinite statistics without producing NaN.

use std::f64::consts::SQRT_2;

use statrs::{
    distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT},
    function::erf,
};

/// Two-sided p-value of a Student t statistic with `df` degrees of freedom.
///
/// # Returns
///
/// `None` if `df` is not positive or `t` is NaN.
///
/// # Examples
///
/// ```
/// use tabstat_stats::distribution::students_t_two_sided;
///
/// assert!((students_t_two_sided(0.0, 10.0).unwrap() - 1.0).abs() < 1e-12);
/// let p = students_t_two_sided(2.228, 10.0).unwrap();
/// assert!((p - 0.05).abs() < 1e-3);
/// ```
#[must_use]
pub fn students_t_two_sided(t: f64, df: f64) -> Option<f64> {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return None;
    }
    if t.is_infinite() {
        return Some(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Upper-tail probability `P(F > f)` of the F distribution.
///
/// # Returns
///
/// `None` if either degree of freedom is not positive or `f` is NaN.
#[must_use]
pub fn f_upper_tail(f: f64, d1: f64, d2: f64) -> Option<f64> {
    if f.is_nan() || d1.is_nan() || d2.is_nan() || d1 <= 0.0 || d2 <= 0.0 {
        return None;
    }
    if f == f64::INFINITY {
        return Some(0.0);
    }
    if f <= 0.0 {
        return Some(1.0);
    }
    let dist = FisherSnedecor::new(d1, d2).ok()?;
    Some(dist.sf(f).clamp(0.0, 1.0))
}

/// Upper-tail probability `P(X > x)` of the chi-squared distribution.
#[must_use]
pub fn chi_squared_upper_tail(x: f64, df: f64) -> Option<f64> {
    if x.is_nan() || df.is_nan() || df <= 0.0 {
        return None;
    }
    if x == f64::INFINITY {
        return Some(0.0);
    }
    if x <= 0.0 {
        return Some(1.0);
    }
    let dist = ChiSquared::new(df).ok()?;
    Some(dist.sf(x).clamp(0.0, 1.0))
}

/// Standard normal CDF Φ(z).
#[must_use]
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erf::erfc(-z / SQRT_2)
}

/// Inverse of the standard normal CDF, Φ⁻¹(p) for `p` in `(0, 1)`.
#[must_use]
pub fn inverse_normal_cdf(p: f64) -> f64 {
    -SQRT_2 * erf::erfc_inv(2.0 * p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_two_sided_monotone() {
        let mut prev = 1.0;
        for i in 1..40 {
            let t = f64::from(i) * 0.25;
            let p = students_t_two_sided(t, 8.0).unwrap();
            assert!(p < prev);
            assert!((0.0..=1.0).contains(&p));
            prev = p;
        }
    }

    #[test]
    fn test_t_invalid_df() {
        assert_eq!(students_t_two_sided(1.0, 0.0), None);
        assert_eq!(students_t_two_sided(f64::NAN, 3.0), None);
        assert_eq!(students_t_two_sided(f64::INFINITY, 3.0), Some(0.0));
    }

    #[test]
    fn test_f_upper_tail() {
        // F(1, 10) critical value at alpha = 0.05 is 4.965
        let p = f_upper_tail(4.965, 1.0, 10.0).unwrap();
        assert!((p - 0.05).abs() < 1e-3);
        assert_eq!(f_upper_tail(0.0, 1.0, 10.0), Some(1.0));
        assert_eq!(f_upper_tail(f64::INFINITY, 1.0, 10.0), Some(0.0));
    }

    #[test]
    fn test_chi_squared_upper_tail() {
        // chi2(2) critical value at alpha = 0.05 is 5.991
        let p = chi_squared_upper_tail(5.991, 2.0).unwrap();
        assert!((p - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_normal_round_trip() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((standard_normal_cdf(1.959_964) - 0.975).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.975) - 1.959_964).abs() < 1e-5);
    }
}
