//! Normality tests.
//!
//! - [`shapiro_wilk`]: Royston's approximation (Algorithm AS R94), valid for
//!   3 ≤ n ≤ 5000.
//! - [`jarque_bera`]: moment-based test for large samples.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{
    descriptive,
    distribution::{chi_squared_upper_tail, inverse_normal_cdf, standard_normal_cdf},
};

/// Largest sample the Shapiro-Wilk approximation supports.
pub const SHAPIRO_WILK_MAX_N: usize = 5000;

/// Samples with larger magnitudes are rescaled to `[-1, 1]` first so that
/// fourth powers of deviations stay finite. Both statistics are scale-free.
const RESCALE_ABOVE: f64 = 1e64;

fn rescaled(data: &[f64]) -> Option<Vec<f64>> {
    let scale = data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    (scale > RESCALE_ABOVE).then(|| data.iter().map(|v| v / scale).collect())
}

/// Statistic and p-value of a normality test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityResult {
    /// Test statistic (W for Shapiro-Wilk, JB for Jarque-Bera).
    pub statistic: f64,
    /// Probability of a statistic at least this extreme under normality.
    pub p_value: f64,
}

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk test of the hypothesis that `data` is normally distributed.
///
/// W = (Σ aᵢ x₍ₙ₊₁₋ᵢ₎ - x₍ᵢ₎)² / Σ (xᵢ - x̄)², where the weights `a` come
/// from Blom's approximation of the expected normal order statistics with
/// Royston's polynomial correction of the extreme weights. Smaller W means
/// a larger departure from normality and a smaller p-value.
///
/// # Returns
///
/// `None` if `n < 3`, `n > 5000`, or all values are identical.
///
/// # Examples
///
/// ```
/// use tabstat_stats::normality::shapiro_wilk;
///
/// let r = shapiro_wilk(&[-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5]).unwrap();
/// assert!(r.statistic > 0.9);
/// assert!(r.p_value > 0.05);
/// ```
#[must_use]
pub fn shapiro_wilk(data: &[f64]) -> Option<NormalityResult> {
    let n = data.len();
    if !(3..=SHAPIRO_WILK_MAX_N).contains(&n) {
        return None;
    }
    let mut x = rescaled(data).unwrap_or_else(|| data.to_vec());
    x.sort_by(f64::total_cmp);
    if x[n - 1] - x[0] <= f64::MIN_POSITIVE {
        return None;
    }

    let mean = descriptive::mean(&x)?;
    let ss = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

    if n == 3 {
        let num = FRAC_1_SQRT_2 * (x[2] - x[0]);
        let w = (num * num / ss).clamp(0.75, 1.0);
        let p = 1.0 - (6.0 / PI) * w.sqrt().acos();
        return Some(NormalityResult {
            statistic: w,
            p_value: p.clamp(0.0, 1.0),
        });
    }

    let a = weights(n)?;
    let sa = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum::<f64>();
    let w = (sa * sa / ss).min(1.0);

    Some(NormalityResult {
        statistic: w,
        p_value: w_p_value(w, n).clamp(0.0, 1.0),
    })
}

/// Evaluates `c[0] + c[1]·x + c[2]·x² + …`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

#[expect(clippy::cast_precision_loss)]
fn weights(n: usize) -> Option<Vec<f64>> {
    let half = n / 2;
    let nf = n as f64;
    let m = (0..half)
        .map(|i| inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect::<Vec<_>>();
    let summ2 = 2.0 * m.iter().map(|mi| mi * mi).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; half];
    a[0] = a1;

    // Extreme weights get the polynomial correction, the rest are rescaled.
    let corrected = if n > 5 { 2 } else { 1 };
    let (fac_sq, rest) = if corrected == 2 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        (
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
        )
    } else {
        (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
    };
    if fac_sq <= 0.0 || rest <= 0.0 {
        return None;
    }
    let fac = (fac_sq / rest).sqrt();
    for i in corrected..half {
        a[i] = -m[i] / fac;
    }
    Some(a)
}

#[expect(clippy::cast_precision_loss)]
fn w_p_value(w: f64, n: usize) -> f64 {
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();
    let nf = n as f64;

    let z = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 0.0;
        }
        let y = -(gamma - y).ln();
        (y - poly(&C3, nf)) / poly(&C4, nf).exp()
    } else {
        let ln_n = nf.ln();
        (y - poly(&C5, ln_n)) / poly(&C6, ln_n).exp()
    };
    1.0 - standard_normal_cdf(z)
}

/// Jarque-Bera test: `JB = n/6 · (S² + (K - 3)²/4)`, chi-squared with 2 df.
///
/// # Returns
///
/// `None` if fewer than 4 values or all values are identical.
///
/// # Examples
///
/// ```
/// use tabstat_stats::normality::jarque_bera;
///
/// let skewed = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 50.0];
/// assert!(jarque_bera(&skewed).unwrap().p_value < 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn jarque_bera(data: &[f64]) -> Option<NormalityResult> {
    let n = data.len();
    if n < 4 {
        return None;
    }
    let scaled = rescaled(data);
    let data = scaled.as_deref().unwrap_or(data);
    let nf = n as f64;
    let mean = descriptive::mean(data)?;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in data {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= nf;
    m3 /= nf;
    m4 /= nf;
    if m2 <= f64::MIN_POSITIVE {
        return None;
    }
    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2);
    let jb = nf / 6.0 * (skewness * skewness + (kurtosis - 3.0).powi(2) / 4.0);
    Some(NormalityResult {
        statistic: jb,
        p_value: chi_squared_upper_tail(jb, 2.0)?,
    })
}
