//! Shewhart control limits.
//!
//! Factors for the X̄-R chart come from ASTM E2587 (Montgomery,
//! *Introduction to Statistical Quality Control*, appendix VI).

use crate::descriptive;

/// A2 factors, indexed by subgroup size `n = 2..=10` (index 0 is `n = 2`).
const A2: [f64; 9] = [1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308];
/// D3 factors for the range chart lower limit.
const D3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223];
/// D4 factors for the range chart upper limit.
const D4: [f64; 9] = [3.267, 2.575, 2.282, 2.114, 2.004, 1.924, 1.864, 1.816, 1.777];

/// Smallest supported rational subgroup size.
pub const MIN_SUBGROUP_SIZE: usize = 2;
/// Largest supported rational subgroup size.
pub const MAX_SUBGROUP_SIZE: usize = 10;

/// Upper control limit, center line and lower control limit.
///
/// Invariant: `lcl <= center <= ucl`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub center: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    fn is_finite(&self) -> bool {
        self.ucl.is_finite() && self.center.is_finite() && self.lcl.is_finite()
    }

    /// Whether `value` lies strictly outside the limits.
    #[must_use]
    pub fn is_beyond(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

/// X̄-R chart constants for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XBarRFactors {
    pub a2: f64,
    pub d3: f64,
    pub d4: f64,
}

/// Returns the X̄-R factors for `subgroup_size`, or `None` outside `2..=10`.
#[must_use]
pub fn xbar_r_factors(subgroup_size: usize) -> Option<XBarRFactors> {
    if !(MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&subgroup_size) {
        return None;
    }
    let idx = subgroup_size - MIN_SUBGROUP_SIZE;
    Some(XBarRFactors {
        a2: A2[idx],
        d3: D3[idx],
        d4: D4[idx],
    })
}

/// Individuals chart limits: mean ± `sigmas` population standard deviations.
///
/// # Examples
///
/// ```
/// use tabstat_stats::control::individuals_limits;
///
/// let limits = individuals_limits(&[5.0, 5.0, 5.0], 3.0).unwrap();
/// assert_eq!(limits.center, 5.0);
/// assert_eq!(limits.ucl, 5.0);
/// assert_eq!(limits.lcl, 5.0);
/// ```
#[must_use]
pub fn individuals_limits(values: &[f64], sigmas: f64) -> Option<ControlLimits> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        // summation error would otherwise move the center off the value
        return Some(ControlLimits {
            ucl: first,
            center: first,
            lcl: first,
        });
    }
    let center = descriptive::mean(values)?;
    let sd = descriptive::std_dev(values)?;
    let limits = ControlLimits {
        ucl: center + sigmas * sd,
        center,
        lcl: center - sigmas * sd,
    };
    limits.is_finite().then_some(limits)
}

/// X̄-R chart computed from consecutive rational subgroups.
#[derive(Debug, Clone, PartialEq)]
pub struct XBarRChart {
    /// Mean of every complete subgroup.
    pub means: Vec<f64>,
    /// Range (max - min) of every complete subgroup.
    pub ranges: Vec<f64>,
    /// Limits of the subgroup-mean chart.
    pub xbar_limits: ControlLimits,
    /// Limits of the range chart.
    pub range_limits: ControlLimits,
}

impl XBarRChart {
    /// Splits `values` into consecutive subgroups of `subgroup_size` and
    /// computes both charts. A trailing partial subgroup is discarded.
    ///
    /// # Returns
    ///
    /// `None` if the subgroup size is unsupported, fewer than two complete
    /// subgroups are available, or a limit exceeds the `f64` range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstat_stats::control::XBarRChart;
    ///
    /// let values = [25.0, 26.0, 24.0, 25.5, 24.5, 25.0, 25.2, 24.8, 25.1];
    /// let chart = XBarRChart::new(&values, 3).unwrap();
    /// assert_eq!(chart.means.len(), 3);
    /// assert!(chart.xbar_limits.ucl > chart.xbar_limits.center);
    /// ```
    #[must_use]
    pub fn new(values: &[f64], subgroup_size: usize) -> Option<Self> {
        let factors = xbar_r_factors(subgroup_size)?;
        let (means, ranges): (Vec<f64>, Vec<f64>) = values
            .chunks_exact(subgroup_size)
            .map(|subgroup| {
                let (lo, hi) = subgroup
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    });
                (descriptive::mean(subgroup).unwrap_or(lo), hi - lo)
            })
            .unzip();
        if means.len() < 2 {
            return None;
        }

        let grand_mean = descriptive::mean(&means)?;
        let r_bar = descriptive::mean(&ranges)?;

        let xbar_limits = ControlLimits {
            ucl: grand_mean + factors.a2 * r_bar,
            center: grand_mean,
            lcl: grand_mean - factors.a2 * r_bar,
        };
        let range_limits = ControlLimits {
            ucl: factors.d4 * r_bar,
            center: r_bar,
            lcl: factors.d3 * r_bar,
        };
        if !(xbar_limits.is_finite() && range_limits.is_finite()) {
            return None;
        }
        Some(Self {
            xbar_limits,
            range_limits,
            means,
            ranges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_range() {
        assert!(xbar_r_factors(1).is_none());
        assert!(xbar_r_factors(11).is_none());
        let f = xbar_r_factors(5).unwrap();
        assert_eq!(f.a2, 0.577);
        assert_eq!(f.d4, 2.114);
    }

    #[test]
    fn test_xbar_r_limits() {
        let values = [1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 2.0, 2.0];
        let chart = XBarRChart::new(&values, 2).unwrap();
        assert_eq!(chart.means, vec![2.0, 3.0, 4.0, 2.0]);
        assert_eq!(chart.ranges, vec![2.0, 2.0, 2.0, 0.0]);
        let r_bar = 1.5;
        assert!((chart.xbar_limits.center - 2.75).abs() < 1e-12);
        assert!((chart.xbar_limits.ucl - (2.75 + 1.880 * r_bar)).abs() < 1e-12);
        assert!((chart.range_limits.ucl - 3.267 * r_bar).abs() < 1e-12);
        assert_eq!(chart.range_limits.lcl, 0.0);
    }

    #[test]
    fn test_partial_subgroup_discarded() {
        let chart = XBarRChart::new(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
        assert_eq!(chart.means.len(), 2);
        assert!(XBarRChart::new(&[1.0, 2.0, 3.0], 2).is_none());
    }

    #[test]
    fn test_limits_beyond_range() {
        let values = [-1.5e308, 1.5e308, -1.5e308, 1.5e308];
        assert!(individuals_limits(&values, 3.0).is_none());
        assert!(XBarRChart::new(&values, 2).is_none());
    }

    #[test]
    fn test_constant_individuals() {
        let limits = individuals_limits(&[7.5; 6], 3.0).unwrap();
        assert!(!limits.is_beyond(7.5));
        assert_eq!(limits.ucl, limits.lcl);

        let limits = individuals_limits(&[0.1; 50], 3.0).unwrap();
        assert_eq!(limits.center, 0.1);
        assert_eq!(limits.ucl, 0.1);
    }
}
