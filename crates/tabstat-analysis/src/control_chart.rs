//! Quality-control charts for the leading numerical variables
//!
//! Individuals charts (mean ± 3σ, population σ) are the default; rational
//! subgroups switch to an X̄-R chart. A variable with fewer than two full
//! subgroups falls back to an individuals chart.

use serde::{Deserialize, Serialize};
use tabstat_stats::control::{self, ControlLimits, XBarRChart};
use tracing::debug;

use crate::{AnalysisError, variable::NumericView};

/// Only the first variables get a chart.
pub const MAX_QC_CHARTS: usize = 3;
/// Individuals chart limits in population standard deviations.
pub const SIGMA_LIMIT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Individuals,
    XBarR { subgroup_size: usize },
}

/// Limits of a range chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeLimits {
    pub center_line: f64,
    pub ucl: f64,
    pub lcl: f64,
}

impl From<ControlLimits> for RangeLimits {
    fn from(limits: ControlLimits) -> Self {
        Self {
            center_line: limits.center,
            ucl: limits.ucl,
            lcl: limits.lcl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcChart {
    pub variable: String,
    pub kind: ChartKind,
    pub center_line: f64,
    pub ucl: f64,
    pub lcl: f64,
    /// Raw values (individuals) or subgroup means (X̄-R).
    pub data_points: Vec<f64>,
    /// Indices into `data_points` beyond the limits.
    pub out_of_control_indices: Vec<usize>,
    pub range_limits: Option<RangeLimits>,
}

impl QcChart {
    /// Individuals chart. `None` only for an empty variable.
    #[must_use]
    pub fn individuals(var: &NumericView<'_>) -> Option<Self> {
        let limits = control::individuals_limits(var.values, SIGMA_LIMIT)?;
        Some(Self::with_limits(
            var.name,
            ChartKind::Individuals,
            limits,
            var.values.to_vec(),
            None,
        ))
    }

    /// X̄-R chart over consecutive subgroups of `subgroup_size`, falling back
    /// to an individuals chart when fewer than two subgroups fit.
    #[must_use]
    pub fn xbar_r(var: &NumericView<'_>, subgroup_size: usize) -> Option<Self> {
        let Some(chart) = XBarRChart::new(var.values, subgroup_size) else {
            debug!(
                variable = var.name,
                subgroup_size, "X-bar R chart needs two full subgroups; using individuals chart"
            );
            return Self::individuals(var);
        };
        Some(Self::with_limits(
            var.name,
            ChartKind::XBarR { subgroup_size },
            chart.xbar_limits,
            chart.means,
            Some(chart.range_limits.into()),
        ))
    }

    fn with_limits(
        name: &str,
        kind: ChartKind,
        limits: ControlLimits,
        data_points: Vec<f64>,
        range_limits: Option<RangeLimits>,
    ) -> Self {
        let out_of_control_indices = data_points
            .iter()
            .enumerate()
            .filter(|(_, v)| limits.is_beyond(**v))
            .map(|(i, _)| i)
            .collect();
        Self {
            variable: name.to_owned(),
            kind,
            center_line: limits.center,
            ucl: limits.ucl,
            lcl: limits.lcl,
            data_points,
            out_of_control_indices,
            range_limits,
        }
    }
}

/// Checks a requested subgroup size.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidOption`] outside `2..=10`.
pub fn validate_subgroup_size(subgroup_size: Option<usize>) -> Result<(), AnalysisError> {
    match subgroup_size {
        Some(k) if control::xbar_r_factors(k).is_none() => Err(AnalysisError::InvalidOption {
            reason: format!(
                "QC subgroup size must be between {} and {}, got {k}",
                control::MIN_SUBGROUP_SIZE,
                control::MAX_SUBGROUP_SIZE
            ),
        }),
        _ => Ok(()),
    }
}

/// Builds charts for the first [`MAX_QC_CHARTS`] numerical variables.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidOption`] for an unsupported subgroup size.
pub fn build_charts(
    variables: &[NumericView<'_>],
    subgroup_size: Option<usize>,
) -> Result<Vec<QcChart>, AnalysisError> {
    validate_subgroup_size(subgroup_size)?;
    Ok(variables
        .iter()
        .take(MAX_QC_CHARTS)
        .filter_map(|var| match subgroup_size {
            None => QcChart::individuals(var),
            Some(k) => QcChart::xbar_r(var, k),
        })
        .collect())
}
