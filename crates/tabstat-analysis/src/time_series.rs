//! Trend and autocorrelation diagnostics
//!
//! Runs when the table has a column whose header mentions `time` or `date`
//! and some *other* numerical variable has at least
//! [`MIN_SERIES_LENGTH`] values. The first such variable is treated as a
//! series in row order.

use serde::{Deserialize, Serialize};
use tabstat_stats::{correlation::autocorrelation, descriptive};
use tracing::debug;

use crate::variable::Variable;

pub const MIN_SERIES_LENGTH: usize = 10;
pub const MAX_LAG: usize = 10;
/// Relative change between the half means that counts as a trend.
pub const TREND_THRESHOLD: f64 = 0.05;
/// Absolute autocorrelation above which the series counts as seasonal.
pub const SEASONALITY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    #[display("increasing")]
    Increasing,
    #[display("decreasing")]
    Decreasing,
    #[display("stable")]
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    pub time_column: String,
    pub variable: String,
    pub n: usize,
    pub trend: Trend,
    /// `(m2 - m1) / |m1|` of the half means; 0 when `m1 = 0`.
    pub relative_change: f64,
    pub seasonality: bool,
    /// Autocorrelation at lags `1..=autocorrelations.len()`.
    pub autocorrelations: Vec<f64>,
}

fn is_time_header(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("time") || name.contains("date")
}

/// Classifies the change between the first-half mean `m1` and the
/// second-half mean `m2`.
#[must_use]
pub fn classify_trend(m1: f64, m2: f64) -> (Trend, f64) {
    if m1 == 0.0 {
        let trend = match m2.partial_cmp(&m1) {
            Some(std::cmp::Ordering::Greater) => Trend::Increasing,
            Some(std::cmp::Ordering::Less) => Trend::Decreasing,
            _ => Trend::Stable,
        };
        return (trend, 0.0);
    }
    let change = (m2 - m1) / m1.abs();
    let trend = if change > TREND_THRESHOLD {
        Trend::Increasing
    } else if change < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    };
    (trend, change)
}

impl TimeSeriesResult {
    /// Diagnoses one series.
    #[must_use]
    pub fn from_series(time_column: &str, variable: &str, series: &[f64]) -> Option<Self> {
        let n = series.len();
        if n < MIN_SERIES_LENGTH {
            return None;
        }
        let half = n / 2;
        let m1 = descriptive::mean(&series[..half])?;
        let m2 = descriptive::mean(&series[half..])?;
        let (trend, relative_change) = classify_trend(m1, m2);
        if !relative_change.is_finite() {
            return None;
        }

        let max_lag = MAX_LAG.min(n / 4);
        let autocorrelations = (1..=max_lag)
            .filter_map(|lag| autocorrelation(series, lag))
            .collect::<Vec<_>>();
        let seasonality = autocorrelations
            .iter()
            .any(|r| r.abs() > SEASONALITY_THRESHOLD);

        Some(Self {
            time_column: time_column.to_owned(),
            variable: variable.to_owned(),
            n,
            trend,
            relative_change,
            seasonality,
            autocorrelations,
        })
    }
}

/// Picks the time column and the series, then diagnoses it.
#[must_use]
pub fn analyze_time_series(variables: &[Variable]) -> Option<TimeSeriesResult> {
    let Some((time_index, time_column)) = variables
        .iter()
        .enumerate()
        .find(|(_, v)| is_time_header(&v.name))
    else {
        debug!("time series skipped: no time or date column");
        return None;
    };
    let Some((variable, series)) = variables
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != time_index)
        .find_map(|(_, v)| {
            v.numbers()
                .filter(|values| values.len() >= MIN_SERIES_LENGTH)
                .map(|values| (&v.name, values))
        })
    else {
        debug!(
            time_column = time_column.name,
            "time series skipped: no numerical series with enough values"
        );
        return None;
    };
    TimeSeriesResult::from_series(&time_column.name, variable, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawCell;

    #[test]
    fn test_trend_classification() {
        assert_eq!(classify_trend(10.0, 10.6).0, Trend::Increasing);
        assert_eq!(classify_trend(10.0, 10.4).0, Trend::Stable);
        assert_eq!(classify_trend(-10.0, -11.0).0, Trend::Decreasing);
        assert_eq!(classify_trend(0.0, 1.0), (Trend::Increasing, 0.0));
        assert_eq!(classify_trend(0.0, -1.0).0, Trend::Decreasing);
        assert_eq!(classify_trend(0.0, 0.0).0, Trend::Stable);
    }

    #[test]
    fn test_series_lags_and_seasonality() {
        let series = (0..40)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect::<Vec<_>>();
        let result = TimeSeriesResult::from_series("t", "x", &series).unwrap();
        assert_eq!(result.n, 40);
        assert_eq!(result.autocorrelations.len(), 10);
        assert!(result.seasonality);
        assert_eq!(result.trend, Trend::Stable);

        let short = (0..12).map(f64::from).collect::<Vec<_>>();
        let result = TimeSeriesResult::from_series("t", "x", &short).unwrap();
        assert_eq!(result.autocorrelations.len(), 3);
        assert_eq!(result.trend, Trend::Increasing);
        assert!(TimeSeriesResult::from_series("t", "x", &short[..9]).is_none());
    }

    #[test]
    fn test_relative_change_out_of_range() {
        let series = (0..12)
            .map(|i| if i < 6 { 1e-300 } else { 1e10 })
            .collect::<Vec<_>>();
        assert!(TimeSeriesResult::from_series("t", "x", &series).is_none());
    }

    fn variable(name: &str, cells: &[RawCell]) -> Variable {
        Variable::from_cells(name, cells)
    }

    #[test]
    fn test_series_selection() {
        let times = (0..12).map(|i| RawCell::from(f64::from(i))).collect::<Vec<_>>();
        let values = (0..12)
            .map(|i| RawCell::from(f64::from(i * 3)))
            .collect::<Vec<_>>();
        // numerical time column is never its own series
        let vars = vec![
            variable("Timestamp", &times),
            variable("value", &values),
        ];
        let result = analyze_time_series(&vars).unwrap();
        assert_eq!(result.time_column, "Timestamp");
        assert_eq!(result.variable, "value");

        let vars = vec![variable("value", &values)];
        assert!(analyze_time_series(&vars).is_none());
    }
}
