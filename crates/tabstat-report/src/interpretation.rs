//! Narrative interpretation of analysis results
//!
//! An [`Interpreter`] turns [`StatisticalResults`] into prose. The
//! [`TemplateInterpreter`] always succeeds and is the fallback for any
//! external interpreter via [`interpret_or_fallback`].

use std::io;

use serde::{Deserialize, Serialize};
use tabstat_analysis::{
    SIGNIFICANCE_LEVEL, StatisticalResults,
    correlation::CorrelationMatrix,
    quality::Grade,
    time_series::Trend,
};
use tracing::warn;

use crate::format::{fmt_num, fmt_p};

/// Minimum |r| reported as a strong correlation.
const STRONG_CORRELATION: f64 = 0.7;
/// Minimum |r| reported as a moderate correlation.
const MODERATE_CORRELATION: f64 = 0.4;
/// Below this many rows, results are flagged as low-powered.
const SMALL_SAMPLE: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub statistical_significance: String,
    pub practical_implications: String,
    pub limitations: String,
    pub recommendations: Vec<String>,
    pub methodology: String,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum InterpretError {
    #[display("interpreter command failed: {message}")]
    Command { message: String },
    #[display("interpreter I/O failed")]
    #[from]
    Io(io::Error),
    #[display("interpreter returned an invalid interpretation: {message}")]
    Parse { message: String },
}

/// Produces an [`Interpretation`] of analysis results.
pub trait Interpreter {
    /// Interprets `results`, optionally focusing on a user `question`.
    fn interpret(
        &self,
        results: &StatisticalResults,
        question: Option<&str>,
    ) -> Result<Interpretation, InterpretError>;
}

/// Builds a generic interpretation from fixed templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateInterpreter;

impl Interpreter for TemplateInterpreter {
    fn interpret(
        &self,
        results: &StatisticalResults,
        question: Option<&str>,
    ) -> Result<Interpretation, InterpretError> {
        Ok(Self::build(results, question))
    }
}

impl TemplateInterpreter {
    /// Infallible form of [`Interpreter::interpret`].
    #[must_use]
    pub fn build(results: &StatisticalResults, question: Option<&str>) -> Interpretation {
        Interpretation {
            executive_summary: executive_summary(results, question),
            key_findings: key_findings(results),
            statistical_significance: statistical_significance(results),
            practical_implications: practical_implications(results),
            limitations: limitations(results),
            recommendations: recommendations(results),
            methodology: METHODOLOGY.to_owned(),
        }
    }
}

/// Tries `primary` and falls back to the template on any error.
pub fn interpret_or_fallback(
    primary: &dyn Interpreter,
    results: &StatisticalResults,
    question: Option<&str>,
) -> Interpretation {
    match primary.interpret(results, question) {
        Ok(interpretation) => interpretation,
        Err(err) => {
            warn!(error = %err, "interpreter failed; using template interpretation");
            TemplateInterpreter::build(results, question)
        }
    }
}

const METHODOLOGY: &str = "Columns were classified as numerical when more than 80% of their \
non-missing cells parse as numbers. Numerical variables were summarized with population \
moments and linearly interpolated quartiles. Pairwise association was measured with Pearson \
correlation and simple least-squares regression. Normality was assessed with the \
Shapiro-Wilk test (Jarque-Bera for very large samples) and means were compared with zero \
using one-sample t-tests, all at the 5% significance level. Outliers were flagged with \
Tukey's 1.5 IQR fences, process stability with Shewhart control charts, and time-ordered \
data with half-mean trends and autocorrelation.";

fn executive_summary(results: &StatisticalResults, question: Option<&str>) -> String {
    let overview = &results.overview;
    let quality = &results.data_quality;
    let significant = results.significant_tests().count();
    let mut summary = format!(
        "The dataset contains {} rows and {} columns ({} numerical, {} categorical). \
         Overall data quality is {} with a score of {:.0}/100. \
         {} of {} hypothesis tests were significant at the {}% level.",
        overview.rows,
        overview.columns,
        overview.numerical_variables,
        overview.categorical_variables,
        quality.grade,
        quality.score,
        significant,
        results.hypothesis_tests.len(),
        SIGNIFICANCE_LEVEL * 100.0,
    );
    if let Some(question) = question.map(str::trim).filter(|q| !q.is_empty()) {
        summary.push_str(&format!(
            " This report was prepared to address the question: \"{question}\"."
        ));
    }
    summary
}

fn correlation_strength(r: f64) -> Option<&'static str> {
    let r = r.abs();
    if r >= STRONG_CORRELATION {
        Some("strong")
    } else if r >= MODERATE_CORRELATION {
        Some("moderate")
    } else {
        None
    }
}

fn correlation_findings(corr: &CorrelationMatrix) -> Vec<String> {
    corr.ranked_pairs()
        .into_iter()
        .filter(|&(i, j)| corr.p_values[i][j] <= SIGNIFICANCE_LEVEL)
        .filter_map(|(i, j)| {
            let r = corr.r[i][j];
            let strength = correlation_strength(r)?;
            let direction = if r > 0.0 { "positive" } else { "negative" };
            Some(format!(
                "There is a {strength} {direction} correlation between '{}' and '{}' (r = {:.3}, p {}).",
                corr.variables[i],
                corr.variables[j],
                r,
                fmt_p(corr.p_values[i][j]),
            ))
        })
        .take(3)
        .collect()
}

fn key_findings(results: &StatisticalResults) -> Vec<String> {
    let mut findings = vec![];

    if let Some(corr) = &results.correlation {
        findings.extend(correlation_findings(corr));
    }

    findings.extend(
        results
            .regressions
            .iter()
            .filter(|r| r.p_value <= SIGNIFICANCE_LEVEL)
            .map(|r| {
                format!(
                    "Each unit of '{}' is associated with a change of {} in '{}' (R² = {:.3}).",
                    r.predictor,
                    fmt_num(r.slope),
                    r.response,
                    r.r_squared,
                )
            }),
    );

    if let Some(ts) = &results.time_series {
        let mut finding = match ts.trend {
            Trend::Stable => format!("'{}' is stable over '{}'", ts.variable, ts.time_column),
            Trend::Increasing | Trend::Decreasing => {
                let article = if ts.trend == Trend::Increasing { "an" } else { "a" };
                format!(
                    "'{}' shows {article} {} trend over '{}' ({:+.1}% between halves)",
                    ts.variable,
                    ts.trend,
                    ts.time_column,
                    ts.relative_change * 100.0
                )
            }
        };
        if ts.seasonality {
            finding.push_str(", with notable autocorrelation suggesting a recurring pattern");
        }
        finding.push('.');
        findings.push(finding);
    }

    for report in &results.outliers {
        findings.push(format!(
            "'{}' has {} outlier(s) outside [{}, {}].",
            report.variable,
            report.count(),
            fmt_num(report.lower_fence),
            fmt_num(report.upper_fence),
        ));
    }

    for chart in results
        .qc_charts
        .iter()
        .filter(|c| !c.out_of_control_indices.is_empty())
    {
        findings.push(format!(
            "The control chart of '{}' has {} point(s) beyond the control limits.",
            chart.variable,
            chart.out_of_control_indices.len(),
        ));
    }

    if findings.is_empty() {
        findings.push("No notable relationships, trends or anomalies were detected.".to_owned());
    }
    findings
}

fn statistical_significance(results: &StatisticalResults) -> String {
    if results.hypothesis_tests.is_empty() {
        return "No hypothesis tests could be performed on this dataset.".to_owned();
    }
    let significant = results
        .significant_tests()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>();
    if significant.is_empty() {
        format!(
            "None of the {} hypothesis tests reached significance at the {}% level.",
            results.hypothesis_tests.len(),
            SIGNIFICANCE_LEVEL * 100.0
        )
    } else {
        format!(
            "{} of {} hypothesis tests were significant at the {}% level: {}.",
            significant.len(),
            results.hypothesis_tests.len(),
            SIGNIFICANCE_LEVEL * 100.0,
            significant.join("; ")
        )
    }
}

fn practical_implications(results: &StatisticalResults) -> String {
    let mut text = match results.data_quality.grade {
        Grade::Excellent | Grade::Good => {
            "The data is of sufficient quality for the findings to inform decisions.".to_owned()
        }
        Grade::Fair => {
            "The findings are indicative, but data quality issues warrant caution before acting on them."
                .to_owned()
        }
        Grade::Poor => {
            "Data quality is poor; the findings should be treated as exploratory only.".to_owned()
        }
    };
    if results
        .regressions
        .iter()
        .any(|r| r.p_value <= SIGNIFICANCE_LEVEL && r.r_squared >= 0.5)
    {
        text.push_str(
            " At least one regression explains most of the variance of its response and can support forecasting.",
        );
    }
    text
}

fn limitations(results: &StatisticalResults) -> String {
    let mut items = vec![
        "Correlation and regression describe association, not causation.".to_owned(),
    ];
    if results.overview.rows < SMALL_SAMPLE {
        items.push(format!(
            "With only {} rows, the tests have limited statistical power.",
            results.overview.rows
        ));
    }
    if results.data_quality.non_normal_fraction > 0.0 {
        items.push(
            "Some variables depart from normality, which affects tests that assume it.".to_owned(),
        );
    }
    if results.overview.missing_cells > 0 {
        items.push(format!(
            "{:.1}% of the cells are missing and were excluded.",
            results.data_quality.missing_percentage
        ));
    }
    items.join(" ")
}

fn recommendations(results: &StatisticalResults) -> Vec<String> {
    let quality = &results.data_quality;
    let mut items = vec![];
    if quality.missing_percentage > 0.0 {
        items.push("Investigate the source of missing values and consider imputation.".to_owned());
    }
    if quality.outlier_percentage > 0.0 {
        items.push("Review the flagged outliers for data-entry errors or special causes.".to_owned());
    }
    if quality.non_normal_fraction > 0.0 {
        items.push(
            "Use non-parametric methods for variables that are not normally distributed.".to_owned(),
        );
    }
    if results.overview.rows < SMALL_SAMPLE {
        items.push("Collect more observations to increase statistical power.".to_owned());
    }
    if results.qc_charts.iter().any(|c| !c.out_of_control_indices.is_empty()) {
        items.push("Investigate the out-of-control points before relying on process averages.".to_owned());
    }
    if items.is_empty() {
        items.push("Proceed with the analysis; no data issues require attention.".to_owned());
    }
    items
}

#[cfg(test)]
mod tests {
    use tabstat_analysis::{analyze, table::RawCell};

    use super::*;

    fn results() -> StatisticalResults {
        let rows = (0..40)
            .map(|i| {
                let x = f64::from(i);
                vec![
                    RawCell::from(x),
                    RawCell::from(2.0 * x + f64::from(i % 3)),
                    RawCell::from(format!("2024-03-{:02}", i % 28 + 1)),
                ]
            })
            .collect();
        analyze(
            vec!["x".into(), "y".into(), "date".into()],
            rows,
        )
        .unwrap()
    }

    struct Failing;

    impl Interpreter for Failing {
        fn interpret(
            &self,
            _: &StatisticalResults,
            _: Option<&str>,
        ) -> Result<Interpretation, InterpretError> {
            Err(InterpretError::Command {
                message: "exit status 1".into(),
            })
        }
    }

    struct Fixed(Interpretation);

    impl Interpreter for Fixed {
        fn interpret(
            &self,
            _: &StatisticalResults,
            _: Option<&str>,
        ) -> Result<Interpretation, InterpretError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_template_mentions_question_and_findings() {
        let results = results();
        let interp = TemplateInterpreter::build(&results, Some("Does y grow with x?"));
        assert!(interp.executive_summary.contains("40 rows"));
        assert!(interp.executive_summary.contains("Does y grow with x?"));
        assert!(
            interp
                .key_findings
                .iter()
                .any(|f| f.contains("strong positive correlation"))
        );
        assert!(interp.key_findings.iter().any(|f| f.contains("increasing trend")));
        assert!(!interp.recommendations.is_empty());
        assert!(interp.methodology.contains("Shapiro-Wilk"));
    }

    #[test]
    fn test_fallback_on_error() {
        let results = results();
        let interp = interpret_or_fallback(&Failing, &results, None);
        assert_eq!(interp, TemplateInterpreter::build(&results, None));
    }

    #[test]
    fn test_primary_used_when_it_succeeds() {
        let results = results();
        let mut custom = TemplateInterpreter::build(&results, None);
        custom.executive_summary = "custom".into();
        let interp = interpret_or_fallback(&Fixed(custom.clone()), &results, None);
        assert_eq!(interp, custom);
    }

    #[test]
    fn test_interpretation_json_shape() {
        let interp = TemplateInterpreter::build(&results(), None);
        let json = serde_json::to_value(&interp).unwrap();
        for key in [
            "executive_summary",
            "key_findings",
            "statistical_significance",
            "practical_implications",
            "limitations",
            "recommendations",
            "methodology",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
