//! Report rendering
//!
//! Writes the interpretation followed by every result section. Plain text
//! uses fixed-width tables for the terminal; Markdown is the paginated
//! document format, with a page break before every top-level section.
//!
//! Missing or empty sections render a one-line "not available" note, so any
//! [`StatisticalResults`] can be rendered.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tabstat_analysis::{
    StatisticalResults,
    control_chart::ChartKind,
    descriptive::VariableSummary,
};

use crate::{
    format::{fmt_num, fmt_p},
    interpretation::Interpretation,
};

/// Page-break marker understood by Markdown-to-PDF converters.
pub const PAGE_BREAK: &str = "<div style=\"page-break-after: always;\"></div>";

/// Maximum number of frequencies listed per categorical variable.
const MAX_FREQUENCIES: usize = 10;
/// Maximum number of outlier values listed per variable.
const MAX_OUTLIER_VALUES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    #[display("text")]
    Text,
    #[display("markdown")]
    Markdown,
}

/// Front matter of a report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportMeta {
    pub title: String,
    pub file_name: String,
    /// Preformatted generation timestamp.
    pub generated_at: String,
    pub question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Renderer<'w, W> {
    out: &'w mut W,
    format: ReportFormat,
    sections: usize,
}

impl<W> Renderer<'_, W>
where
    W: Write,
{
    fn title(&mut self, title: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                writeln!(self.out, "{title}")?;
                writeln!(self.out, "{}", "=".repeat(title.chars().count()))?;
            }
            ReportFormat::Markdown => writeln!(self.out, "# {title}")?,
        }
        writeln!(self.out)
    }

    fn section(&mut self, heading: &str) -> io::Result<()> {
        if self.format == ReportFormat::Markdown && self.sections > 0 {
            writeln!(self.out, "{PAGE_BREAK}")?;
            writeln!(self.out)?;
        }
        self.sections += 1;
        match self.format {
            ReportFormat::Text => {
                writeln!(self.out, "{heading}")?;
                writeln!(self.out, "{}", "-".repeat(heading.chars().count()))?;
            }
            ReportFormat::Markdown => writeln!(self.out, "## {heading}")?,
        }
        writeln!(self.out)
    }

    fn subsection(&mut self, heading: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(self.out, "[{heading}]")?,
            ReportFormat::Markdown => writeln!(self.out, "### {heading}")?,
        }
        writeln!(self.out)
    }

    fn paragraph(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out)
    }

    fn not_available(&mut self, what: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => self.paragraph(&format!("{what}: not available.")),
            ReportFormat::Markdown => self.paragraph(&format!("_{what}: not available._")),
        }
    }

    fn bullets<I, S>(&mut self, items: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            let marker = match self.format {
                ReportFormat::Text => "  *",
                ReportFormat::Markdown => "-",
            };
            writeln!(self.out, "{marker} {}", item.as_ref())?;
        }
        writeln!(self.out)
    }

    fn key_values(&mut self, pairs: &[(&str, String)]) -> io::Result<()> {
        let rows = pairs
            .iter()
            .map(|(k, v)| vec![(*k).to_owned(), v.clone()])
            .collect::<Vec<_>>();
        self.table(&[("Item", Align::Left), ("Value", Align::Right)], &rows)
    }

    fn table(&mut self, columns: &[(&str, Align)], rows: &[Vec<String>]) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                let widths = columns
                    .iter()
                    .enumerate()
                    .map(|(i, (name, _))| {
                        rows.iter()
                            .map(|row| row[i].chars().count())
                            .chain([name.chars().count()])
                            .max()
                            .unwrap_or(0)
                    })
                    .collect::<Vec<_>>();
                let header = columns.iter().map(|(name, _)| *name).collect::<Vec<_>>();
                writeln!(self.out, "  {}", text_row(&header, columns, &widths))?;
                let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
                writeln!(self.out, "  {}", "-".repeat(total))?;
                for row in rows {
                    let cells = row.iter().map(String::as_str).collect::<Vec<_>>();
                    writeln!(self.out, "  {}", text_row(&cells, columns, &widths))?;
                }
            }
            ReportFormat::Markdown => {
                let escape = |cell: &str| cell.replace('|', "\\|");
                let header = columns
                    .iter()
                    .map(|(name, _)| escape(*name))
                    .collect::<Vec<_>>();
                writeln!(self.out, "| {} |", header.join(" | "))?;
                let rule = columns
                    .iter()
                    .map(|(_, align)| match align {
                        Align::Left => "---",
                        Align::Right => "---:",
                    })
                    .collect::<Vec<_>>();
                writeln!(self.out, "| {} |", rule.join(" | "))?;
                for row in rows {
                    let cells = row.iter().map(|c| escape(c)).collect::<Vec<_>>();
                    writeln!(self.out, "| {} |", cells.join(" | "))?;
                }
            }
        }
        writeln!(self.out)
    }
}

fn text_row(cells: &[&str], columns: &[(&str, Align)], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(columns)
        .zip(widths)
        .map(|((cell, (_, align)), &width)| match align {
            Align::Left => format!("{cell:<width$}"),
            Align::Right => format!("{cell:>width$}"),
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

/// Renders a complete report.
///
/// # Errors
///
/// Returns any I/O error of `writer`.
pub fn render_report<W>(
    writer: &mut W,
    results: &StatisticalResults,
    interpretation: &Interpretation,
    format: ReportFormat,
    meta: &ReportMeta,
) -> io::Result<()>
where
    W: Write,
{
    let mut r = Renderer {
        out: writer,
        format,
        sections: 0,
    };

    r.title(&meta.title)?;
    let mut front = vec![
        ("File", meta.file_name.clone()),
        ("Generated", meta.generated_at.clone()),
    ];
    if let Some(question) = &meta.question {
        front.push(("Question", question.clone()));
    }
    r.key_values(&front)?;

    render_interpretation(&mut r, interpretation)?;
    render_overview(&mut r, results)?;
    render_descriptive(&mut r, results)?;
    render_correlation(&mut r, results)?;
    render_tests(&mut r, results)?;
    render_outliers(&mut r, results)?;
    render_regressions(&mut r, results)?;
    render_time_series(&mut r, results)?;
    render_qc_charts(&mut r, results)?;
    render_quality(&mut r, results)?;
    r.out.flush()
}

fn render_interpretation<W: Write>(
    r: &mut Renderer<'_, W>,
    interp: &Interpretation,
) -> io::Result<()> {
    r.section("Executive Summary")?;
    r.paragraph(&interp.executive_summary)?;

    r.subsection("Key Findings")?;
    if interp.key_findings.is_empty() {
        r.not_available("Key findings")?;
    } else {
        r.bullets(&interp.key_findings)?;
    }
    r.subsection("Statistical Significance")?;
    r.paragraph(&interp.statistical_significance)?;
    r.subsection("Practical Implications")?;
    r.paragraph(&interp.practical_implications)?;
    r.subsection("Limitations")?;
    r.paragraph(&interp.limitations)?;
    r.subsection("Recommendations")?;
    if interp.recommendations.is_empty() {
        r.not_available("Recommendations")?;
    } else {
        r.bullets(&interp.recommendations)?;
    }
    r.subsection("Methodology")?;
    r.paragraph(&interp.methodology)
}

fn render_overview<W: Write>(r: &mut Renderer<'_, W>, results: &StatisticalResults) -> io::Result<()> {
    let o = &results.overview;
    r.section("Data Overview")?;
    r.key_values(&[
        ("Rows", o.rows.to_string()),
        ("Columns", o.columns.to_string()),
        ("Numerical variables", o.numerical_variables.to_string()),
        ("Categorical variables", o.categorical_variables.to_string()),
        ("Missing cells", format!("{} / {}", o.missing_cells, o.total_cells)),
    ])?;
    let rows = results
        .variables
        .iter()
        .map(|v| {
            vec![
                v.name.clone(),
                v.kind.to_string(),
                v.count.to_string(),
                v.missing_count.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    r.table(
        &[
            ("Variable", Align::Left),
            ("Type", Align::Left),
            ("Values", Align::Right),
            ("Missing", Align::Right),
        ],
        &rows,
    )
}

fn render_descriptive<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Descriptive Statistics")?;
    let numerical = results
        .descriptive
        .iter()
        .filter_map(|s| match s {
            VariableSummary::Numerical(n) => Some(vec![
                n.variable.clone(),
                n.count.to_string(),
                fmt_num(n.mean),
                fmt_num(n.median),
                fmt_num(n.mode),
                fmt_num(n.std_dev),
                fmt_num(n.min),
                fmt_num(n.q1),
                fmt_num(n.q3),
                fmt_num(n.max),
            ]),
            VariableSummary::Categorical(_) => None,
        })
        .collect::<Vec<_>>();
    r.subsection("Numerical Variables")?;
    if numerical.is_empty() {
        r.not_available("Numerical summaries")?;
    } else {
        r.table(
            &[
                ("Variable", Align::Left),
                ("N", Align::Right),
                ("Mean", Align::Right),
                ("Median", Align::Right),
                ("Mode", Align::Right),
                ("Std Dev", Align::Right),
                ("Min", Align::Right),
                ("Q1", Align::Right),
                ("Q3", Align::Right),
                ("Max", Align::Right),
            ],
            &numerical,
        )?;
    }

    r.subsection("Categorical Variables")?;
    let mut any = false;
    for summary in &results.descriptive {
        let VariableSummary::Categorical(c) = summary else {
            continue;
        };
        any = true;
        r.paragraph(&format!(
            "{} ({} values, {} distinct, mode '{}')",
            c.variable,
            c.count,
            c.frequencies.len(),
            c.mode
        ))?;
        let rows = c
            .frequencies
            .iter()
            .take(MAX_FREQUENCIES)
            .map(|f| vec![f.value.clone(), f.count.to_string()])
            .collect::<Vec<_>>();
        r.table(&[("Value", Align::Left), ("Count", Align::Right)], &rows)?;
    }
    if !any {
        r.not_available("Categorical summaries")?;
    }
    Ok(())
}

fn render_correlation<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Correlation Matrix")?;
    let Some(corr) = &results.correlation else {
        return r.not_available("Correlation analysis (fewer than two numerical variables)");
    };
    let mut columns = vec![("", Align::Left)];
    columns.extend(corr.variables.iter().map(|v| (v.as_str(), Align::Right)));
    let rows = corr
        .variables
        .iter()
        .zip(&corr.r)
        .map(|(name, row)| {
            let mut cells = vec![name.clone()];
            cells.extend(row.iter().map(|v| format!("{v:.3}")));
            cells
        })
        .collect::<Vec<_>>();
    r.table(&columns, &rows)?;

    let significant = corr
        .ranked_pairs()
        .into_iter()
        .filter(|&(i, j)| corr.p_values[i][j] <= tabstat_analysis::SIGNIFICANCE_LEVEL)
        .map(|(i, j)| {
            format!(
                "{} / {}: r = {:.3}, p {}, n = {}",
                corr.variables[i],
                corr.variables[j],
                corr.r[i][j],
                fmt_p(corr.p_values[i][j]),
                corr.sample_sizes[i][j]
            )
        })
        .collect::<Vec<_>>();
    if significant.is_empty() {
        r.paragraph("No correlation is significant at the 5% level.")
    } else {
        r.bullets(&significant)
    }
}

fn render_tests<W: Write>(r: &mut Renderer<'_, W>, results: &StatisticalResults) -> io::Result<()> {
    r.section("Hypothesis Tests")?;
    if results.hypothesis_tests.is_empty() {
        return r.not_available("Hypothesis tests");
    }
    let rows = results
        .hypothesis_tests
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                fmt_num(t.statistic),
                fmt_p(t.p_value),
                t.degrees_of_freedom.map_or("-".to_owned(), fmt_num),
                if t.significant { "yes" } else { "no" }.to_owned(),
            ]
        })
        .collect::<Vec<_>>();
    r.table(
        &[
            ("Test", Align::Left),
            ("Statistic", Align::Right),
            ("p-value", Align::Right),
            ("df", Align::Right),
            ("Significant", Align::Right),
        ],
        &rows,
    )?;
    r.bullets(results.hypothesis_tests.iter().map(|t| &t.interpretation))
}

fn render_outliers<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Outliers")?;
    if results.outliers.is_empty() {
        return r.not_available("Outliers (none detected)");
    }
    let rows = results
        .outliers
        .iter()
        .map(|o| {
            let mut values = o
                .values
                .iter()
                .take(MAX_OUTLIER_VALUES)
                .map(|v| fmt_num(*v))
                .collect::<Vec<_>>()
                .join(", ");
            if o.values.len() > MAX_OUTLIER_VALUES {
                values.push_str(", ...");
            }
            vec![
                o.variable.clone(),
                fmt_num(o.lower_fence),
                fmt_num(o.upper_fence),
                o.count().to_string(),
                values,
            ]
        })
        .collect::<Vec<_>>();
    r.table(
        &[
            ("Variable", Align::Left),
            ("Lower fence", Align::Right),
            ("Upper fence", Align::Right),
            ("Count", Align::Right),
            ("Values", Align::Left),
        ],
        &rows,
    )
}

fn render_regressions<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Regression Analysis")?;
    if results.regressions.is_empty() {
        return r.not_available("Regression analysis");
    }
    let rows = results
        .regressions
        .iter()
        .map(|g| {
            vec![
                format!("{} ~ {}", g.response, g.predictor),
                g.n.to_string(),
                fmt_num(g.intercept),
                fmt_num(g.slope),
                format!("{:.3}", g.r_squared),
                format!("{:.3}", g.adjusted_r_squared),
                fmt_num(g.f_statistic),
                fmt_p(g.p_value),
            ]
        })
        .collect::<Vec<_>>();
    r.table(
        &[
            ("Model", Align::Left),
            ("n", Align::Right),
            ("Intercept", Align::Right),
            ("Slope", Align::Right),
            ("R²", Align::Right),
            ("Adj. R²", Align::Right),
            ("F", Align::Right),
            ("p-value", Align::Right),
        ],
        &rows,
    )
}

fn render_time_series<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Time Series")?;
    let Some(ts) = &results.time_series else {
        return r.not_available("Time-series analysis");
    };
    let acf = ts
        .autocorrelations
        .iter()
        .enumerate()
        .map(|(lag, v)| format!("{}: {v:.3}", lag + 1))
        .collect::<Vec<_>>()
        .join(", ");
    r.key_values(&[
        ("Time column", ts.time_column.clone()),
        ("Variable", ts.variable.clone()),
        ("Observations", ts.n.to_string()),
        ("Trend", ts.trend.to_string()),
        ("Relative change", format!("{:+.1}%", ts.relative_change * 100.0)),
        ("Seasonality", if ts.seasonality { "yes" } else { "no" }.to_owned()),
    ])?;
    if acf.is_empty() {
        Ok(())
    } else {
        r.paragraph(&format!("Autocorrelation by lag: {acf}"))
    }
}

fn render_qc_charts<W: Write>(
    r: &mut Renderer<'_, W>,
    results: &StatisticalResults,
) -> io::Result<()> {
    r.section("Quality Control Charts")?;
    if results.qc_charts.is_empty() {
        return r.not_available("Control charts");
    }
    let rows = results
        .qc_charts
        .iter()
        .map(|c| {
            let kind = match c.kind {
                ChartKind::Individuals => "Individuals".to_owned(),
                ChartKind::XBarR { subgroup_size } => format!("X-bar R (n = {subgroup_size})"),
            };
            vec![
                c.variable.clone(),
                kind,
                fmt_num(c.center_line),
                fmt_num(c.ucl),
                fmt_num(c.lcl),
                c.data_points.len().to_string(),
                c.out_of_control_indices.len().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    r.table(
        &[
            ("Variable", Align::Left),
            ("Chart", Align::Left),
            ("CL", Align::Right),
            ("UCL", Align::Right),
            ("LCL", Align::Right),
            ("Points", Align::Right),
            ("Out of control", Align::Right),
        ],
        &rows,
    )?;
    let ranges = results
        .qc_charts
        .iter()
        .filter_map(|c| {
            c.range_limits.map(|l| {
                format!(
                    "{} range chart: CL {}, UCL {}, LCL {}",
                    c.variable,
                    fmt_num(l.center_line),
                    fmt_num(l.ucl),
                    fmt_num(l.lcl)
                )
            })
        })
        .collect::<Vec<_>>();
    if ranges.is_empty() {
        Ok(())
    } else {
        r.bullets(&ranges)
    }
}

fn render_quality<W: Write>(r: &mut Renderer<'_, W>, results: &StatisticalResults) -> io::Result<()> {
    let q = &results.data_quality;
    r.section("Data Quality")?;
    r.key_values(&[
        ("Score", format!("{:.1} / 100", q.score)),
        ("Grade", q.grade.to_string()),
        ("Missing", format!("{:.1}%", q.missing_percentage)),
        ("Outliers", format!("{:.1}%", q.outlier_percentage)),
        ("Non-normal tests", format!("{:.0}%", q.non_normal_fraction * 100.0)),
    ])
}
