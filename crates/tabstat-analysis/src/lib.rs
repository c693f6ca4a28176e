//! Statistical analysis engine for tabular data.
//!
//! Takes a table of raw cells and produces a [`StatisticalResults`] document
//! in a single synchronous pass. The engine never fails because a single
//! sub-analysis lacks data; that part of the result is simply absent.
//!
//! # Pipeline
//!
//! 1. [`table`]: validate the raw table
//! 2. [`variable`]: classify every column as numerical or categorical
//! 3. Run the independent sub-analyses:
//!    - [`descriptive`]: per-variable summaries
//!    - [`correlation`]: Pearson correlation matrix
//!    - [`testing`]: normality and one-sample t-tests
//!    - [`outlier`]: Tukey fences
//!    - [`regression`]: pairwise simple linear regression
//!    - [`time_series`]: trend and autocorrelation
//!    - [`control_chart`]: individuals or X̄-R charts
//! 4. [`quality`]: score the data
//!
//! # Examples
//!
//! ```
//! use tabstat_analysis::{analyze, table::RawCell};
//!
//! let headers = vec!["x".to_owned(), "y".to_owned()];
//! let rows = (0..20)
//!     .map(|i| {
//!         let x = f64::from(i);
//!         vec![RawCell::from(x), RawCell::from(3.0 * x - 2.0)]
//!     })
//!     .collect();
//!
//! let results = analyze(headers, rows).unwrap();
//! assert_eq!(results.overview.numerical_variables, 2);
//! assert_eq!(results.regressions.len(), 1);
//! assert!((results.regressions[0].slope - 3.0).abs() < 1e-9);
//! ```

use tracing::{debug, info};

use crate::{
    control_chart::{build_charts, validate_subgroup_size},
    correlation::CorrelationMatrix,
    descriptive::describe,
    outlier::detect_outliers,
    quality::{DataQuality, QualityInputs},
    regression::fit_pairs,
    table::{RawCell, RawTable},
    testing::run_tests,
    time_series::analyze_time_series,
    variable::{VariableKind, detect_variables, numeric_views},
};

pub use self::{
    error::AnalysisError,
    results::{AnalysisOptions, Overview, StatisticalResults, VariableInfo},
};

pub mod alignment;
pub mod control_chart;
pub mod correlation;
pub mod descriptive;
mod error;
pub mod outlier;
pub mod quality;
pub mod regression;
mod results;
pub mod table;
pub mod testing;
pub mod time_series;
pub mod variable;

/// Significance level of every test in the engine.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Analyzes a table with the default [`AnalysisOptions`].
///
/// # Errors
///
/// Returns an [`AnalysisError`] if the table is malformed: no columns, no
/// rows, a row whose length differs from the header, or a column without
/// any value.
pub fn analyze(
    headers: Vec<String>,
    rows: Vec<Vec<RawCell>>,
) -> Result<StatisticalResults, AnalysisError> {
    let table = RawTable::new(headers, rows)?;
    analyze_with(&table, &AnalysisOptions::default())
}

/// Analyzes a validated table.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyColumn`] for a column without values and
/// [`AnalysisError::InvalidOption`] for an unsupported QC subgroup size.
pub fn analyze_with(
    table: &RawTable,
    options: &AnalysisOptions,
) -> Result<StatisticalResults, AnalysisError> {
    validate_subgroup_size(options.qc_subgroup_size)?;

    let variables = detect_variables(table);
    let descriptive = describe(&variables)?;
    let numeric = numeric_views(&variables);
    debug!(
        variables = variables.len(),
        numerical = numeric.len(),
        "variables detected"
    );

    let correlation = CorrelationMatrix::new(&numeric, options.alignment);
    if correlation.is_none() {
        debug!("correlation skipped: fewer than two numerical variables");
    }
    let hypothesis_tests = run_tests(&numeric);
    let outliers = detect_outliers(&numeric);
    let regressions = fit_pairs(&numeric, options.alignment);
    let time_series = analyze_time_series(&variables);
    let qc_charts = build_charts(&numeric, options.qc_subgroup_size)?;

    let total_cells = table.num_rows() * table.num_columns();
    let missing_cells = variables.iter().map(|v| v.missing_count).sum();
    let numerical_values = numeric.iter().map(|v| v.values.len()).sum();
    let data_quality = DataQuality::score(&QualityInputs::collect(
        total_cells,
        missing_cells,
        numerical_values,
        &outliers,
        &hypothesis_tests,
    ));

    let overview = Overview {
        rows: table.num_rows(),
        columns: table.num_columns(),
        numerical_variables: numeric.len(),
        categorical_variables: variables
            .iter()
            .filter(|v| v.kind() == VariableKind::Categorical)
            .count(),
        total_cells,
        missing_cells,
    };

    info!(
        rows = overview.rows,
        columns = overview.columns,
        tests = hypothesis_tests.len(),
        regressions = regressions.len(),
        qc_charts = qc_charts.len(),
        score = data_quality.score,
        grade = %data_quality.grade,
        "analysis completed"
    );

    Ok(StatisticalResults {
        overview,
        variables: variables.iter().map(VariableInfo::from).collect(),
        descriptive,
        correlation,
        hypothesis_tests,
        outliers,
        regressions,
        time_series,
        qc_charts,
        data_quality,
    })
}
