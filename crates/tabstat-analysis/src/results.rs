use serde::{Deserialize, Serialize};

use crate::{
    alignment::Alignment,
    control_chart::QcChart,
    correlation::CorrelationMatrix,
    descriptive::VariableSummary,
    outlier::OutlierReport,
    quality::DataQuality,
    regression::RegressionResult,
    testing::HypothesisTest,
    time_series::TimeSeriesResult,
    variable::{Variable, VariableKind},
};

/// Configuration of one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Pairing of variables for correlation and regression.
    pub alignment: Alignment,
    /// Rational subgroup size for X̄-R charts; individuals charts when `None`.
    pub qc_subgroup_size: Option<usize>,
}

/// Shape of the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Data rows, header excluded.
    pub rows: usize,
    /// Header cells.
    pub columns: usize,
    pub numerical_variables: usize,
    pub categorical_variables: usize,
    /// `rows · columns`.
    pub total_cells: usize,
    /// Missing or blank cells over the whole table.
    pub missing_cells: usize,
}

/// Name and type of one detected variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    /// Column header.
    pub name: String,
    pub kind: VariableKind,
    /// Number of values kept after detection.
    pub count: usize,
    /// Missing or blank cells in the column.
    pub missing_count: usize,
}

impl From<&Variable> for VariableInfo {
    fn from(var: &Variable) -> Self {
        Self {
            name: var.name.clone(),
            kind: var.kind(),
            count: var.len(),
            missing_count: var.missing_count,
        }
    }
}

/// Everything one analysis produces.
///
/// Optional sections are `None` (or empty) when their preconditions were
/// not met; no field ever holds NaN or infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalResults {
    pub overview: Overview,
    /// One entry per column, in column order.
    pub variables: Vec<VariableInfo>,
    /// One summary per column, in column order.
    pub descriptive: Vec<VariableSummary>,
    /// Present with at least two numerical variables.
    pub correlation: Option<CorrelationMatrix>,
    /// Normality test and t-test of each numerical variable, where defined.
    pub hypothesis_tests: Vec<HypothesisTest>,
    /// Numerical variables with at least one value outside its fences.
    pub outliers: Vec<OutlierReport>,
    /// Fitted pairs in `(predictor, response)` column order.
    pub regressions: Vec<RegressionResult>,
    /// Present when a time or date column and a long enough series exist.
    pub time_series: Option<TimeSeriesResult>,
    /// One chart per numerical variable with computable limits.
    pub qc_charts: Vec<QcChart>,
    pub data_quality: DataQuality,
}

impl StatisticalResults {
    pub fn numerical_variables(&self) -> impl Iterator<Item = &VariableInfo> {
        self.variables
            .iter()
            .filter(|v| v.kind == VariableKind::Numerical)
    }

    /// Tests with `significant == true`.
    pub fn significant_tests(&self) -> impl Iterator<Item = &HypothesisTest> {
        self.hypothesis_tests.iter().filter(|t| t.significant)
    }

    #[must_use]
    pub fn outlier_count(&self) -> usize {
        self.outliers.iter().map(OutlierReport::count).sum()
    }
}
