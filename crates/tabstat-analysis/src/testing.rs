//! Per-variable hypothesis tests
//!
//! Every numerical variable gets a normality test (Shapiro-Wilk, or
//! Jarque-Bera above [`SHAPIRO_WILK_MAX_N`] values) and a one-sample t-test
//! against zero. A test whose statistic is undefined for the data, such as
//! either test on a constant variable, is skipped.

use serde::{Deserialize, Serialize};
use tabstat_stats::{
    descriptive,
    distribution::students_t_two_sided,
    normality::{self, NormalityResult, SHAPIRO_WILK_MAX_N},
};
use tracing::debug;

use crate::{SIGNIFICANCE_LEVEL, variable::NumericView};

/// Reference mean of the one-sample t-test.
pub const T_TEST_MU0: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    #[display("Shapiro-Wilk")]
    ShapiroWilk,
    #[display("Jarque-Bera")]
    JarqueBera,
    #[display("one-sample t-test")]
    OneSampleT,
}

impl TestKind {
    #[must_use]
    pub fn is_normality(self) -> bool {
        matches!(self, TestKind::ShapiroWilk | TestKind::JarqueBera)
    }
}

/// Outcome of one hypothesis test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTest {
    /// Display name, e.g. `"One-sample t-test (age)"`.
    pub name: String,
    pub variable: String,
    pub kind: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: Option<f64>,
    /// `p_value <= 0.05`.
    pub significant: bool,
    /// One-sentence reading of the result.
    pub interpretation: String,
}

impl HypothesisTest {
    fn new(
        kind: TestKind,
        variable: &str,
        statistic: f64,
        p_value: f64,
        degrees_of_freedom: Option<f64>,
    ) -> Self {
        let p_value = p_value.clamp(0.0, 1.0);
        let significant = p_value <= SIGNIFICANCE_LEVEL;
        let name = match kind {
            TestKind::ShapiroWilk => format!("Shapiro-Wilk normality test ({variable})"),
            TestKind::JarqueBera => format!("Jarque-Bera normality test ({variable})"),
            TestKind::OneSampleT => format!("One-sample t-test ({variable})"),
        };
        let interpretation = match (kind.is_normality(), significant) {
            (true, true) => format!(
                "The distribution of '{variable}' departs significantly from normality (p = {p_value:.4})."
            ),
            (true, false) => format!(
                "The distribution of '{variable}' is consistent with normality (p = {p_value:.4})."
            ),
            (false, true) => format!(
                "The mean of '{variable}' differs significantly from {T_TEST_MU0} (p = {p_value:.4})."
            ),
            (false, false) => format!(
                "The mean of '{variable}' does not differ significantly from {T_TEST_MU0} (p = {p_value:.4})."
            ),
        };
        Self {
            name,
            variable: variable.to_owned(),
            kind,
            statistic,
            p_value,
            degrees_of_freedom,
            significant,
            interpretation,
        }
    }
}

/// Normality test for a variable with more than three values.
#[must_use]
pub fn normality_test(var: &NumericView<'_>) -> Option<HypothesisTest> {
    let n = var.values.len();
    if n <= 3 {
        debug!(variable = var.name, n, "normality test skipped: too few values");
        return None;
    }
    let (kind, result) = if n <= SHAPIRO_WILK_MAX_N {
        (TestKind::ShapiroWilk, normality::shapiro_wilk(var.values))
    } else {
        (TestKind::JarqueBera, normality::jarque_bera(var.values))
    };
    let Some(NormalityResult { statistic, p_value }) = result else {
        debug!(variable = var.name, "normality test skipped: constant values");
        return None;
    };
    let df = (kind == TestKind::JarqueBera).then_some(2.0);
    Some(HypothesisTest::new(kind, var.name, statistic, p_value, df))
}

/// One-sample two-sided t-test of `mean == 0` for a variable with more
/// than one value.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn one_sample_t_test(var: &NumericView<'_>) -> Option<HypothesisTest> {
    let n = var.values.len();
    if n <= 1 {
        debug!(variable = var.name, n, "t-test skipped: too few values");
        return None;
    }
    let mean = descriptive::mean(var.values)?;
    let sd = descriptive::sample_std_dev(var.values)?;
    if sd <= f64::MIN_POSITIVE {
        debug!(variable = var.name, "t-test skipped: zero variance");
        return None;
    }
    let df = (n - 1) as f64;
    let t = (mean - T_TEST_MU0) / (sd / (n as f64).sqrt());
    if !(sd.is_finite() && t.is_finite()) {
        debug!(variable = var.name, "t-test skipped: statistic out of range");
        return None;
    }
    let p = students_t_two_sided(t, df)?;
    Some(HypothesisTest::new(
        TestKind::OneSampleT,
        var.name,
        t,
        p,
        Some(df),
    ))
}

/// Runs every applicable test, variable by variable.
#[must_use]
pub fn run_tests(variables: &[NumericView<'_>]) -> Vec<HypothesisTest> {
    variables
        .iter()
        .flat_map(|var| [normality_test(var), one_sample_t_test(var)])
        .flatten()
        .collect()
}
