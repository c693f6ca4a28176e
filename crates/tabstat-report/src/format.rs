/// Formats a statistic compactly: fixed-point for ordinary magnitudes,
/// scientific notation for very large or very small ones.
#[must_use]
pub fn fmt_num(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        "0".to_owned()
    } else if !(1e-3..1e6).contains(&magnitude) {
        format!("{value:.3e}")
    } else {
        format!("{value:.3}")
    }
}

/// Formats a p-value with its comparison operator, e.g. `"< 0.001"`.
#[must_use]
pub fn fmt_p(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_owned()
    } else {
        format!("= {p:.3}")
    }
}
