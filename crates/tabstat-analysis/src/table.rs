//! Raw tabular input
//!
//! A [`RawTable`] is the immutable input of an analysis: column headers plus
//! rows of [`RawCell`]s exactly as a decoder produced them. Nothing is typed
//! yet; the [`variable`](crate::variable) module decides which columns are
//! numerical.
//!
//! # Examples
//!
//! ```
//! use tabstat_analysis::table::{RawCell, RawTable};
//!
//! let table = RawTable::new(
//!     vec!["name".into(), "score".into()],
//!     vec![
//!         vec![RawCell::from("ada"), RawCell::from(91.5)],
//!         vec![RawCell::from("bob"), RawCell::Missing],
//!     ],
//! )
//! .unwrap();
//! assert_eq!(table.num_rows(), 2);
//! assert_eq!(table.column(1).filter(|c| c.is_missing()).count(), 1);
//! ```

use crate::AnalysisError;

/// A single cell as delivered by a decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// No value (empty cell, null).
    Missing,
    /// Textual content, possibly numeric-looking.
    Text(String),
    /// A value the decoder already knew to be numeric.
    Number(f64),
}

impl RawCell {
    /// Whether the cell carries no usable value.
    ///
    /// Blank text and non-finite numbers count as missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            RawCell::Missing => true,
            RawCell::Text(text) => text.trim().is_empty(),
            RawCell::Number(value) => !value.is_finite(),
        }
    }

    /// Parses the cell as a finite number.
    ///
    /// Text is trimmed and must be a complete decimal or scientific literal
    /// (`"42"`, `"-3.5"`, `"+1e3"`, `".5"`); `"inf"`/`"NaN"` are rejected.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Missing => None,
            RawCell::Text(text) => parse_number(text),
            RawCell::Number(value) => value.is_finite().then_some(*value),
        }
    }

    /// String representation used for categorical values.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Missing => String::new(),
            RawCell::Text(text) => text.trim().to_owned(),
            RawCell::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(text: &str) -> Self {
        RawCell::Text(text.to_owned())
    }
}

impl From<String> for RawCell {
    fn from(text: String) -> Self {
        RawCell::Text(text)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl<T> From<Option<T>> for RawCell
where
    T: Into<RawCell>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(RawCell::Missing, Into::into)
    }
}

/// Locale-free parse of a trimmed numeric literal.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // `f64::from_str` also accepts "inf", "infinity" and "nan"
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Column headers plus rows of raw cells.
///
/// Construction validates the shape; the table is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Builds a table, checking that it is non-empty and rectangular.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NoColumns`] if `headers` is empty
    /// - [`AnalysisError::NoRows`] if `rows` is empty
    /// - [`AnalysisError::RowLengthMismatch`] for the first row whose length
    ///   differs from the header length
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Result<Self, AnalysisError> {
        if headers.is_empty() {
            return Err(AnalysisError::NoColumns);
        }
        if rows.is_empty() {
            return Err(AnalysisError::NoRows);
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(AnalysisError::RowLengthMismatch {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Iterates over the cells of column `index` in row order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &RawCell> + '_ {
        assert!(index < self.headers.len(), "column index out of bounds");
        self.rows.iter().map(move |row| &row[index])
    }
}
