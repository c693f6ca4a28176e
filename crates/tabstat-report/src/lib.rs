//! Interpretation and rendering of tabstat analysis results.
//!
//! - [`interpretation`]: narrative [`Interpretation`] of
//!   [`StatisticalResults`](tabstat_analysis::StatisticalResults), with a
//!   template fallback
//! - [`render`]: plain-text and paginated Markdown reports
//!
//! # Examples
//!
//! ```
//! use tabstat_analysis::{analyze, table::RawCell};
//! use tabstat_report::{
//!     interpretation::TemplateInterpreter,
//!     render::{ReportFormat, ReportMeta, render_report},
//! };
//!
//! let rows = (0..12)
//!     .map(|i| vec![RawCell::from(f64::from(i)), RawCell::from(f64::from(i * i))])
//!     .collect();
//! let results = analyze(vec!["x".into(), "y".into()], rows).unwrap();
//! let interpretation = TemplateInterpreter::build(&results, None);
//!
//! let mut out = vec![];
//! let meta = ReportMeta {
//!     title: "Report".into(),
//!     ..ReportMeta::default()
//! };
//! render_report(&mut out, &results, &interpretation, ReportFormat::Markdown, &meta).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("# Report"));
//! ```

pub use self::interpretation::{InterpretError, Interpretation, Interpreter};

pub mod format;
pub mod interpretation;
pub mod render;
