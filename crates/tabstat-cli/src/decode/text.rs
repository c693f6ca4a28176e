//! Free-form text tables
//!
//! The first non-empty line is the header. Its shape picks the splitter
//! used for the whole file: tabs if it has any, otherwise runs of two or
//! more spaces if it has any, otherwise single whitespace.

use anyhow::bail;

use super::{Decoded, cell_from_str, fit_to_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Splitter {
    Tab,
    WideSpace,
    Whitespace,
}

impl Splitter {
    fn detect(header: &str) -> Self {
        if header.contains('\t') {
            Splitter::Tab
        } else if header.trim().contains("  ") {
            Splitter::WideSpace
        } else {
            Splitter::Whitespace
        }
    }

    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Splitter::Tab => line.split('\t').map(str::trim).collect(),
            Splitter::WideSpace => line
                .trim()
                .split("  ")
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect(),
            Splitter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

pub(super) fn decode_str(content: &str) -> anyhow::Result<Decoded> {
    let mut lines = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        bail!("Text input contains no header line");
    };
    let splitter = Splitter::detect(header);
    let headers = splitter
        .split(header)
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    tracing::debug!(?splitter, columns = headers.len(), "detected text layout");

    let width = headers.len();
    let rows = lines
        .map(|line| {
            let row = splitter.split(line).into_iter().map(cell_from_str).collect();
            fit_to_width(row, width)
        })
        .collect();

    Ok((headers, rows))
}
