use std::{io, path::Path};

use anyhow::{Context, bail};
use csv::ReaderBuilder;

use super::{Decoded, cell_from_str, fit_to_width};

pub(super) fn decode_path(path: &Path, delimiter: u8) -> anyhow::Result<Decoded> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open delimited file: {}", path.display()))?;
    decode_reader(file, delimiter)
        .with_context(|| format!("Failed to decode delimited file: {}", path.display()))
}

pub(super) fn decode_reader<R>(reader: R, delimiter: u8) -> anyhow::Result<Decoded>
where
    R: io::Read,
{
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect::<Vec<_>>();
    if headers.iter().all(String::is_empty) {
        bail!("Header row is empty");
    }

    let width = headers.len();
    let mut rows = vec![];
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read record {}", i + 1))?;
        if record.len() != width {
            tracing::debug!(
                record = i + 1,
                expected = width,
                found = record.len(),
                "fitting record to header width"
            );
        }
        let row = record.iter().map(cell_from_str).collect();
        rows.push(fit_to_width(row, width));
    }

    Ok((headers, rows))
}
