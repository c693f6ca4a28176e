//! Input file decoders
//!
//! Each decoder turns a file into a header row plus rows of [`RawCell`]s,
//! already padded or truncated to the header width.

use std::path::Path;

use anyhow::{Context, bail};
use tabstat_analysis::table::{self, RawCell};

mod delimited;
mod text;

pub(crate) type Decoded = (Vec<String>, Vec<Vec<RawCell>>);

/// Decodes `path`, choosing the decoder by file extension.
pub(crate) fn decode_file(path: &Path) -> anyhow::Result<Decoded> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let decoded = match extension.as_str() {
        "csv" => delimited::decode_path(path, b','),
        "tsv" => delimited::decode_path(path, b'\t'),
        "txt" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))
            .and_then(|content| text::decode_str(&content)),
        "" => bail!("Input file has no extension: {}", path.display()),
        other => bail!("Unsupported file type `.{other}`: {}", path.display()),
    }?;

    tracing::debug!(
        path = %path.display(),
        columns = decoded.0.len(),
        rows = decoded.1.len(),
        "decoded input file"
    );
    Ok(decoded)
}

fn cell_from_str(field: &str) -> RawCell {
    let field = field.trim();
    if field.is_empty() {
        RawCell::Missing
    } else if let Some(value) = table::parse_number(field) {
        RawCell::Number(value)
    } else {
        RawCell::Text(field.to_owned())
    }
}

fn fit_to_width(mut row: Vec<RawCell>, width: usize) -> Vec<RawCell> {
    row.resize(width, RawCell::Missing);
    row
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_cell_from_str() {
        assert_eq!(cell_from_str("  "), RawCell::Missing);
        assert_eq!(cell_from_str(" 4.5 "), RawCell::Number(4.5));
        assert_eq!(cell_from_str("1e3"), RawCell::Number(1000.0));
        assert_eq!(cell_from_str("n/a"), RawCell::Text("n/a".into()));
        assert_eq!(cell_from_str("NaN"), RawCell::Text("NaN".into()));
    }

    #[test]
    fn test_fit_to_width() {
        let row = vec![RawCell::Number(1.0)];
        assert_eq!(
            fit_to_width(row, 3),
            vec![RawCell::Number(1.0), RawCell::Missing, RawCell::Missing]
        );
        let row = vec![RawCell::Number(1.0), RawCell::Number(2.0)];
        assert_eq!(fit_to_width(row, 1), vec![RawCell::Number(1.0)]);
    }

    #[test]
    fn test_decode_file_dispatch() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("data.CSV");
        fs::write(&csv_path, "a,b\n1,x\n").unwrap();
        let (headers, rows) = decode_file(&csv_path).unwrap();
        assert_eq!(headers, ["a", "b"]);
        assert_eq!(rows, [vec![RawCell::Number(1.0), RawCell::from("x")]]);

        let tsv_path = dir.path().join("data.tsv");
        fs::write(&tsv_path, "a\tb\n1\t2\n").unwrap();
        let (headers, rows) = decode_file(&tsv_path).unwrap();
        assert_eq!(headers, ["a", "b"]);
        assert_eq!(rows, [vec![RawCell::Number(1.0), RawCell::Number(2.0)]]);

        let txt_path = dir.path().join("data.txt");
        fs::write(&txt_path, "\nfirst name  score\nAda Lovelace  91\n").unwrap();
        let (headers, rows) = decode_file(&txt_path).unwrap();
        assert_eq!(headers, ["first name", "score"]);
        assert_eq!(
            rows,
            [vec![RawCell::from("Ada Lovelace"), RawCell::Number(91.0)]]
        );
    }

    #[test]
    fn test_decode_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        fs::write(&path, "irrelevant").unwrap();
        let err = decode_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type `.xlsx`"));

        let path = dir.path().join("data");
        fs::write(&path, "a,b\n").unwrap();
        assert!(decode_file(&path).is_err());
    }

    #[test]
    fn test_decode_file_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.csv"));
    }
}
