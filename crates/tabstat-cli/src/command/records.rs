//! `tabstat records`: list stored analyses and show one of them.

use std::io::{self, Write};

use anyhow::Context;
use clap::{Args, Subcommand};
use tabstat_report::render::{ReportFormat, ReportMeta, render_report};

use super::{StoreArg, analyze::FormatArg};
use crate::{
    record::{AnalysisRecord, JsonDirStore, RecordStore},
    util::Output,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Args)]
pub(crate) struct RecordsArg {
    #[command(subcommand)]
    action: RecordsAction,
}

#[derive(Debug, Clone, Subcommand)]
enum RecordsAction {
    /// List all analysis records
    List(#[clap(flatten)] ListArg),
    /// Show one analysis record, re-rendering its report
    Show(#[clap(flatten)] ShowArg),
}

#[derive(Debug, Clone, Args)]
struct ListArg {
    #[clap(flatten)]
    store: StoreArg,
}

#[derive(Debug, Clone, Args)]
struct ShowArg {
    /// Record id
    id: u64,

    #[clap(flatten)]
    store: StoreArg,

    /// Print the raw record as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    format: FormatArg,
}

pub(crate) fn run(arg: &RecordsArg) -> anyhow::Result<()> {
    match &arg.action {
        RecordsAction::List(list) => {
            let store = JsonDirStore::open(&list.store.records_dir)?;
            let mut output = Output::stdout();
            print_list(&mut output, &store.list()?).context("Failed to write record list")?;
            output.flush().context("Failed to flush record list")?;
        }
        RecordsAction::Show(show) => {
            let store = JsonDirStore::open(&show.store.records_dir)?;
            let record = store.get(show.id)?.with_context(|| {
                format!(
                    "Analysis record {} not found in {}",
                    show.id,
                    show.store.records_dir.display()
                )
            })?;
            let mut output = Output::stdout();
            if show.json {
                output.write_json(&record)?;
            } else {
                print_record(&mut output, &record, show.format.into())
                    .context("Failed to write record")?;
                output.flush().context("Failed to flush record")?;
            }
        }
    }
    Ok(())
}

fn print_list<W>(out: &mut W, records: &[AnalysisRecord]) -> io::Result<()>
where
    W: Write,
{
    if records.is_empty() {
        writeln!(out, "No analysis records.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>6} {:<10} {:<19} {:<30} {:>7}",
        "ID", "Status", "Created", "File", "Quality"
    )?;
    writeln!(out, "{}", "-".repeat(6 + 1 + 10 + 1 + 19 + 1 + 30 + 1 + 7))?;
    for record in records {
        let quality = record.results.as_ref().map_or_else(
            || "-".to_owned(),
            |results| format!("{:.1}", results.data_quality.score),
        );
        writeln!(
            out,
            "{:>6} {:<10} {:<19} {:<30} {:>7}",
            record.id,
            record.status.to_string(),
            record.created_at.format(TIME_FORMAT).to_string(),
            record.file_name,
            quality
        )?;
    }
    Ok(())
}

fn print_record<W>(out: &mut W, record: &AnalysisRecord, format: ReportFormat) -> io::Result<()>
where
    W: Write,
{
    if let (Some(results), Some(interpretation)) = (&record.results, &record.interpretation) {
        let generated_at = record
            .completed_at
            .unwrap_or(record.created_at)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
        let meta = ReportMeta {
            title: format!("Analysis #{}", record.id),
            file_name: record.file_name.clone(),
            generated_at,
            question: None,
        };
        return render_report(out, results, interpretation, format, &meta);
    }

    writeln!(out, "Analysis #{}", record.id)?;
    writeln!(out, "{:<12} {}", "File", record.file_name)?;
    writeln!(out, "{:<12} {}", "Status", record.status)?;
    writeln!(
        out,
        "{:<12} {}",
        "Created",
        record.created_at.format(TIME_FORMAT)
    )?;
    if let Some(error) = &record.error {
        writeln!(out, "{:<12} {error}", "Error")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tabstat_analysis::{analyze, table::RawCell};
    use tabstat_report::interpretation::TemplateInterpreter;

    use super::*;

    fn completed(store: &mut JsonDirStore) -> AnalysisRecord {
        let rows = (0..20)
            .map(|i| {
                vec![
                    RawCell::from(f64::from(i)),
                    RawCell::from(f64::from(100 - 2 * i)),
                ]
            })
            .collect();
        let results = analyze(vec!["week".into(), "stock".into()], rows).unwrap();
        let interpretation = TemplateInterpreter::build(&results, None);
        let mut record = store.insert("stock.csv").unwrap();
        record.complete(results, interpretation, None);
        store.update(&record).unwrap();
        record
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = vec![];
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        assert_eq!(
            to_string(|out| print_list(out, &store.list().unwrap())),
            "No analysis records.\n"
        );

        completed(&mut store);
        let mut failed = store.insert("bad.txt").unwrap();
        failed.fail("Input file has no extension".into());
        store.update(&failed).unwrap();

        let listing = to_string(|out| print_list(out, &store.list().unwrap()));
        let lines = listing.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("completed") && lines[2].contains("stock.csv"));
        assert!(lines[3].contains("failed") && lines[3].trim_end().ends_with('-'));
    }

    #[test]
    fn test_print_completed_record_renders_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let record = completed(&mut store);

        let text = to_string(|out| print_record(out, &record, ReportFormat::Markdown));
        assert!(text.starts_with("# Analysis #1"));
        assert!(text.contains("stock.csv"));
        assert!(text.contains("Regression Analysis"));
    }

    #[test]
    fn test_print_failed_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let mut record = store.insert("bad.csv").unwrap();
        record.fail("malformed input: table has no rows".into());

        let text = to_string(|out| print_record(out, &record, ReportFormat::Text));
        assert!(text.contains("failed"));
        let error_line = text.lines().find(|l| l.starts_with("Error")).unwrap();
        assert!(error_line.ends_with("malformed input: table has no rows"));
    }
}
