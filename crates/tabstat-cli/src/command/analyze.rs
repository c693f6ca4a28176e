//! `tabstat analyze`: decode, analyze, interpret and report on one file.

use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, ValueEnum};
use tabstat_analysis::{
    AnalysisOptions, StatisticalResults, alignment::Alignment, analyze_with, table::RawTable,
};
use tabstat_report::{
    Interpretation,
    interpretation::{TemplateInterpreter, interpret_or_fallback},
    render::{ReportFormat, ReportMeta, render_report},
};
use tracing::{info, warn};

use super::StoreArg;
use crate::{
    decode,
    interpreter::CommandInterpreter,
    record::{AnalysisRecord, JsonDirStore, RecordStore},
    util::{self, Output},
};

const REPORT_TITLE: &str = "Statistical Analysis Report";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    #[default]
    Text,
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Markdown => ReportFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum AlignArg {
    /// Pair values by position, truncating to the shorter variable
    #[default]
    Truncate,
    /// Pair values from the same table row
    RowIndex,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Truncate => Alignment::Truncate,
            AlignArg::RowIndex => Alignment::RowIndex,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Input table (.csv, .tsv or .txt)
    pub file: PathBuf,

    /// Question the interpretation should focus on
    #[arg(long)]
    pub question: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    pub format: FormatArg,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write the statistical results as JSON to this file
    #[arg(long)]
    pub json: Option<PathBuf>,

    #[clap(flatten)]
    pub store: StoreArg,

    /// How numerical variables are paired for correlation and regression
    #[arg(long, value_enum, default_value_t)]
    pub align: AlignArg,

    /// Subgroup size for X-bar/R control charts (individuals charts if omitted)
    #[arg(long)]
    pub qc_subgroup: Option<usize>,

    /// External interpreter command; reads results JSON on stdin and
    /// writes an interpretation JSON on stdout
    #[arg(long)]
    pub interpreter_cmd: Option<String>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let mut store = JsonDirStore::open(&arg.store.records_dir)?;
    let record = run_with_store(arg, &mut store)?;
    eprintln!("Analysis record {} saved", record.id);
    Ok(())
}

fn run_with_store(arg: &AnalyzeArg, store: &mut dyn RecordStore) -> anyhow::Result<AnalysisRecord> {
    let file_name = util::file_name_of(&arg.file);
    let mut record = store.insert(&file_name)?;
    info!(id = record.id, file = %arg.file.display(), "analysis started");

    match execute(arg, &file_name) {
        Ok((results, interpretation)) => {
            info!(
                id = record.id,
                score = results.data_quality.score,
                "analysis completed"
            );
            record.complete(results, interpretation, arg.output.clone());
            store.update(&record)?;
            Ok(record)
        }
        Err(err) => {
            record.fail(format!("{err:#}"));
            if let Err(update_err) = store.update(&record) {
                warn!(id = record.id, error = %update_err, "failed to mark record as failed");
            }
            Err(err)
        }
    }
}

fn execute(
    arg: &AnalyzeArg,
    file_name: &str,
) -> anyhow::Result<(StatisticalResults, Interpretation)> {
    let (headers, rows) = decode::decode_file(&arg.file)?;
    let table = RawTable::new(headers, rows)
        .with_context(|| format!("Failed to load table from {}", arg.file.display()))?;

    let options = AnalysisOptions {
        alignment: arg.align.into(),
        qc_subgroup_size: arg.qc_subgroup,
    };
    let results = analyze_with(&table, &options)
        .with_context(|| format!("Failed to analyze {}", arg.file.display()))?;

    let question = arg.question.as_deref();
    let interpretation = match &arg.interpreter_cmd {
        Some(command_line) => {
            let interpreter = CommandInterpreter::parse(command_line)?;
            interpret_or_fallback(&interpreter, &results, question)
        }
        None => TemplateInterpreter::build(&results, question),
    };

    let meta = ReportMeta {
        title: REPORT_TITLE.to_owned(),
        file_name: file_name.to_owned(),
        generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        question: arg.question.clone(),
    };
    let mut output = Output::to(arg.output.as_deref())?;
    render_report(
        &mut output,
        &results,
        &interpretation,
        arg.format.into(),
        &meta,
    )
    .with_context(|| format!("Failed to write report to {}", output.destination()))?;
    output
        .flush()
        .with_context(|| format!("Failed to flush report to {}", output.destination()))?;

    if let Some(path) = &arg.json {
        util::write_json_file("results", path, &results)?;
    }

    Ok((results, interpretation))
}

#[cfg(test)]
mod tests {
    use std::{fmt::Write as _, fs, path::Path};

    use tabstat_report::render::PAGE_BREAK;

    use super::*;
    use crate::record::RecordStatus;

    fn arg(file: PathBuf, dir: &Path) -> AnalyzeArg {
        AnalyzeArg {
            file,
            question: Some("Does income grow with age?".into()),
            format: FormatArg::Markdown,
            output: Some(dir.join("report.md")),
            json: Some(dir.join("results.json")),
            store: StoreArg {
                records_dir: dir.join("records"),
            },
            align: AlignArg::Truncate,
            qc_subgroup: None,
            interpreter_cmd: None,
        }
    }

    fn write_csv(path: &Path) {
        let mut content = "age,income,region\n".to_owned();
        for i in 0..30 {
            let age = 20 + i;
            let income = 1000 * age + 37 * ((i * 7) % 11);
            let region = ["north", "south", "east"][i % 3];
            writeln!(content, "{age},{income},{region}").unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_analyze_writes_report_json_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        write_csv(&input);
        let arg = arg(input, dir.path());
        let mut store = JsonDirStore::open(&arg.store.records_dir).unwrap();

        let record = run_with_store(&arg, &mut store).unwrap();
        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(record.file_name, "people.csv");

        let report = fs::read_to_string(dir.path().join("report.md")).unwrap();
        assert!(report.starts_with(&format!("# {REPORT_TITLE}")));
        assert!(report.contains("Does income grow with age?"));
        assert!(report.contains(PAGE_BREAK));

        let results: StatisticalResults =
            util::read_json_file("results", dir.path().join("results.json")).unwrap();
        assert_eq!(results.overview.rows, 30);
        assert_eq!(results.overview.numerical_variables, 2);
        assert_eq!(results.regressions.len(), 1);

        let stored = store.get(record.id).unwrap().unwrap();
        assert_eq!(stored.status, RecordStatus::Completed);
        assert_eq!(stored.report_path, Some(dir.path().join("report.md")));
        assert!(stored.interpretation.is_some());
    }

    #[test]
    fn test_analyze_failure_marks_record_failed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        fs::write(&input, "a,b\n").unwrap();
        let arg = arg(input, dir.path());
        let mut store = JsonDirStore::open(&arg.store.records_dir).unwrap();

        let err = run_with_store(&arg, &mut store).unwrap_err();
        assert!(format!("{err:#}").contains("table has no rows"));

        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RecordStatus::Failed);
        assert!(
            records[0]
                .error
                .as_deref()
                .unwrap()
                .contains("table has no rows")
        );
        assert!(!dir.path().join("report.md").exists());
    }

    #[test]
    fn test_analyze_invalid_subgroup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        write_csv(&input);
        let mut arg = arg(input, dir.path());
        arg.qc_subgroup = Some(1);
        let mut store = JsonDirStore::open(&arg.store.records_dir).unwrap();

        let err = run_with_store(&arg, &mut store).unwrap_err();
        assert!(format!("{err:#}").contains("invalid analysis option"));
        assert_eq!(store.list().unwrap()[0].status, RecordStatus::Failed);
    }
}
