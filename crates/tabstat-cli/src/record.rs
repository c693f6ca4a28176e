//! Persistent analysis records
//!
//! Every `analyze` invocation creates an [`AnalysisRecord`] in the
//! `processing` state and moves it to `completed` or `failed` once the run
//! ends. Records live behind the [`RecordStore`] trait; [`JsonDirStore`]
//! keeps one pretty-printed JSON file per record.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabstat_analysis::StatisticalResults;
use tabstat_report::Interpretation;

use crate::util;

/// Lifecycle state of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RecordStatus {
    #[display("processing")]
    Processing,
    #[display("completed")]
    Completed,
    #[display("failed")]
    Failed,
}

/// One analysis run and, once completed, its outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AnalysisRecord {
    pub id: u64,
    /// Name of the analysed input file
    pub file_name: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure message, set when `status` is `failed`
    pub error: Option<String>,
    pub results: Option<StatisticalResults>,
    pub interpretation: Option<Interpretation>,
    /// Where the rendered report was written, if not to stdout
    pub report_path: Option<PathBuf>,
}

impl AnalysisRecord {
    fn new(id: u64, file_name: String) -> Self {
        Self {
            id,
            file_name,
            status: RecordStatus::Processing,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
            results: None,
            interpretation: None,
            report_path: None,
        }
    }

    pub(crate) fn complete(
        &mut self,
        results: StatisticalResults,
        interpretation: Interpretation,
        report_path: Option<PathBuf>,
    ) {
        self.status = RecordStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.error = None;
        self.results = Some(results);
        self.interpretation = Some(interpretation);
        self.report_path = report_path;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = RecordStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(message);
    }
}

pub(crate) trait RecordStore {
    /// Allocates a new id and stores a `processing` record for `file_name`.
    fn insert(&mut self, file_name: &str) -> anyhow::Result<AnalysisRecord>;
    /// Overwrites the stored record with the same id.
    fn update(&mut self, record: &AnalysisRecord) -> anyhow::Result<()>;
    fn get(&self, id: u64) -> anyhow::Result<Option<AnalysisRecord>>;
    /// All records, ordered by id.
    fn list(&self) -> anyhow::Result<Vec<AnalysisRecord>>;
}

/// A directory of `record-<id>.json` files.
#[derive(Debug, Clone)]
pub(crate) struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub(crate) fn open<P>(dir: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create records directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("record-{id:06}.json"))
    }

    fn record_ids(&self) -> anyhow::Result<Vec<u64>> {
        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to read records directory {}", self.dir.display())
        })?;

        let mut ids = vec![];
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Failed to read records directory {}", self.dir.display())
            })?;
            if let Some(id) = parse_record_id(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn write(&self, record: &AnalysisRecord) -> anyhow::Result<()> {
        util::write_json_file("analysis record", self.record_path(record.id), record)
    }
}

fn parse_record_id(path: &Path) -> Option<u64> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix("record-")?
        .parse()
        .ok()
}

impl RecordStore for JsonDirStore {
    fn insert(&mut self, file_name: &str) -> anyhow::Result<AnalysisRecord> {
        let id = self.record_ids()?.last().map_or(1, |max| max + 1);
        let record = AnalysisRecord::new(id, file_name.to_owned());
        self.write(&record)?;
        tracing::debug!(id, file_name, "inserted analysis record");
        Ok(record)
    }

    fn update(&mut self, record: &AnalysisRecord) -> anyhow::Result<()> {
        let path = self.record_path(record.id);
        anyhow::ensure!(path.exists(), "Analysis record {} does not exist", record.id);
        self.write(record)?;
        tracing::debug!(id = record.id, status = %record.status, "updated analysis record");
        Ok(())
    }

    fn get(&self, id: u64) -> anyhow::Result<Option<AnalysisRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        util::read_json_file("analysis record", &path).map(Some)
    }

    fn list(&self) -> anyhow::Result<Vec<AnalysisRecord>> {
        self.record_ids()?
            .into_iter()
            .map(|id| util::read_json_file("analysis record", self.record_path(id)))
            .collect()
    }
}
