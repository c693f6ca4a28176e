//! Report destinations and JSON files

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Where a report or a JSON document is written.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Creates the file at `path`, or locks stdout without one.
    pub(crate) fn to(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Output::stdout()), Output::create)
    }

    pub(crate) fn stdout() -> Self {
        Output::Stdout(io::stdout().lock())
    }

    pub(crate) fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    /// `stdout` or the file path, for error messages.
    pub(crate) fn destination(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes pretty-printed JSON and a final newline, then flushes.
    pub(crate) fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.destination()))?;
        writeln!(self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish writing {}", self.destination()))
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Saves `value` as the `kind` JSON file at `path`, replacing any old one.
pub(crate) fn write_json_file<T, P>(kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    Output::create(path)?
        .write_json(value)
        .with_context(|| format!("Failed to save {kind} file: {}", path.display()))
}

pub(crate) fn read_json_file<T, P>(kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {kind} JSON file: {}", path.display()))
}

/// Display name of an input file: its final component, or the whole path.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
