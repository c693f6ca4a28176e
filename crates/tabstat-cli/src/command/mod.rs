use std::{io, path::PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{analyze::AnalyzeArg, records::RecordsArg};

mod analyze;
mod records;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze a CSV, TSV or text table and print a report
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Inspect stored analysis records
    Records(#[clap(flatten)] RecordsArg),
}

/// Location of the analysis record store.
#[derive(Debug, Clone, Args)]
pub(crate) struct StoreArg {
    /// Directory holding analysis records
    #[arg(long, default_value = ".tabstat/records")]
    pub records_dir: PathBuf,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Records(arg) => records::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
