use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use workload_check::{CheckConfig, CheckError, CheckOptions, ReportFormat};

/// Check that every top-level dataset in a workload file has a leading
/// dimension of at least the configured minimum (256 by default).
///
/// Exit status: 0 pass, 1 a dataset is too short, 2 usage error,
/// 3 no workload file, 4 unreadable file, 5 scalar dataset, 6 bad config,
/// 7 a top-level member is not a dataset.
#[derive(Parser, Debug)]
#[command(name = "workload-check", version)]
struct Cli {
    /// Workload file to check. Found by name in --dir when omitted.
    path: Option<PathBuf>,

    /// Directory searched for the workload file
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Substring identifying the workload file
    #[arg(long)]
    marker: Option<String>,

    /// Minimum length of each dataset's first dimension
    #[arg(long)]
    min_leading_dim: Option<usize>,

    /// JSON file with `marker` / `min_leading_dim`; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep checking after the first short dataset
    #[arg(long)]
    exhaustive: bool,

    /// Print a report to stdout
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = std::error::Error::source(cause);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<u8, CheckError> {
    let config = match &cli.config {
        Some(path) => CheckConfig::load(path).map_err(CheckError::config)?,
        None => CheckConfig::default(),
    };
    let config = config
        .with_overrides(cli.marker, cli.min_leading_dim)
        .map_err(CheckError::config)?;

    let options = CheckOptions {
        path: cli.path,
        dir: cli.dir,
        config,
        exhaustive: cli.exhaustive,
    };
    let report = workload_check::run(&options)?;

    if let Some(format) = cli.format {
        match report.render(format) {
            Ok(text) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = stdout.write_all(text.as_bytes()) {
                    log::warn!("failed to write report: {e}");
                }
            }
            Err(e) => log::warn!("failed to render report: {e:#}"),
        }
    }

    Ok(report.exit_code())
}
