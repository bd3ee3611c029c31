//! CLI entry point for the ENEM microdata analyzer.
//!
//! Loads the exam results, cleans and enriches them, prints the general
//! statistics and the five grouped analyses, and saves one chart per analysis.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use enem_analyzer::{
    config::Settings,
    output::ExportOptions,
    pipeline::{RunOptions, run, summarize},
    prompt::choose_sample,
};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "enem_analyzer")]
#[command(about = "Descriptive analysis of ENEM exam microdata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Semicolon-delimited microdata file (.csv or .csv.gz)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Load at most this many rows
    #[arg(short, long, conflicts_with = "all")]
    sample: Option<usize>,

    /// Load every row without asking
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analysis and save the charts
    Run {
        #[command(flatten)]
        source: Source,

        /// Directory for the generated charts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip writing chart documents
        #[arg(long, default_value_t = false)]
        no_charts: bool,

        /// Also write each summary table as CSV
        #[arg(long, default_value_t = false)]
        tables: bool,
    },
    /// Print the general statistics only
    Summary {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("enem_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "DASHBOARD ENEM - Análise dos Microdados")?;
    writeln!(stdout, "{}", "=".repeat(50))?;

    match cli.command {
        Commands::Run {
            source,
            output_dir,
            no_charts,
            tables,
        } => {
            let settings = settings.with_overrides(source.input.clone(), output_dir);
            let sample = resolve_sample(&source, &mut stdout)?;
            let options = RunOptions {
                data_file: settings.data_file,
                output_dir: settings.output_dir,
                sample,
                export: ExportOptions {
                    charts: !no_charts,
                    tables,
                },
            };

            match run(&options, &mut stdout) {
                Ok(report) => {
                    writeln!(stdout, "\n{}", "=".repeat(60))?;
                    writeln!(stdout, "ANÁLISE COMPLETA FINALIZADA!")?;
                    writeln!(
                        stdout,
                        "Gerado em {}",
                        report.generated_at.format("%d/%m/%Y %H:%M:%S UTC")
                    )?;
                    writeln!(stdout, "{}", "=".repeat(60))?;
                    info!(files = report.written.len(), "Done");
                }
                Err(e) => {
                    error!(error = %e, "Run aborted");
                    return Err(e.into());
                }
            }
        }
        Commands::Summary { source } => {
            let settings = settings.with_overrides(source.input.clone(), None);
            let sample = resolve_sample(&source, &mut stdout)?;
            if let Err(e) = summarize(&settings.data_file, sample, &mut stdout) {
                error!(error = %e, "Summary aborted");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// Row cap from the flags, or from the interactive prompt when neither
/// `--sample` nor `--all` was given.
fn resolve_sample(source: &Source, out: &mut impl Write) -> Result<Option<usize>> {
    if source.all {
        return Ok(None);
    }
    if let Some(n) = source.sample {
        return Ok(Some(n));
    }
    let stdin = io::stdin();
    Ok(choose_sample(&mut stdin.lock(), out)?)
}
