//! End-to-end run: load, clean, report, analyse, export.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analyzers::analyzer::{AnalysisOutcome, run_all};
use crate::cleaner::clean;
use crate::error::Result;
use crate::loader::load_table;
use crate::output::{ExportOptions, export, write_reports, write_section};
use crate::stats::GeneralStats;
use crate::table::CleanTable;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    /// Row cap; `None` loads the whole file.
    pub sample: Option<usize>,
    pub export: ExportOptions,
}

#[derive(Debug)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub stats: GeneralStats,
    pub outcomes: Vec<AnalysisOutcome>,
    pub written: Vec<PathBuf>,
}

/// Loads and cleans the data file.
///
/// # Errors
///
/// Fails only when the file is missing or cannot be parsed.
pub fn prepare(data_file: &Path, sample: Option<usize>) -> Result<CleanTable> {
    let raw = load_table(data_file, sample)?;
    Ok(clean(raw))
}

/// Loads, cleans and prints the general statistics only.
pub fn summarize<W: Write>(
    data_file: &Path,
    sample: Option<usize>,
    out: &mut W,
) -> Result<GeneralStats> {
    let table = prepare(data_file, sample)?;
    let stats = GeneralStats::from_table(&table);
    write_section(out, "ESTATÍSTICAS GERAIS - ENEM", &stats.report_lines())?;
    Ok(stats)
}

/// Runs the full pipeline, writing the console report to `out`.
#[tracing::instrument(
    skip_all,
    fields(data_file = %options.data_file.display(), sample = ?options.sample)
)]
pub fn run<W: Write>(options: &RunOptions, out: &mut W) -> Result<RunReport> {
    let generated_at = Utc::now();
    let table = prepare(&options.data_file, options.sample)?;

    let stats = GeneralStats::from_table(&table);
    write_section(out, "ESTATÍSTICAS GERAIS - ENEM", &stats.report_lines())?;

    let outcomes = run_all(&table);
    write_reports(out, &outcomes)?;

    let written = if options.export.charts || options.export.tables {
        let written = export(&options.output_dir, &outcomes, options.export)?;
        writeln!(out, "\nArquivos salvos em '{}':", options.output_dir.display())?;
        for path in &written {
            if let Some(name) = path.file_name() {
                writeln!(out, "   {}", name.to_string_lossy())?;
            }
        }
        written
    } else {
        Vec::new()
    };

    info!(
        generated_at = %generated_at.to_rfc3339(),
        participants = stats.participants,
        available = outcomes.iter().filter(|o| o.result.is_ok()).count(),
        files = written.len(),
        "Run complete"
    );

    Ok(RunReport {
        generated_at,
        stats,
        outcomes,
        written,
    })
}
