//! Console reporting and file export for analysis results.
//!
//! Charts are written as standalone HTML documents and summary tables as CSV,
//! both named after the analysis that produced them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::analyzers::analyzer::AnalysisOutcome;
use crate::analyzers::types::{Analysis, SummaryTable};
use crate::error::Result;

const RULE_WIDTH: usize = 50;

/// Which artifacts [`export`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub charts: bool,
    pub tables: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            charts: true,
            tables: false,
        }
    }
}

/// Writes a titled section to `out`.
pub fn write_section<W: Write>(
    out: &mut W,
    title: &str,
    lines: &[String],
) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{rule}\n{title}\n{rule}")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Writes the report of every outcome, including a note for unavailable ones.
pub fn write_reports<W: Write>(
    out: &mut W,
    outcomes: &[AnalysisOutcome],
) -> std::io::Result<()> {
    for outcome in outcomes {
        match &outcome.result {
            Ok(analysis) => write_section(out, outcome.kind.heading(), &analysis.report)?,
            Err(e) => write_section(
                out,
                outcome.kind.heading(),
                &[format!("Análise indisponível: {e}")],
            )?,
        }
    }
    Ok(())
}

/// Writes one chart to `<dir>/<stem>.html`. Returns the path written, or
/// `None` when the analysis has nothing to draw.
pub fn write_chart(dir: &Path, analysis: &Analysis) -> Result<Option<PathBuf>> {
    let Some(chart) = analysis.chart.as_ref().filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let path = dir.join(format!("{}.html", analysis.kind.file_stem()));
    fs::write(&path, chart.to_html()?)?;
    debug!(path = %path.display(), "Chart written");
    Ok(Some(path))
}

/// Writes a summary table as CSV with a header row.
pub fn write_table(path: &Path, table: &SummaryTable) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;

    writer.write_record(table.headers())?;
    for row in &table.rows {
        let values = row
            .values
            .iter()
            .map(|v| v.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(row.key.iter().cloned().chain(values))?;
    }
    writer.flush()?;

    Ok(())
}

/// Exports the artifacts of every successful analysis into `dir`, creating it
/// when absent. Files are named after each analysis, so a missing analysis
/// never shifts the names of the others.
#[tracing::instrument(skip(dir, outcomes), fields(dir = %dir.display()))]
pub fn export(
    dir: &Path,
    outcomes: &[AnalysisOutcome],
    options: ExportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for analysis in outcomes.iter().filter_map(AnalysisOutcome::analysis) {
        if options.charts {
            if let Some(path) = write_chart(dir, analysis)? {
                written.push(path);
            }
        }
        if options.tables && !analysis.table.is_empty() {
            let path = dir.join(format!("{}.csv", analysis.kind.file_stem()));
            write_table(&path, &analysis.table)?;
            written.push(path);
        }
    }

    info!(files = written.len(), "Export complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{AnalysisKind, SummaryRow};
    use crate::chart::{Figure, Trace};
    use crate::error::AnalysisError;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        dir
    }

    fn analysis(kind: AnalysisKind) -> Analysis {
        let mut table = SummaryTable::new(&["SG_UF_ESC"], vec!["NU_NOTA_MT".into()]);
        table.rows.push(SummaryRow {
            key: vec!["SP".into()],
            values: vec![Some(612.5)],
        });
        table.rows.push(SummaryRow {
            key: vec!["RJ".into()],
            values: vec![None],
        });
        let mut analysis = Analysis::new(kind, table);
        analysis.line("linha");
        analysis.chart = Some(
            Figure::new("Teste").trace(Trace::bar("Sudeste", vec!["SP".into()], vec![612.5])),
        );
        analysis
    }

    #[test]
    fn test_write_section_format() {
        let mut out = Vec::new();
        write_section(&mut out, "TITULO", &["a".to_string(), "b".to_string()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(RULE_WIDTH));
        assert_eq!(lines[2], "TITULO");
        assert_eq!(lines[4], "a");
        assert_eq!(lines[5], "b");
    }

    #[test]
    fn test_write_reports_notes_unavailable() {
        let outcomes = vec![AnalysisOutcome {
            kind: AnalysisKind::BySex,
            result: Err(AnalysisError::missing_column(AnalysisKind::BySex, "SEXO")),
        }];
        let mut out = Vec::new();
        write_reports(&mut out, &outcomes).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("ANÁLISE 4"));
        assert!(text.contains("Análise indisponível"));
    }

    #[test]
    fn test_write_table_csv() {
        let dir = temp_dir("enem_analyzer_test_table");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("table.csv");

        write_table(&path, &analysis(AnalysisKind::ByState).table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["SG_UF_ESC,NU_NOTA_MT", "SP,612.5", "RJ,"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_names_follow_analysis_identity() {
        let dir = temp_dir("enem_analyzer_test_export");
        let outcomes = vec![
            AnalysisOutcome {
                kind: AnalysisKind::ByState,
                result: Err(AnalysisError::missing_column(AnalysisKind::ByState, "SG_UF_ESC")),
            },
            AnalysisOutcome {
                kind: AnalysisKind::Socioeconomic,
                result: Ok(analysis(AnalysisKind::Socioeconomic)),
            },
        ];

        let options = ExportOptions {
            charts: true,
            tables: true,
        };
        let written = export(&dir, &outcomes, options).unwrap();

        assert_eq!(
            written,
            vec![
                dir.join("02_desempenho_socioeconomico.html"),
                dir.join("02_desempenho_socioeconomico.csv"),
            ]
        );
        assert!(!dir.join("01_desempenho_por_estado.html").exists());
        let html = fs::read_to_string(dir.join("02_desempenho_socioeconomico.html")).unwrap();
        assert!(html.contains("Plotly.newPlot"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_without_charts() {
        let dir = temp_dir("enem_analyzer_test_export_none");
        let outcomes = vec![AnalysisOutcome {
            kind: AnalysisKind::ByAge,
            result: Ok(analysis(AnalysisKind::ByAge)),
        }];

        let options = ExportOptions {
            charts: false,
            tables: false,
        };
        let written = export(&dir, &outcomes, options).unwrap();

        assert!(written.is_empty());
        assert!(dir.is_dir());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_chart_is_not_written() {
        let dir = temp_dir("enem_analyzer_test_empty_chart");
        fs::create_dir_all(&dir).unwrap();
        let mut empty = analysis(AnalysisKind::TopEssay);
        empty.chart = Some(Figure::new("Vazio"));

        assert_eq!(write_chart(&dir, &empty).unwrap(), None);
        assert!(!dir.join("03_maiores_notas_redacao.html").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
