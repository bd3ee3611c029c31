//! Subject means by sex and the male-minus-female gap per subject.

use crate::analyzers::score_columns;
use crate::analyzers::types::{Analysis, AnalysisKind, SummaryRow, SummaryTable};
use crate::analyzers::utility::{group_by, group_mean, round1};
use crate::chart::{Figure, Trace};
use crate::error::{AnalysisError, Result};
use crate::mappings::col;
use crate::table::CleanTable;

const MALE: &str = "Masculino";
const FEMALE: &str = "Feminino";

pub fn analyze(table: &CleanTable) -> Result<Analysis> {
    let kind = AnalysisKind::BySex;
    let sexes = table
        .text(col::SEX)
        .ok_or_else(|| AnalysisError::missing_column(kind, col::SEX))?;
    let scores = score_columns(table);
    if scores.is_empty() {
        return Err(AnalysisError::missing_column(kind, "NU_NOTA_*"));
    }

    let groups = group_by(&[sexes], None);
    if groups.is_empty() {
        return Err(AnalysisError::no_data(kind, col::SEX));
    }

    let value_columns = scores.iter().map(|s| s.name.to_string()).collect();
    let mut summary = SummaryTable::new(&[col::SEX], value_columns);
    for group in groups {
        let values = scores
            .iter()
            .map(|s| group_mean(s.values, &group.rows).map(round1))
            .collect();
        summary.rows.push(SummaryRow {
            key: group.key,
            values,
        });
    }

    let mut analysis = Analysis::new(kind, summary);
    analysis.line("COMPARAÇÃO POR GÊNERO:");
    if analysis.table.rows.len() >= 2 {
        let lines: Vec<String> = scores
            .iter()
            .map(|s| {
                let male = mean_for(&analysis.table, MALE, s.name);
                let female = mean_for(&analysis.table, FEMALE, s.name);
                format!(
                    "   {}: M={:.1} | F={:.1} | Diff={:+.1}",
                    s.area(),
                    male,
                    female,
                    male - female
                )
            })
            .collect();
        analysis.report.extend(lines);
    }

    let areas: Vec<String> = scores.iter().map(|s| s.area().to_string()).collect();
    let chart = analysis.table.rows.iter().fold(
        Figure::new("Comparação de Desempenho por Gênero")
            .height(500)
            .tick_angle(-45)
            .axis_titles("Área", "Nota Média")
            .grouped_bars(),
        |fig, row| {
            let y = row.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            fig.trace(Trace::bar(&row.key[0], areas.clone(), y))
        },
    );
    analysis.chart = Some(chart);

    Ok(analysis)
}

/// Group mean for one sex, 0 when the group or the value is absent.
fn mean_for(summary: &SummaryTable, sex: &str, column: &str) -> f64 {
    summary
        .find(sex)
        .and_then(|row| summary.value(row, column))
        .unwrap_or(0.0)
}
