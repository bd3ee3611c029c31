//! Mean scores per state and region, ranked by overall mean.

use tracing::debug;

use crate::analyzers::score_columns;
use crate::analyzers::types::{Analysis, AnalysisKind, SummaryRow, SummaryTable};
use crate::analyzers::utility::{fmt_count, fmt_score, group_by, group_mean, mean_present, round1};
use crate::chart::{Figure, Trace};
use crate::error::{AnalysisError, Result};
use crate::mappings::col;
use crate::table::CleanTable;

pub const TOP_N: usize = 10;
pub const PARTICIPANTS: &str = "PARTICIPANTES";
pub const OVERALL_MEAN: &str = "MEDIA_GERAL";

/// Groups by (state, region) and ranks states by the mean of their subject means.
///
/// Summary rows come back ranked, best first. The chart shows every state.
pub fn analyze(table: &CleanTable) -> Result<Analysis> {
    let kind = AnalysisKind::ByState;
    let states = table
        .text(col::STATE)
        .ok_or_else(|| AnalysisError::missing_column(kind, col::STATE))?;
    let regions = table
        .text(col::REGION)
        .ok_or_else(|| AnalysisError::missing_column(kind, col::REGION))?;
    let scores = score_columns(table);
    if scores.is_empty() {
        return Err(AnalysisError::missing_column(kind, "NU_NOTA_*"));
    }

    let groups = group_by(&[states, regions], None);
    debug!(groups = groups.len(), "Grouped by state and region");
    if groups.is_empty() {
        return Err(AnalysisError::no_data(kind, col::STATE));
    }

    let mut value_columns: Vec<String> = scores.iter().map(|s| s.name.to_string()).collect();
    value_columns.push(PARTICIPANTS.to_string());
    value_columns.push(OVERALL_MEAN.to_string());
    let mut summary = SummaryTable::new(&[col::STATE, col::REGION], value_columns);

    for group in &groups {
        let means: Vec<Option<f64>> = scores
            .iter()
            .map(|s| group_mean(s.values, &group.rows).map(round1))
            .collect();
        let overall = mean_present(&means);

        let mut values = means;
        values.push(Some(group.rows.len() as f64));
        values.push(overall);
        summary.rows.push(SummaryRow {
            key: group.key.clone(),
            values,
        });
    }

    let chart = chart(&summary);

    // best first; states without any score sink to the bottom
    summary.rows.sort_by(|a, b| {
        let a = a.values.last().copied().flatten().unwrap_or(f64::NEG_INFINITY);
        let b = b.values.last().copied().flatten().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let mut analysis = Analysis::new(kind, summary);
    analysis.line("TOP 10 ESTADOS - MÉDIA GERAL:");
    let lines: Vec<String> = analysis
        .table
        .rows
        .iter()
        .take(TOP_N)
        .map(|row| {
            format!(
                "   {}: {} ({} participantes)",
                row.key[0],
                fmt_score(analysis.table.value(row, OVERALL_MEAN)),
                fmt_count(analysis.table.value(row, PARTICIPANTS).unwrap_or(0.0) as usize),
            )
        })
        .collect();
    analysis.report.extend(lines);
    analysis.chart = Some(chart).filter(|c| !c.is_empty());

    Ok(analysis)
}

/// Bar per state, one series per region in order of first appearance.
fn chart(summary: &SummaryTable) -> Figure {
    let mut series: Vec<(String, Vec<String>, Vec<f64>)> = Vec::new();
    for row in &summary.rows {
        let Some(overall) = summary.value(row, OVERALL_MEAN) else {
            continue;
        };
        let (state, region) = (&row.key[0], &row.key[1]);
        match series.iter_mut().find(|(r, _, _)| r == region) {
            Some((_, x, y)) => {
                x.push(state.clone());
                y.push(overall);
            }
            None => series.push((region.clone(), vec![state.clone()], vec![overall])),
        }
    }

    series.into_iter().fold(
        Figure::new("Desempenho Médio por Estado e Região")
            .height(600)
            .tick_angle(-45)
            .axis_titles("Estado", "Média Geral"),
        |fig, (region, x, y)| fig.trace(Trace::bar(&region, x, y)),
    )
}
