//! Where the top essay scores come from.

use tracing::debug;

use crate::analyzers::types::{Analysis, AnalysisKind, SummaryRow, SummaryTable};
use crate::analyzers::utility::{fmt_count, group_by, group_max, group_mean, quantile, round1};
use crate::chart::{Figure, Trace};
use crate::error::{AnalysisError, Result};
use crate::mappings::col;
use crate::table::CleanTable;

pub const PERCENTILE: f64 = 0.95;
pub const TOP_N: usize = 10;

pub const COUNT: &str = "Quantidade";
pub const TOP_MEAN: &str = "Media_Top";
pub const TOP_MAX: &str = "Nota_Maxima";

/// Rows whose value is at or above the `q` quantile of the present values,
/// together with that threshold. `None` when no value is present.
pub fn top_percentile(values: &[Option<f64>], q: f64) -> Option<(f64, Vec<usize>)> {
    let threshold = quantile(values, q)?;
    let rows = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_some_and(|v| v >= threshold))
        .map(|(i, _)| i)
        .collect();
    Some((threshold, rows))
}

pub fn analyze(table: &CleanTable) -> Result<Analysis> {
    let kind = AnalysisKind::TopEssay;
    let essays = table
        .numbers(col::ESSAY)
        .ok_or_else(|| AnalysisError::missing_column(kind, col::ESSAY))?;

    let mut analysis = Analysis::new(
        kind,
        SummaryTable::new(
            &[col::STATE],
            vec![COUNT.to_string(), TOP_MEAN.to_string(), TOP_MAX.to_string()],
        ),
    );

    let Some((threshold, top_rows)) = top_percentile(essays, PERCENTILE) else {
        analysis.line("Nenhuma nota de redação válida");
        return Ok(analysis);
    };
    debug!(threshold, retained = top_rows.len(), "Essay percentile cut");

    analysis.line(format!(
        "Analisando top 5% das notas (≥ {threshold:.0} pontos)"
    ));
    analysis.line(format!("{} redações no top 5%", fmt_count(top_rows.len())));

    let Some(states) = table.text(col::STATE) else {
        analysis.line("Coluna de UF não encontrada, distribuição por estado indisponível");
        return Ok(analysis);
    };

    let mut mask = vec![false; table.len()];
    for row in &top_rows {
        mask[*row] = true;
    }

    let mut groups = group_by(&[states], Some(mask.as_slice()));
    // stable: equal counts keep state order
    groups.sort_by(|a, b| b.rows.len().cmp(&a.rows.len()));
    groups.truncate(TOP_N);
    if groups.is_empty() {
        analysis.line("Nenhuma das maiores notas tem UF identificada");
        return Ok(analysis);
    }

    analysis.line("TOP 10 ESTADOS - MAIORES NOTAS DE REDAÇÃO:");
    for group in &groups {
        let count = group.rows.len();
        let max = group_max(essays, &group.rows).map(round1);
        analysis.line(format!(
            "   {}: {} redações (máx: {})",
            group.key[0],
            fmt_count(count),
            max.map_or_else(|| "-".to_string(), |m| format!("{m:.0}"))
        ));
        analysis.table.rows.push(SummaryRow {
            key: group.key.clone(),
            values: vec![
                Some(count as f64),
                group_mean(essays, &group.rows).map(round1),
                max,
            ],
        });
    }

    analysis.chart = Some(chart(&analysis.table));
    Ok(analysis)
}

fn chart(summary: &SummaryTable) -> Figure {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut sizes = Vec::new();
    let mut labels = Vec::new();
    for row in &summary.rows {
        x.push(summary.value(row, COUNT).unwrap_or(0.0));
        y.push(summary.value(row, TOP_MEAN).unwrap_or(f64::NAN));
        sizes.push(summary.value(row, TOP_MAX).unwrap_or(0.0));
        labels.push(row.key[0].clone());
    }

    Figure::new("Top 5% Notas de Redação por Estado")
        .axis_titles("Número de Redações no Top 5%", "Média das Notas Top 5%")
        .trace(Trace::bubbles(x, y, sizes, labels))
}
