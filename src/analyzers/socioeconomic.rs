//! Mean scores per socioeconomic tier, or per school category when the
//! income questionnaire is unavailable.

use tracing::info;

use crate::analyzers::score_columns;
use crate::analyzers::types::{Analysis, AnalysisKind, SummaryRow, SummaryTable};
use crate::analyzers::utility::{
    fmt_count, fmt_score, group_by, group_mean, mean_present, order_groups, round1,
};
use crate::chart::{Figure, Trace};
use crate::error::{AnalysisError, Result};
use crate::mappings::{SOCIO_TIERS, col};
use crate::table::CleanTable;

pub const PARTICIPANTS: &str = "PARTICIPANTES";
pub const OVERALL_MEAN: &str = "MEDIA_GERAL";

pub fn analyze(table: &CleanTable) -> Result<Analysis> {
    let kind = AnalysisKind::Socioeconomic;

    let tiers = table
        .text(col::SOCIO_TIER)
        .filter(|cells| cells.iter().any(Option::is_some));
    let (column, title, labels) = if let Some(tiers) = tiers {
        info!("Grouping by household-income tier");
        (col::SOCIO_TIER, "Desempenho por Nível Socioeconômico", tiers)
    } else if let Some(admin) = table.text(col::SCHOOL_ADMIN) {
        info!("Income tier unavailable, using school category as proxy");
        (col::SCHOOL_ADMIN, "Desempenho por Tipo de Escola", admin)
    } else {
        return Err(AnalysisError::missing_column(kind, col::SOCIO_TIER));
    };

    let scores = score_columns(table);
    if scores.is_empty() {
        return Err(AnalysisError::missing_column(kind, "NU_NOTA_*"));
    }

    let valid = labels.iter().filter(|l| l.is_some()).count();
    let mut groups = group_by(&[labels], None);
    if groups.is_empty() {
        return Err(AnalysisError::no_data(kind, column));
    }
    if column == col::SOCIO_TIER {
        order_groups(&mut groups, &SOCIO_TIERS);
    }

    let mut value_columns: Vec<String> = scores.iter().map(|s| s.name.to_string()).collect();
    value_columns.push(PARTICIPANTS.to_string());
    value_columns.push(OVERALL_MEAN.to_string());
    let mut summary = SummaryTable::new(&[column], value_columns);

    let mut report = Vec::new();
    if column == col::SOCIO_TIER {
        report.push("Usando classificação por renda familiar (Q006)".to_string());
    } else {
        report.push("Usando tipo de escola como proxy socioeconômico".to_string());
    }
    report.push(format!("Registros válidos para análise: {}", fmt_count(valid)));
    report.push(String::new());
    report.push(format!("MÉDIAS POR {column}:"));

    let mut x = Vec::with_capacity(groups.len());
    let mut series: Vec<Vec<f64>> = vec![Vec::with_capacity(groups.len()); scores.len()];

    for group in &groups {
        let means: Vec<Option<f64>> = scores
            .iter()
            .map(|s| group_mean(s.values, &group.rows))
            .collect();
        let overall = mean_present(&means);

        report.push(format!(
            "   {}: {} ({} participantes)",
            group.key[0],
            fmt_score(overall),
            fmt_count(group.rows.len())
        ));

        x.push(group.key[0].clone());
        for (line, mean) in series.iter_mut().zip(&means) {
            line.push(mean.unwrap_or(f64::NAN));
        }

        let mut values: Vec<Option<f64>> = means.iter().map(|m| m.map(round1)).collect();
        values.push(Some(group.rows.len() as f64));
        values.push(overall.map(round1));
        summary.rows.push(SummaryRow {
            key: group.key.clone(),
            values,
        });
    }

    let chart = scores.iter().zip(series).fold(
        Figure::new(title)
            .height(500)
            .tick_angle(-45)
            .axis_titles(column, "Nota Média"),
        |fig, (score, y)| fig.trace(Trace::line(score.area(), x.clone(), y, true)),
    );

    let mut analysis = Analysis::new(kind, summary);
    analysis.report = report;
    analysis.chart = Some(chart);
    Ok(analysis)
}
