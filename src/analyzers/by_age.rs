//! Subject means by age bracket.

use crate::analyzers::score_columns;
use crate::analyzers::types::{Analysis, AnalysisKind, SummaryRow, SummaryTable};
use crate::analyzers::utility::{
    fmt_count, fmt_score, group_by, group_mean, mean_present, order_groups, round1,
};
use crate::chart::{Figure, Trace};
use crate::error::{AnalysisError, Result};
use crate::mappings::{AGE_BRACKETS, col};
use crate::table::CleanTable;

pub const PARTICIPANTS: &str = "PARTICIPANTES";
pub const OVERALL_MEAN: &str = "MEDIA_GERAL";

pub fn analyze(table: &CleanTable) -> Result<Analysis> {
    let kind = AnalysisKind::ByAge;
    let brackets = table
        .text(col::AGE_BRACKET)
        .ok_or_else(|| AnalysisError::missing_column(kind, col::AGE_BRACKET))?;
    let scores = score_columns(table);
    if scores.is_empty() {
        return Err(AnalysisError::missing_column(kind, "NU_NOTA_*"));
    }

    let mut groups = group_by(&[brackets], None);
    if groups.is_empty() {
        return Err(AnalysisError::no_data(kind, col::AGE_BRACKET));
    }
    order_groups(&mut groups, &AGE_BRACKETS);

    let mut value_columns: Vec<String> = scores.iter().map(|s| s.name.to_string()).collect();
    value_columns.push(PARTICIPANTS.to_string());
    value_columns.push(OVERALL_MEAN.to_string());
    let mut analysis = Analysis::new(kind, SummaryTable::new(&[col::AGE_BRACKET], value_columns));
    analysis.line("MÉDIAS POR FAIXA ETÁRIA:");

    let x: Vec<String> = groups.iter().map(|g| g.key[0].clone()).collect();
    let mut series: Vec<Vec<f64>> = vec![Vec::with_capacity(groups.len()); scores.len()];

    for group in &groups {
        let means: Vec<Option<f64>> = scores
            .iter()
            .map(|s| group_mean(s.values, &group.rows).map(round1))
            .collect();
        let overall = mean_present(&means);
        let participants = group.rows.len();

        analysis.line(format!(
            "   {}: {} ({} participantes)",
            group.key[0],
            fmt_score(overall),
            fmt_count(participants)
        ));

        for (line, mean) in series.iter_mut().zip(&means) {
            line.push(mean.unwrap_or(f64::NAN));
        }

        let mut values = means;
        values.push(Some(participants as f64));
        values.push(overall.map(round1));
        analysis.table.rows.push(SummaryRow {
            key: group.key.clone(),
            values,
        });
    }

    let chart = scores.iter().zip(series).fold(
        Figure::new("Desempenho por Faixa Etária")
            .height(500)
            .axis_titles("Faixa Etária", "Nota Média"),
        |fig, (score, y)| fig.trace(Trace::line(score.area(), x.clone(), y, false)),
    );
    analysis.chart = Some(chart);

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::table;

    fn sample() -> CleanTable {
        table(
            5,
            &[(
                col::AGE_BRACKET,
                vec![
                    Some("Mais de 25"),
                    Some("18-19"),
                    Some("Menor que 18"),
                    Some("18-19"),
                    None,
                ],
            )],
            &[
                (
                    col::HUMANITIES,
                    vec![Some(480.0), Some(520.0), Some(500.0), Some(540.0), Some(1.0)],
                ),
                (
                    col::MATH,
                    vec![Some(460.0), Some(560.0), Some(510.0), Some(580.0), Some(1.0)],
                ),
            ],
        )
    }

    #[test]
    fn test_brackets_in_age_order() {
        let analysis = analyze(&sample()).unwrap();
        let keys: Vec<_> = analysis.table.rows.iter().map(|r| r.key[0].as_str()).collect();
        assert_eq!(keys, vec!["Menor que 18", "18-19", "Mais de 25"]);
    }

    #[test]
    fn test_means_and_sizes() {
        let analysis = analyze(&sample()).unwrap();
        let t = &analysis.table;
        let row = t.find("18-19").unwrap();

        assert_eq!(t.value(row, col::HUMANITIES), Some(530.0));
        assert_eq!(t.value(row, col::MATH), Some(570.0));
        assert_eq!(t.value(row, PARTICIPANTS), Some(2.0));
        assert_eq!(t.value(row, OVERALL_MEAN), Some(550.0));
        assert_eq!(analysis.report[2], "   18-19: 550.0 (2 participantes)");
    }

    #[test]
    fn test_chart_lines_follow_bracket_order() {
        let chart = analyze(&sample()).unwrap().chart.unwrap();
        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data[0].name.as_deref(), Some("Ciências Humanas"));
        assert_eq!(chart.data[0].x[0], "Menor que 18");
        assert_eq!(chart.data[0].y[0], 500.0);
        assert_eq!(chart.data[0].mode, Some("lines"));
    }

    #[test]
    fn test_missing_bracket_column() {
        let t = table(1, &[], &[(col::MATH, vec![Some(500.0)])]);
        assert!(matches!(
            analyze(&t),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_blank_bracket_column_is_unavailable() {
        let t = table(
            1,
            &[(col::AGE_BRACKET, vec![None])],
            &[(col::MATH, vec![Some(500.0)])],
        );
        assert!(matches!(analyze(&t), Err(AnalysisError::NoData { .. })));
    }
}
