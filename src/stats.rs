use serde::Serialize;

use crate::analyzers::score_columns;
use crate::analyzers::utility::{fmt_count, mean, sample_stddev};
use crate::mappings::col;
use crate::table::CleanTable;

/// Mean and spread of one score column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub column: String,
    pub area: String,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

/// Count and share of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub pct: f64,
}

/// Overview of the cleaned table printed before the analyses.
#[derive(Debug, Default, Serialize)]
pub struct GeneralStats {
    pub participants: usize,
    pub scores: Vec<ScoreStats>,
    pub by_sex: Option<Vec<Share>>,
    pub by_region: Option<Vec<Share>>,
}

impl GeneralStats {
    pub fn from_table(table: &CleanTable) -> Self {
        let participants = table.len();

        let scores = score_columns(table)
            .into_iter()
            .map(|score| {
                let values: Vec<f64> = score.values.iter().filter_map(|v| *v).collect();
                let avg = (!values.is_empty()).then(|| mean(&values));
                ScoreStats {
                    column: score.name.to_string(),
                    area: score.area().to_string(),
                    mean: avg,
                    stddev: avg.and_then(|m| sample_stddev(&values, m)),
                }
            })
            .collect();

        GeneralStats {
            participants,
            scores,
            by_sex: table
                .text(col::SEX)
                .map(|c| Self::value_counts(c, participants)),
            by_region: table
                .text(col::REGION)
                .map(|c| Self::value_counts(c, participants)),
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Counts per label, most frequent first. Missing cells are not counted
    /// but still weigh in the percentage base.
    fn value_counts(cells: &[Option<String>], total: usize) -> Vec<Share> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for label in cells.iter().flatten() {
            match counts.iter_mut().find(|(l, _)| l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        counts
            .into_iter()
            .map(|(label, count)| Share {
                label,
                count,
                pct: Self::pct(count, total),
            })
            .collect()
    }

    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Total de participantes: {}",
            fmt_count(self.participants)
        )];

        if !self.scores.is_empty() {
            lines.push(String::new());
            lines.push("MÉDIAS DAS NOTAS:".to_string());
            for s in &self.scores {
                let mean = s.mean.map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
                let sd = s.stddev.map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
                lines.push(format!("   {}: {} (±{})", s.area, mean, sd));
            }
        }

        for (title, shares) in [
            ("DISTRIBUIÇÃO POR SEXO:", &self.by_sex),
            ("DISTRIBUIÇÃO POR REGIÃO:", &self.by_region),
        ] {
            let Some(shares) = shares else { continue };
            lines.push(String::new());
            lines.push(title.to_string());
            for share in shares {
                lines.push(format!(
                    "   {}: {} ({:.1}%)",
                    share.label,
                    fmt_count(share.count),
                    share.pct
                ));
            }
        }

        lines
    }
}
