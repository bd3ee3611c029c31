use tracing::{info, warn};

use crate::analyzers::types::{Analysis, AnalysisKind};
use crate::analyzers::{by_age, by_sex, by_state, essay, socioeconomic};
use crate::error::Result;
use crate::table::CleanTable;

/// Runs a single analysis against the cleaned table.
pub fn run(kind: AnalysisKind, table: &CleanTable) -> Result<Analysis> {
    match kind {
        AnalysisKind::ByState => by_state::analyze(table),
        AnalysisKind::Socioeconomic => socioeconomic::analyze(table),
        AnalysisKind::TopEssay => essay::analyze(table),
        AnalysisKind::BySex => by_sex::analyze(table),
        AnalysisKind::ByAge => by_age::analyze(table),
    }
}

/// Outcome of one analysis in a full run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub kind: AnalysisKind,
    pub result: Result<Analysis>,
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&Analysis> {
        self.result.as_ref().ok()
    }
}

/// Runs all five analyses in order. A failing analysis is logged and kept as
/// an error outcome; the others still run.
pub fn run_all(table: &CleanTable) -> Vec<AnalysisOutcome> {
    AnalysisKind::ALL
        .iter()
        .map(|&kind| {
            let span = tracing::info_span!("analysis", %kind);
            let _enter = span.enter();

            let result = run(kind, table);
            match &result {
                Ok(analysis) => info!(
                    groups = analysis.table.rows.len(),
                    chart = analysis.chart.is_some(),
                    "Analysis complete"
                ),
                Err(e) => warn!(error = %e, "Analysis unavailable"),
            }
            AnalysisOutcome { kind, result }
        })
        .collect()
}
