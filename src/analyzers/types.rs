//! Data types shared by the five analyses.

use std::fmt;

use serde::Serialize;

use crate::chart::Figure;

/// Identity of each analysis. Fixes its output file name and report heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisKind {
    ByState,
    Socioeconomic,
    TopEssay,
    BySex,
    ByAge,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::ByState,
        AnalysisKind::Socioeconomic,
        AnalysisKind::TopEssay,
        AnalysisKind::BySex,
        AnalysisKind::ByAge,
    ];

    /// Ordinal-prefixed file stem shared by the chart and table outputs.
    pub fn file_stem(self) -> &'static str {
        match self {
            AnalysisKind::ByState => "01_desempenho_por_estado",
            AnalysisKind::Socioeconomic => "02_desempenho_socioeconomico",
            AnalysisKind::TopEssay => "03_maiores_notas_redacao",
            AnalysisKind::BySex => "04_comparacao_por_genero",
            AnalysisKind::ByAge => "05_desempenho_faixa_etaria",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            AnalysisKind::ByState => "ANÁLISE 1: Desempenho por Estado e Região",
            AnalysisKind::Socioeconomic => "ANÁLISE 2: Desempenho por Nível Socioeconômico",
            AnalysisKind::TopEssay => "ANÁLISE 3: Maiores Notas de Redação por Estado",
            AnalysisKind::BySex => "ANÁLISE 4: Desempenho por Gênero nas Áreas",
            AnalysisKind::ByAge => "ANÁLISE 5: Desempenho por Faixa Etária",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// One row of a grouped summary: the group key and one value per value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// Grouped numeric summary produced by an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub key_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(key_columns: &[&str], value_columns: Vec<String>) -> Self {
        Self {
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
            value_columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        self.key_columns
            .iter()
            .chain(&self.value_columns)
            .cloned()
            .collect()
    }

    /// Row whose first key equals `key`.
    pub fn find(&self, key: &str) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|r| r.key.first().is_some_and(|k| k == key))
    }

    /// Value of `column` in `row`, if both exist and the cell is present.
    pub fn value(&self, row: &SummaryRow, column: &str) -> Option<f64> {
        let idx = self.value_columns.iter().position(|c| c == column)?;
        row.values.get(idx).copied().flatten()
    }
}

/// Output of one analysis: summary table, console report and an optional chart.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub kind: AnalysisKind,
    pub table: SummaryTable,
    pub report: Vec<String>,
    pub chart: Option<Figure>,
}

impl Analysis {
    pub fn new(kind: AnalysisKind, table: SummaryTable) -> Self {
        Self {
            kind,
            table,
            report: Vec::new(),
            chart: None,
        }
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.report.push(text.into());
    }
}
