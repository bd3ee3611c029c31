//! Grouped score analyses.
//!
//! Each analysis reads the cleaned table, groups participants by one
//! categorical field, averages the score columns that are present and
//! produces a summary table, console report lines and a chart.

pub mod analyzer;
pub mod by_age;
pub mod by_sex;
pub mod by_state;
pub mod essay;
pub mod socioeconomic;
pub mod types;
pub mod utility;

use crate::mappings::{SCORE_COLUMNS, area_name};
use crate::table::CleanTable;

/// A score column that exists in the table.
#[derive(Debug, Clone, Copy)]
pub struct ScoreColumn<'a> {
    pub name: &'static str,
    pub values: &'a [Option<f64>],
}

impl ScoreColumn<'_> {
    pub fn area(&self) -> &'static str {
        area_name(self.name)
    }
}

/// The score columns present in `table`, in fixed subject order.
pub fn score_columns(table: &CleanTable) -> Vec<ScoreColumn<'_>> {
    SCORE_COLUMNS
        .iter()
        .filter_map(|&name| {
            table
                .numbers(name)
                .map(|values| ScoreColumn { name, values })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::table::{CleanTable, Column};

    /// Builds a cleaned table directly from typed columns.
    pub fn table(
        len: usize,
        text: &[(&str, Vec<Option<&str>>)],
        numbers: &[(&str, Vec<Option<f64>>)],
    ) -> CleanTable {
        let mut t = CleanTable::with_len(len);
        for (name, cells) in text {
            t.insert(
                name,
                Column::Text(cells.iter().map(|c| c.map(str::to_string)).collect()),
            );
        }
        for (name, cells) in numbers {
            t.insert(name, Column::Number(cells.clone()));
        }
        t
    }
}
