//! Cleaning and enrichment pass.
//!
//! Consumes a [`RawTable`] and produces a [`CleanTable`] carrying the decoded
//! labels, brackets, tiers and the objective-score mean. Every step is guarded
//! by column presence; absent source columns are skipped without error.

use tracing::{debug, info};

use crate::mappings::{
    self, OBJECTIVE_COLUMNS, PRESENCE_COLUMNS, PRESENT, RACE_LABELS, SCHOOL_ADMIN_LABELS,
    SCHOOL_TYPE_LABELS, SCORE_COLUMNS, col,
};
use crate::table::{CleanTable, Column, RawTable};

/// Runs the full cleaning pass. The raw table is consumed, so a table can only
/// be enriched once.
#[tracing::instrument(skip(raw), fields(rows = raw.len(), columns = raw.column_count()))]
pub fn clean(raw: RawTable) -> CleanTable {
    let mut table = transpose(raw);

    derive_text(&mut table, col::SEX_CODE, col::SEX, mappings::decode_sex);
    derive_text(&mut table, col::RACE_CODE, col::RACE, |v| {
        mappings::parse_code(v).and_then(|c| mappings::decode(RACE_LABELS, c))
    });
    derive_text(&mut table, col::SCHOOL_TYPE_CODE, col::SCHOOL_TYPE, |v| {
        mappings::parse_code(v).and_then(|c| mappings::decode(SCHOOL_TYPE_LABELS, c))
    });
    derive_text(&mut table, col::SCHOOL_ADMIN_CODE, col::SCHOOL_ADMIN, |v| {
        mappings::parse_code(v).and_then(|c| mappings::decode(SCHOOL_ADMIN_LABELS, c))
    });
    derive_text(&mut table, col::STATE, col::REGION, mappings::region_for);
    derive_text(&mut table, col::AGE, col::AGE_BRACKET, |v| {
        mappings::parse_number(v).and_then(mappings::age_bracket)
    });

    add_objective_mean(&mut table);

    if let Some(income) = table.text(col::INCOME) {
        let ordinals: Vec<Option<f64>> = income
            .iter()
            .map(|cell| cell.as_deref().and_then(mappings::income_ordinal))
            .collect();
        let tiers = ordinals
            .iter()
            .map(|o| o.and_then(mappings::socio_tier).map(str::to_string))
            .collect();
        table.insert(col::INCOME_ORDINAL, Column::Number(ordinals));
        table.insert(col::SOCIO_TIER, Column::Text(tiers));
    }

    let before = table.len();
    filter_present(&mut table);

    info!(
        rows = table.len(),
        dropped = before - table.len(),
        "Data cleaned"
    );
    table
}

/// Builds the column store. Score columns become numeric, everything else
/// stays text with empty cells as missing.
fn transpose(raw: RawTable) -> CleanTable {
    let len = raw.len();
    let RawTable { headers, rows } = raw;

    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(len); headers.len()];
    for row in rows {
        for (idx, cell) in row.into_iter().enumerate() {
            if let Some(column) = cells.get_mut(idx) {
                column.push(cell);
            }
        }
    }

    let mut table = CleanTable::with_len(len);
    for (name, values) in headers.iter().zip(cells) {
        let column = if SCORE_COLUMNS.contains(&name.as_str()) {
            debug!(column = %name, "Coercing score column to numeric");
            Column::Number(values.iter().map(|v| mappings::parse_number(v)).collect())
        } else {
            Column::Text(
                values
                    .into_iter()
                    .map(|v| if v.trim().is_empty() { None } else { Some(v) })
                    .collect(),
            )
        };
        table.insert(name, column);
    }
    table
}

fn derive_text<F>(table: &mut CleanTable, source: &str, target: &str, decode: F)
where
    F: Fn(&str) -> Option<&'static str>,
{
    let Some(values) = table.text(source) else {
        debug!(source, "Source column absent, skipping");
        return;
    };

    let derived = values
        .iter()
        .map(|cell| cell.as_deref().and_then(&decode).map(str::to_string))
        .collect();
    table.insert(target, Column::Text(derived));
}

fn add_objective_mean(table: &mut CleanTable) {
    let present: Vec<&[Option<f64>]> = OBJECTIVE_COLUMNS
        .iter()
        .filter_map(|c| table.numbers(c))
        .collect();
    if present.is_empty() {
        return;
    }

    let means = (0..table.len())
        .map(|row| {
            let scores: Vec<f64> = present.iter().filter_map(|c| c[row]).collect();
            if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            }
        })
        .collect();
    table.insert(col::OBJECTIVE_MEAN, Column::Number(means));
}

/// Keeps only rows marked present on every attendance column that exists.
fn filter_present(table: &mut CleanTable) {
    let flags: Vec<&[Option<String>]> = PRESENCE_COLUMNS
        .iter()
        .filter_map(|c| table.text(c))
        .collect();
    if flags.is_empty() {
        return;
    }

    let keep: Vec<bool> = (0..table.len())
        .map(|row| {
            flags.iter().all(|c| {
                c[row]
                    .as_deref()
                    .and_then(mappings::parse_code)
                    .is_some_and(|code| code == PRESENT)
            })
        })
        .collect();
    table.retain_rows(&keep);
}
