//! Reader for the semicolon-delimited, Latin-1 encoded microdata file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use encoding_rs::WINDOWS_1252;
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::mappings::is_source_column;
use crate::table::RawTable;

pub const DELIMITER: u8 = b';';

/// Loads at most `cap` rows from `path`. Cells are kept as text, and only the
/// columns the cleaner reads are kept.
///
/// Files ending in `.gz` are decompressed on the fly.
///
/// # Errors
///
/// [`AnalysisError::MissingFile`] if `path` does not exist, and
/// [`AnalysisError::Parse`] if the file cannot be read or a row is malformed.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_table(path: &Path, cap: Option<usize>) -> Result<RawTable> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }

    let parse_error = |message: String| AnalysisError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| parse_error(e.to_string()))?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        debug!("Input is gzip-compressed");
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let table =
        read_table(reader, cap, is_source_column).map_err(|e| parse_error(e.to_string()))?;

    info!(
        rows = table.len(),
        columns = table.column_count(),
        "Data loaded"
    );
    Ok(table)
}

/// Reads a header line and up to `cap` records from any byte source, keeping
/// the columns whose header satisfies `keep`.
///
/// Rows are still checked against the full header width.
pub fn read_table<R, F>(reader: R, cap: Option<usize>, keep: F) -> csv::Result<RawTable>
where
    R: Read,
    F: Fn(&str) -> bool,
{
    let mut rdr = ReaderBuilder::new().delimiter(DELIMITER).from_reader(reader);

    let all: Vec<String> = rdr.byte_headers()?.iter().map(decode_latin1).collect();
    let selected: Vec<usize> = (0..all.len()).filter(|&i| keep(all[i].as_str())).collect();
    debug!(
        kept = selected.len(),
        dropped = all.len() - selected.len(),
        "Column selection"
    );
    let headers = selected.iter().map(|&i| all[i].clone()).collect();
    let mut table = RawTable::new(headers);

    let mut record = ByteRecord::new();
    while cap.is_none_or(|c| table.len() < c) && rdr.read_byte_record(&mut record)? {
        table.rows.push(
            selected
                .iter()
                .map(|&i| record.get(i).map_or_else(String::new, decode_latin1))
                .collect(),
        );
    }

    Ok(table)
}

fn decode_latin1(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}
