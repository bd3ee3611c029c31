//! Interactive choice of how many rows to load.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::error::{AnalysisError, Result};

/// Row cap used by the "sample" option.
pub const DEFAULT_SAMPLE: usize = 100_000;

/// Asks which portion of the dataset to load and returns the row cap
/// (`None` loads everything). Unrecognised options and unparsable counts
/// fall back to the full dataset.
pub fn choose_sample<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<usize>> {
    writeln!(out)?;
    writeln!(out, "CONFIGURAÇÃO:")?;
    writeln!(out, "1. Usar todos os dados (pode ser lento)")?;
    writeln!(out, "2. Usar amostra de 100.000 registros (mais rápido)")?;
    writeln!(out, "3. Usar amostra personalizada")?;
    write!(out, "\nEscolha uma opção (1/2/3): ")?;
    out.flush()?;

    let choice = read_line(input)?;
    match choice.as_str() {
        "2" => Ok(Some(DEFAULT_SAMPLE)),
        "3" => {
            write!(out, "Digite o número de registros: ")?;
            out.flush()?;
            let raw = read_line(input)?;
            match parse_row_count(&raw) {
                Ok(n) => Ok(Some(n)),
                Err(e) => {
                    warn!(error = %e, "Falling back to the full dataset");
                    writeln!(out, "Valor inválido, usando todos os dados")?;
                    Ok(None)
                }
            }
        }
        _ => Ok(None),
    }
}

/// Parses a user-typed row count.
pub fn parse_row_count(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| AnalysisError::InvalidInput(raw.trim().to_string()))
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
