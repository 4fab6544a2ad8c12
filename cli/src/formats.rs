//! Output format handling

use anyhow::{Context, Result};
use clap::ValueEnum;
use gf2inv::{unpack, PackedRow};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One zero-padded hex row per line
    #[default]
    Hex,
    /// One decimal row per line
    Dec,
    /// One row of 0/1 digits per line, column 0 first
    Bits,
    Json,
}

/// JSON output; readable back as a matrix file
#[derive(Serialize, Debug)]
struct RowsDocument<'a> {
    dimension: usize,
    invertible: bool,
    rows: &'a [PackedRow],
}

/// Renders packed rows of dimension `n`
pub fn render_rows(
    rows: &[PackedRow],
    n: usize,
    invertible: bool,
    format: OutputFormat,
) -> Result<String> {
    let digits = n.div_ceil(4);
    let lines = match format {
        OutputFormat::Hex => rows
            .iter()
            .map(|r| format!("0x{:0width$x}", r, width = digits))
            .collect::<Vec<_>>(),
        OutputFormat::Dec => rows.iter().map(|r| r.to_string()).collect(),
        OutputFormat::Bits => rows
            .iter()
            .map(|&r| -> Result<String> {
                let bits = unpack(r, n)?;
                Ok(bits.iter().map(|b| char::from(b'0' + b)).collect())
            })
            .collect::<Result<Vec<String>>>()?,
        OutputFormat::Json => {
            let doc = RowsDocument {
                dimension: n,
                invertible,
                rows,
            };
            return serde_json::to_string_pretty(&doc).context("Failed to serialize rows");
        }
    };
    Ok(lines.join("\n"))
}
