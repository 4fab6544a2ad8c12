//! Matrix sources: the built-in diffusion layer and matrix files

use anyhow::{Context, Result};
use gf2inv::codec::MAX_DIMENSION;
use gf2inv::PackedRow;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::CliError;

/// 32x32 diffusion layer of the byte-oriented challenge cipher, one packed row per output byte
pub const DIFFUSION: [PackedRow; 32] = [
    0xf26cb481, 0x16a5dc92, 0x3c5ba924, 0x79b65248, 0x2fc64b18, 0x615acd29, 0xc3b59a42, 0x976b2584,
    0x6cf281b4, 0xa51692dc, 0x5b3c24a9, 0xb6794852, 0xc62f184b, 0x5a6129cd, 0xb5c3429a, 0x6b978425,
    0xb481f26c, 0xdc9216a5, 0xa9243c5b, 0x524879b6, 0x4b182fc6, 0xcd29615a, 0x9a42c3b5, 0x2584976b,
    0x81b46cf2, 0x92dca516, 0x24a95b3c, 0x4852b679, 0x184bc62f, 0x29cd5a61, 0x429ab5c3, 0x84256b97,
];

/// A square matrix as `dimension` packed rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    pub dimension: usize,
    pub rows: Vec<PackedRow>,
}

/// On-disk layout of a matrix file (TOML or JSON)
///
/// `dimension` defaults to the number of rows.
#[derive(Deserialize, Debug)]
struct MatrixFile {
    dimension: Option<usize>,
    rows: Vec<RowValue>,
}

/// TOML integers are signed 64-bit, so wide rows can also be given as strings
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RowValue {
    Int(u64),
    Text(String),
}

impl RowValue {
    fn parse(&self) -> Result<PackedRow, CliError> {
        match self {
            RowValue::Int(v) => Ok(*v),
            RowValue::Text(s) => {
                let s = s.trim().replace('_', "");
                let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(hex) => PackedRow::from_str_radix(hex, 16),
                    None => s.parse(),
                };
                parsed.map_err(|e| CliError::MatrixFile(format!("bad row {:?}: {}", s, e)))
            }
        }
    }
}

impl Matrix {
    pub fn builtin() -> Self {
        Self {
            dimension: DIFFUSION.len(),
            rows: DIFFUSION.to_vec(),
        }
    }

    /// Picks the matrix named on the command line, then the one in the config, then the
    /// built-in layer
    pub fn resolve(path: Option<&Path>, config: &Config) -> Result<Self> {
        match path.or(config.defaults.matrix.as_deref()) {
            Some(p) => Self::load(p),
            None => {
                log::debug!("using built-in diffusion layer of dimension {}", DIFFUSION.len());
                Ok(Self::builtin())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;

        let is_json = path.extension().is_some_and(|e| e == "json");
        let file: MatrixFile = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON matrix: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML matrix: {}", path.display()))?
        };

        Self::from_file(file).with_context(|| format!("In matrix file {}", path.display()))
    }

    fn from_file(file: MatrixFile) -> Result<Self, CliError> {
        let rows = file
            .rows
            .iter()
            .map(RowValue::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let dimension = file.dimension.unwrap_or(rows.len());

        if dimension == 0 || dimension > MAX_DIMENSION {
            return Err(CliError::MatrixFile(format!(
                "dimension must be between 1 and {}, got {}",
                MAX_DIMENSION, dimension
            )));
        }
        if rows.len() != dimension {
            return Err(CliError::MatrixFile(format!(
                "expected {} rows, got {}",
                dimension,
                rows.len()
            )));
        }
        if dimension < MAX_DIMENSION && rows.iter().any(|r| r >> dimension != 0) {
            log::warn!(
                "rows have bits set above column {}; they will be ignored",
                dimension - 1
            );
        }

        Ok(Self { dimension, rows })
    }
}
