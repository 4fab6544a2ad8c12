//! Apply command implementation

use anyhow::{Context, Result};
use clap::Args;
use gf2inv::{invert_packed, transform::diffuse};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;
use crate::matrix::Matrix;

#[derive(Args)]
pub struct ApplyCommand {
    /// Input vector as hex, one byte per matrix row
    #[arg(value_name = "HEX")]
    pub vector: String,

    /// Matrix file (TOML or JSON); defaults to the built-in diffusion layer
    #[arg(short, long, value_name = "FILE")]
    pub matrix: Option<PathBuf>,

    /// Apply the inverse of the matrix
    #[arg(long)]
    pub inverse: bool,
}

impl ApplyCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let matrix = Matrix::resolve(self.matrix.as_deref(), config)?;

        let input = hex::decode(self.vector.trim()).context("Vector is not valid hex")?;
        if input.len() != matrix.dimension {
            return Err(CliError::VectorLength {
                expected: matrix.dimension,
                actual: input.len(),
            }
            .into());
        }

        let rows = if self.inverse {
            let inv = invert_packed(&matrix.rows, matrix.dimension)
                .context("Failed to invert matrix")?;
            if let Some(&column) = inv.singular_columns.first() {
                return Err(CliError::NotInvertible { column }.into());
            }
            inv.rows
        } else {
            matrix.rows
        };

        let output = diffuse(&rows, &input)?;
        println!("{}", hex::encode(output));
        Ok(())
    }
}
