//! Invert command implementation

use anyhow::{Context, Result};
use clap::Args;
use gf2inv::invert_packed;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;
use crate::formats::{render_rows, OutputFormat};
use crate::matrix::Matrix;

#[derive(Args)]
pub struct InvertCommand {
    /// Matrix file (TOML or JSON); defaults to the built-in diffusion layer
    #[arg(short, long, value_name = "FILE")]
    pub matrix: Option<PathBuf>,

    /// Fail on a singular matrix instead of printing a best-effort result
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (use '-' for stdout)
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub output: String,
}

impl InvertCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let matrix = Matrix::resolve(self.matrix.as_deref(), config)?;
        let n = matrix.dimension;

        let inv = invert_packed(&matrix.rows, n).context("Failed to invert matrix")?;

        if let Some(&column) = inv.singular_columns.first() {
            if self.strict {
                return Err(CliError::NotInvertible { column }.into());
            }
            warn!(
                "matrix is not invertible (no pivot in columns {:?}); result is best-effort",
                inv.singular_columns
            );
        } else {
            info!("inverted {}x{} matrix", n, n);
        }

        let format = self.format.unwrap_or(config.defaults.format);
        let rendered = render_rows(&inv.rows, n, inv.invertible, format)?;

        if self.output == "-" {
            println!("{}", rendered);
        } else {
            fs::write(&self.output, rendered + "\n")
                .with_context(|| format!("Failed to write output file: {}", self.output))?;
        }

        Ok(())
    }
}
