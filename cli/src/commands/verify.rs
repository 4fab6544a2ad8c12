//! Verify command implementation

use anyhow::{Context, Result};
use clap::Args;
use gf2inv::{invert_packed, transform::diffuse, unpack_matrix, BitMatrix};
use log::{debug, info};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;
use crate::matrix::Matrix;

#[derive(Args)]
pub struct VerifyCommand {
    /// Matrix file (TOML or JSON); defaults to the built-in diffusion layer
    #[arg(short, long, value_name = "FILE")]
    pub matrix: Option<PathBuf>,

    /// Number of random vectors to check
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Seed for the vector generator (random if not given)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl VerifyCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let matrix = Matrix::resolve(self.matrix.as_deref(), config)?;
        let n = matrix.dimension;
        let samples = self.samples.unwrap_or(config.defaults.samples);

        let inv = invert_packed(&matrix.rows, n).context("Failed to invert matrix")?;
        if let Some(&column) = inv.singular_columns.first() {
            return Err(CliError::NotInvertible { column }.into());
        }

        let forward = unpack_matrix(&matrix.rows, n)?;
        let backward = unpack_matrix(&inv.rows, n)?;
        let id = BitMatrix::identity(n);
        if &forward * &backward != id || &backward * &forward != id {
            return Err(CliError::NotIdentity.into());
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut failed = 0;
        for sample in 0..samples {
            let v: Vec<u8> = (0..n).map(|_| rng.random()).collect();
            let mixed = diffuse(&matrix.rows, &v)?;
            let mixed_on_grid = forward.apply_bytes(&v)?;
            let restored = diffuse(&inv.rows, &mixed)?;

            if mixed != mixed_on_grid || restored != v {
                debug!(
                    "sample {}: input {} packed {} grid {} restored {}",
                    sample,
                    hex::encode(&v),
                    hex::encode(&mixed),
                    hex::encode(&mixed_on_grid),
                    hex::encode(&restored)
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(CliError::Verification { failed, samples }.into());
        }

        info!("{} random vectors round-tripped", samples);
        println!(
            "ok: {}x{} matrix and its inverse agree on {} vectors",
            n, n, samples
        );
        Ok(())
    }
}
