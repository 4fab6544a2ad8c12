//! Command implementations for the gf2inv CLI

mod apply;
mod invert;
mod verify;

pub use apply::ApplyCommand;
pub use invert::InvertCommand;
pub use verify::VerifyCommand;

use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the inverse of a matrix as packed rows
    Invert(InvertCommand),

    /// Apply a matrix (or its inverse) to a byte vector
    Apply(ApplyCommand),

    /// Check the inverse against random byte vectors
    Verify(VerifyCommand),
}

impl Commands {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            Commands::Invert(cmd) => cmd.execute(config),
            Commands::Apply(cmd) => cmd.execute(config),
            Commands::Verify(cmd) => cmd.execute(config),
        }
    }
}
