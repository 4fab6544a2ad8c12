//! gf2inv - invert and check GF(2) diffusion layers from the command line

mod commands;
mod config;
mod error;
mod formats;
mod matrix;

use anyhow::Result;
use clap::Parser;
use commands::Commands;
use config::Config;

#[derive(Parser)]
#[command(
    name = "gf2inv",
    version,
    about = "Invert bit-matrix diffusion layers over GF(2)",
    long_about = "Computes the inverse of a square bit matrix over GF(2) given as packed rows, \
                  applies a matrix or its inverse to byte vectors, and self-tests the result \
                  against random vectors. Without --matrix the built-in 32x32 diffusion layer is used."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.execute(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                if cli.verbose {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}
