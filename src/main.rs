//! `bbsxtra-programmer` command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bbsxtra_programmer::{run, Error, UnitRegistry, HEADER_FILE_NAME};

#[derive(Parser)]
#[command(name = "bbsxtra-programmer")]
#[command(about = "A tool to compile firmware for the Bafang BBS02/BBSHD ebike motor")]
struct Cli {
    /// Path to the yaml configuration file
    filename: PathBuf,

    /// Header to write
    #[arg(short, long, default_value = HEADER_FILE_NAME)]
    output: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let units = UnitRegistry::new();
    match run(&cli.filename, &cli.output, &units) {
        Ok(_) => ExitCode::SUCCESS,
        Err(Error::Schema(errors)) => {
            eprintln!(
                "{}: {} validation error(s), {} not written",
                cli.filename.display(),
                errors.len(),
                cli.output.display()
            );
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            let e = anyhow::Error::new(e)
                .context(format!("failed to generate {}", cli.output.display()));
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
