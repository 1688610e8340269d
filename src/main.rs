//! pdfsqueeze - compress a PDF file in place.
//!
//! Thin shell over the library pipeline: parse arguments, run one
//! compression operation, report the result. Exit code 0 on success, 1 on
//! any validation or compression failure; errors go to standard error.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdfsqueeze::cli::Cli;
use pdfsqueeze::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "pdfsqueeze=debug"
    } else if cli.quiet {
        "pdfsqueeze=error"
    } else {
        "pdfsqueeze=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let level = cli.compression_level()?;
    let compressor = cli.compressor()?;

    if !cli.quiet && !cli.json {
        println!("Compressing {} ({level})...", cli.file.display());
    }

    let outcome = compressor.compress(&cli.file, level).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !cli.quiet {
        println!(
            "✓ Compressed {}: {} -> {} bytes ({:.0}% of original)",
            cli.file.display(),
            outcome.original_size,
            outcome.compressed_size,
            outcome.ratio() * 100.0
        );
    }

    Ok(())
}
