//! CLI argument parsing for pdfsqueeze.
//!
//! This module defines the command-line interface structure using `clap`.
//! The level argument is taken as a string and validated by the core so
//! that a bad level reports through the same error path (and exit code) as
//! every other validation failure.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::bundle::DirBundle;
use crate::compress::Compressor;
use crate::config::CompressionLevel;
use crate::error::Result;

/// Compress a PDF file in place.
///
/// pdfsqueeze rewrites the given file through a bundled Ghostscript engine
/// at the requested compression level and atomically replaces it with the
/// result. On any failure the original file is left untouched.
#[derive(Parser, Debug)]
#[command(name = "pdfsqueeze")]
#[command(version)]
#[command(about = "Compress a PDF file in place", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// PDF file to compress (replaced in place on success)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Compression level: 1 (strong), 2 (medium), 3 (weak), 4 (prepress)
    ///
    /// Level names are accepted as well, e.g. "strong".
    #[arg(value_name = "LEVEL")]
    pub level: String,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output - show engine diagnostics and pipeline detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Abort if the engine runs longer than this many seconds
    ///
    /// Without a timeout the wait for the engine is unbounded.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory holding the engine resources
    ///
    /// Defaults to the `resources/ghostscript` directory installed next to
    /// the executable.
    #[arg(long, value_name = "DIR", env = "PDFSQUEEZE_RESOURCES")]
    pub resources: Option<PathBuf>,
}

impl Cli {
    /// Parse and validate the compression level argument.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqueezeError::InvalidLevel`] for anything outside
    /// the accepted set.
    pub fn compression_level(&self) -> Result<CompressionLevel> {
        self.level.parse()
    }

    /// Build the compressor this invocation asks for.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the default resource location cannot be
    /// resolved.
    pub fn compressor(&self) -> Result<Compressor> {
        let bundle = match &self.resources {
            Some(dir) => DirBundle::new(dir),
            None => DirBundle::from_exe_dir()?,
        };
        let mut compressor = Compressor::new(Arc::new(bundle));
        if let Some(secs) = self.timeout {
            compressor = compressor.with_timeout(Duration::from_secs(secs));
        }
        Ok(compressor)
    }
}
