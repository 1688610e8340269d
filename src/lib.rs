//! pdfsqueeze - compress PDF files in place with a bundled Ghostscript
//! engine.
//!
//! The library orchestrates one external compression run per operation:
//!
//! - extract the engine executable and its dependencies from a
//!   [`ResourceBundle`] into a private working area,
//! - assemble the order-sensitive engine argument vector for the requested
//!   [`CompressionLevel`],
//! - run the engine as a child process, draining both output streams
//!   concurrently,
//! - on exit code 0, atomically replace the source file with the result,
//! - remove the working area and any leftover output artifact on every exit
//!   path.
//!
//! The original file is only mutated by the final rename of a fully
//! produced output, so it is never left half-written.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsqueeze::{compress, CompressionLevel};
//! use std::path::Path;
//!
//! # async fn example() -> pdfsqueeze::Result<()> {
//! let outcome = compress(Path::new("report.pdf"), CompressionLevel::Strong).await?;
//! println!(
//!     "{} -> {} bytes",
//!     outcome.original_size, outcome.compressed_size
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Callers with their own resource store (or tests) can supply a bundle
//! explicitly:
//!
//! ```no_run
//! use pdfsqueeze::{Compressor, CompressionLevel, DirBundle};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> pdfsqueeze::Result<()> {
//! let compressor = Compressor::new(Arc::new(DirBundle::new("/opt/pdfsqueeze/gs")));
//! compressor
//!     .compress(Path::new("report.pdf"), CompressionLevel::Medium)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod invocation;
pub mod runner;
pub mod validation;
pub mod workspace;

// Re-export commonly used types
pub use bundle::{DirBundle, EngineFiles, MemoryBundle, ResourceBundle};
pub use compress::{CompressionOutcome, Compressor, compress};
pub use config::CompressionLevel;
pub use error::{Result, SqueezeError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
