//! Error types for pdfsqueeze.
//!
//! Every failure the pipeline can report is a variant of [`SqueezeError`].
//! The variants fall into four families:
//!
//! - **Invalid input**: bad source path or compression level. Reported before
//!   any filesystem or process side effect.
//! - **Packaging faults**: an engine resource missing from the bundle.
//! - **Engine faults**: the engine could not be started, exited non-zero, or
//!   (when a timeout is configured) ran too long.
//! - **I/O**: everything else that can go wrong on disk.
//!
//! Cleanup failures are deliberately *not* errors; they are logged as
//! warnings and never change the outcome of an operation.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for pdfsqueeze operations.
pub type Result<T> = std::result::Result<T, SqueezeError>;

/// Main error type for pdfsqueeze operations.
#[derive(Debug, thiserror::Error)]
pub enum SqueezeError {
    /// Source file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path that does not exist.
        path: PathBuf,
    },

    /// Source path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Source file is read-only and the permission bit could not be cleared.
    #[error("File is not writable: {}", .path.display())]
    NotWritable {
        /// Path that cannot be written.
        path: PathBuf,
    },

    /// Compression level is outside the accepted set.
    #[error(
        "Invalid compression level: {value}. \
         Expected 1 (strong), 2 (medium), 3 (weak) or 4 (prepress)"
    )]
    InvalidLevel {
        /// The rejected level as given by the caller.
        value: String,
    },

    /// A required engine resource is absent from the bundle. This is a
    /// packaging defect, not a user input fault.
    #[error("Engine resource missing from bundle: {name}")]
    MissingResource {
        /// Logical name of the missing resource.
        name: String,
    },

    /// The engine binary could not be launched.
    #[error("Failed to start engine: {}\n  Reason: {source}", .program.display())]
    ProcessStart {
        /// Path to the binary that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The engine exited with a non-zero code. The source file is left
    /// untouched; the engine's stderr is carried here as evidence.
    #[error("Compression failed: engine exited with code {code}\n{}", .stderr.trim_end())]
    CompressionFailed {
        /// Engine exit code (-1 if terminated by a signal).
        code: i32,
        /// Captured standard error of the engine.
        stderr: String,
    },

    /// The engine ran longer than the configured timeout and was killed.
    #[error("Engine did not finish within {}s", .limit.as_secs())]
    EngineTimeout {
        /// The configured limit.
        limit: Duration,
    },

    /// Failed to encode the compression report.
    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SqueezeError {
    /// True for errors caused by caller input rather than the environment.
    ///
    /// Input faults are reported before any side effect is attempted.
    pub fn is_input_fault(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::NotWritable { .. }
                | Self::InvalidLevel { .. }
        )
    }
}
