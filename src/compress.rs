//! The compression pipeline.
//!
//! One operation walks the stages
//! `Validating → Extracting → Invoking → AwaitingExit → {Committing | Failed}
//! → CleaningUp → Done`; no path skips cleanup, and a validation failure
//! returns before anything is extracted.
//!
//! The original file is only ever mutated by the final rename of a fully
//! produced output artifact, so a partial write to the source is impossible
//! by construction.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::bundle::{DirBundle, EngineFiles, ResourceBundle};
use crate::config::CompressionLevel;
use crate::error::{Result, SqueezeError};
use crate::invocation::build_invocation;
use crate::runner;
use crate::validation::validate_source;
use crate::workspace::WorkingArea;

/// Sizes and timing of one successful compression.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionOutcome {
    /// Size of the source before compression, in bytes.
    pub original_size: u64,
    /// Size of the file now at the source path, in bytes.
    pub compressed_size: u64,
    /// Wall-clock duration of the whole operation.
    #[serde(serialize_with = "duration_seconds", rename = "elapsedSeconds")]
    pub elapsed: Duration,
}

impl CompressionOutcome {
    /// Compressed size as a fraction of the original (1.0 = no change).
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }
}

fn duration_seconds<S: Serializer>(d: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// Compresses PDF files in place using a bundled engine.
///
/// A `Compressor` holds no per-operation state; concurrent calls against
/// different source paths are safe and fully independent. At most one
/// in-flight operation per source path is a caller precondition: the final
/// rename is not coordinated between concurrent writers of the same path.
pub struct Compressor {
    bundle: Arc<dyn ResourceBundle>,
    files: EngineFiles,
    timeout: Option<Duration>,
}

impl Compressor {
    /// Compressor reading engine resources from the given bundle, using the
    /// engine layout for the host platform.
    pub fn new(bundle: Arc<dyn ResourceBundle>) -> Self {
        Self {
            bundle,
            files: EngineFiles::for_host(),
            timeout: None,
        }
    }

    /// Compressor using the resource directory installed next to the
    /// running executable (or the `PDFSQUEEZE_RESOURCES` override).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the executable path cannot be resolved.
    pub fn from_default_bundle() -> Result<Self> {
        Ok(Self::new(Arc::new(DirBundle::from_exe_dir()?)))
    }

    /// Override the engine file layout (mainly for tests and non-standard
    /// engine builds).
    pub fn with_engine_files(mut self, files: EngineFiles) -> Self {
        self.files = files;
        self
    }

    /// Kill the engine and fail the operation if it runs longer than this.
    ///
    /// Without a timeout the wait is unbounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Compress `source` in place at `level`.
    ///
    /// On success the file at `source` is atomically replaced with the
    /// compressed result. On any failure it is left byte-for-byte untouched.
    /// The working area and the output artifact are removed on every exit
    /// path.
    ///
    /// # Errors
    ///
    /// Any [`SqueezeError`]; see the error module for the families.
    pub async fn compress(
        &self,
        source: &Path,
        level: CompressionLevel,
    ) -> Result<CompressionOutcome> {
        let started = Instant::now();

        // Validating: terminal on failure, before any side effect.
        let original_size = validate_source(source).await?;

        // The child runs with the working area as its current directory, so
        // every path handed to it must be absolute.
        let source = std::path::absolute(source)?;

        // Extracting.
        let area = WorkingArea::provision(self.bundle.as_ref(), self.files).await?;
        let artifact = ArtifactGuard::new(artifact_path(&source));

        // Invoking → AwaitingExit → {Committing | Failed}.
        let result = self
            .run_and_commit(&area, artifact.path(), &source, level)
            .await;

        // CleaningUp: extracted files, then the directory, then the
        // artifact if it was not promoted. Unconditional.
        area.close().await;
        artifact.release().await;

        let compressed_size = result?;
        let outcome = CompressionOutcome {
            original_size,
            compressed_size,
            elapsed: started.elapsed(),
        };
        info!(
            source = %source.display(),
            %level,
            original = outcome.original_size,
            compressed = outcome.compressed_size,
            "compressed in place"
        );
        Ok(outcome)
    }

    async fn run_and_commit(
        &self,
        area: &WorkingArea,
        artifact: &Path,
        source: &Path,
        level: CompressionLevel,
    ) -> Result<u64> {
        let invocation = build_invocation(area.executable(), level, source, artifact, area.path());

        let exit = runner::run(&invocation, self.timeout).await?;
        if !exit.success() {
            return Err(SqueezeError::CompressionFailed {
                code: exit.code,
                stderr: exit.stderr,
            });
        }

        // Committing: promote the artifact over the source. Both live in the
        // same directory, so this is a plain rename and atomic where the
        // filesystem supports it.
        let compressed_size = tokio::fs::metadata(artifact).await?.len();
        tokio::fs::rename(artifact, source).await?;
        debug!(artifact = %artifact.display(), "promoted output artifact");

        Ok(compressed_size)
    }
}

/// Compress `source` in place at `level` using the default resource bundle.
///
/// Convenience wrapper over [`Compressor`]; see its documentation for the
/// contract.
///
/// # Errors
///
/// Any [`SqueezeError`].
pub async fn compress(source: &Path, level: CompressionLevel) -> Result<CompressionOutcome> {
    Compressor::from_default_bundle()?.compress(source, level).await
}

/// Scoped ownership of the output artifact path: removed at the end of the
/// operation unless the rename already promoted it.
struct ArtifactGuard {
    path: PathBuf,
}

impl ArtifactGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort removal; a missing file means the artifact was promoted.
    async fn release(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(artifact = %self.path.display(), "discarded output artifact"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(artifact = %self.path.display(), %err, "failed to remove output artifact");
            }
        }
    }
}

/// Where the engine writes its output: a hidden sibling of the source, so
/// the final promotion is a same-filesystem rename.
fn artifact_path(source: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = source.file_name() {
        name.push(file_name);
    }
    name.push(format!(".pdfsqueeze.{}.tmp", std::process::id()));

    match source.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
