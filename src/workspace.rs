//! The working area: a process-private temporary directory holding the
//! extracted engine.
//!
//! Each operation provisions its own [`WorkingArea`]; nothing is shared
//! between concurrent operations, so there are no filename collisions and no
//! partial-cleanup interference. The area doubles as the child process's
//! working directory.
//!
//! Cleanup is best-effort: extracted files are removed first, then the
//! directory. Failures are logged as warnings and never escalate. Dropping
//! the area without calling [`WorkingArea::close`] still removes the
//! directory tree (the `TempDir` drop is the backstop).

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::bundle::{EngineFiles, ResourceBundle};
use crate::error::Result;

/// A provisioned working area with the engine extracted into it.
#[derive(Debug)]
pub struct WorkingArea {
    dir: TempDir,
    extracted: Vec<PathBuf>,
    executable: PathBuf,
}

impl WorkingArea {
    /// Create a fresh temporary directory and extract the engine files into
    /// it, byte-for-byte, executable first.
    ///
    /// Extraction aborts on the first missing resource without attempting
    /// the rest; the half-provisioned directory is removed by the `TempDir`
    /// drop. The executable permission bit is set on the primary binary
    /// (a no-op on platforms where it is not needed).
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqueezeError::MissingResource`] for an absent bundle
    /// entry, or an I/O error if extraction fails.
    pub async fn provision(bundle: &dyn ResourceBundle, files: EngineFiles) -> Result<Self> {
        let dir = TempDir::with_prefix("pdfsqueeze-")?;

        let mut extracted = Vec::new();
        for name in files.names() {
            let bytes = bundle.read(name)?;
            let dest = dir.path().join(name);
            tokio::fs::write(&dest, &bytes).await?;
            extracted.push(dest);
        }

        let executable = dir.path().join(files.executable);
        mark_executable(&executable).await?;

        debug!(
            dir = %dir.path().display(),
            files = extracted.len(),
            "provisioned working area"
        );

        Ok(Self {
            dir,
            extracted,
            executable,
        })
    }

    /// The directory itself; used as the child process working directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of the extracted engine executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Remove the extracted files, then the directory.
    ///
    /// Best-effort: failures are logged, never returned. Once the primary
    /// outcome of an operation is determined, cleanup cannot change it.
    pub async fn close(self) {
        for file in &self.extracted {
            if let Err(err) = tokio::fs::remove_file(file).await {
                warn!(file = %file.display(), %err, "failed to remove extracted engine file");
            }
        }
        if let Err(err) = self.dir.close() {
            warn!(%err, "failed to remove working area");
        }
    }
}

#[cfg(unix)]
async fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn mark_executable(_path: &Path) -> Result<()> {
    // Copied files are already executable on Windows.
    Ok(())
}
