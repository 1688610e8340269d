//! Source document validation.
//!
//! Runs before any other stage: a validation failure returns immediately,
//! with no temporary directory created and no process started. The source
//! must exist, be a regular file, and be writable; a read-only permission
//! bit is cleared once before giving up, since the file is the mutation
//! target at commit time.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SqueezeError};

/// Validate the source document and return its size in bytes.
///
/// # Errors
///
/// [`SqueezeError::FileNotFound`] if the path does not exist,
/// [`SqueezeError::NotAFile`] if it is a directory, or
/// [`SqueezeError::NotWritable`] if a read-only bit cannot be cleared.
pub async fn validate_source(path: &Path) -> Result<u64> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(SqueezeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    if metadata.is_dir() {
        return Err(SqueezeError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    if metadata.permissions().readonly() {
        // One attempt to restore the owner write bit, then fail.
        let perms = writable_permissions(metadata.permissions());
        if tokio::fs::set_permissions(path, perms).await.is_err() {
            return Err(SqueezeError::NotWritable {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "cleared read-only bit on source");
    }

    Ok(metadata.len())
}

#[cfg(unix)]
fn writable_permissions(perms: std::fs::Permissions) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = perms;
    perms.set_mode(perms.mode() | 0o200);
    perms
}

#[cfg(not(unix))]
fn writable_permissions(perms: std::fs::Permissions) -> std::fs::Permissions {
    let mut perms = perms;
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    perms
}
