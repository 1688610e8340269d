//! Bundled engine resources and their per-platform layout.
//!
//! The engine ships with the application as a set of named binary resources.
//! [`ResourceBundle`] abstracts over where those bytes live: a directory
//! installed next to the executable ([`DirBundle`]) or an in-memory map
//! ([`MemoryBundle`], used by tests and by embedders that link the bytes into
//! their own binary).
//!
//! [`EngineFiles`] is the platform table naming the executable and its
//! dependency libraries, resolved once per operation instead of branching
//! deep inside the pipeline.

use std::collections::HashMap;
use std::env;
use std::io;
use std::path::PathBuf;

use crate::error::{Result, SqueezeError};

/// Environment variable overriding the default resource directory.
pub const RESOURCE_DIR_ENV: &str = "PDFSQUEEZE_RESOURCES";

/// A store of named engine resources.
pub trait ResourceBundle: Send + Sync {
    /// Read a named resource byte-for-byte.
    ///
    /// # Errors
    ///
    /// Returns [`SqueezeError::MissingResource`] if the name is absent from
    /// the bundle.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// The engine file names for one target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineFiles {
    /// Name of the primary executable.
    pub executable: &'static str,
    /// Names of dynamic libraries the executable needs at runtime.
    pub libraries: &'static [&'static str],
}

const WINDOWS_ENGINE: EngineFiles = EngineFiles {
    executable: "gswin64c.exe",
    libraries: &["gsdll64.dll"],
};

const UNIX_ENGINE: EngineFiles = EngineFiles {
    executable: "gs",
    libraries: &[],
};

impl EngineFiles {
    /// The engine layout for the platform this binary was built for.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            WINDOWS_ENGINE
        } else {
            UNIX_ENGINE
        }
    }

    /// All resource names, executable first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.executable).chain(self.libraries.iter().copied())
    }
}

/// A bundle backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    /// Bundle rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Bundle at the default install location: `resources/ghostscript` next
    /// to the running executable, unless [`RESOURCE_DIR_ENV`] overrides it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the current executable path cannot be
    /// resolved.
    pub fn from_exe_dir() -> Result<Self> {
        if let Ok(dir) = env::var(RESOURCE_DIR_ENV) {
            return Ok(Self::new(dir));
        }
        let exe = env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| io::Error::other("executable path has no parent directory"))?;
        Ok(Self::new(dir.join("resources").join("ghostscript")))
    }

    /// The directory this bundle reads from.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ResourceBundle for DirBundle {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(SqueezeError::MissingResource {
                name: name.to_string(),
            });
        }
        Ok(std::fs::read(&path)?)
    }
}

/// A bundle holding resource bytes in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryBundle {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named resource.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl ResourceBundle for MemoryBundle {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| SqueezeError::MissingResource {
                name: name.to_string(),
            })
    }
}
