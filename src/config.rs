//! Compression levels and their engine quality profiles.
//!
//! [`CompressionLevel`] is a closed set; each member maps one-to-one to a
//! Ghostscript `-dPDFSETTINGS` token. Anything outside the set is rejected
//! by the parsers here, before the pipeline touches the filesystem or starts
//! a process.

use std::fmt;
use std::str::FromStr;

use crate::error::SqueezeError;

/// How aggressively the engine compresses the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Smallest output, screen-resolution images (`/screen`).
    #[default]
    Strong,
    /// Balanced output suitable for reading devices (`/ebook`).
    Medium,
    /// Light compression, print-resolution images (`/printer`).
    Weak,
    /// Near-lossless, intended for professional printing (`/prepress`).
    Prepress,
}

impl CompressionLevel {
    /// Parse the numeric level used on the command line (1..=4).
    ///
    /// # Errors
    ///
    /// Returns [`SqueezeError::InvalidLevel`] for any value outside 1..=4.
    pub fn from_cli_level(value: i64) -> crate::Result<Self> {
        match value {
            1 => Ok(Self::Strong),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Weak),
            4 => Ok(Self::Prepress),
            _ => Err(SqueezeError::InvalidLevel {
                value: value.to_string(),
            }),
        }
    }

    /// The engine quality profile token for this level.
    ///
    /// The mapping is total: every level has exactly one token.
    pub fn profile(self) -> &'static str {
        match self {
            Self::Strong => "/screen",
            Self::Medium => "/ebook",
            Self::Weak => "/printer",
            Self::Prepress => "/prepress",
        }
    }

    /// The numeric level as accepted on the command line.
    pub fn cli_level(self) -> i64 {
        match self {
            Self::Strong => 1,
            Self::Medium => 2,
            Self::Weak => 3,
            Self::Prepress => 4,
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = SqueezeError;

    /// Parse a level from its name or its numeric form.
    ///
    /// Accepts `strong`, `medium`, `weak`, `prepress` (case-insensitive)
    /// as well as the CLI integers `1`..`4`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "strong" => Ok(Self::Strong),
            "medium" => Ok(Self::Medium),
            "weak" => Ok(Self::Weak),
            "prepress" => Ok(Self::Prepress),
            other => match other.parse::<i64>() {
                Ok(value) => Self::from_cli_level(value),
                Err(_) => Err(SqueezeError::InvalidLevel {
                    value: s.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strong => "strong",
            Self::Medium => "medium",
            Self::Weak => "weak",
            Self::Prepress => "prepress",
        };
        write!(f, "{name}")
    }
}
