//! Building the engine command line.
//!
//! Ghostscript is sensitive to argument order: the output device comes
//! first, then the compatibility level and quality profile, the quiet/batch
//! flags, the font-embedding policy, the output file, and finally the input
//! path, last and unflagged. The builder here is a pure function; the full
//! invocation is determined before the child starts and no engine output
//! ever influences it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::CompressionLevel;

/// A fully resolved engine command: program, ordered arguments, and the
/// working directory the child runs in.
#[derive(Debug, Clone)]
pub struct EngineInvocation {
    /// Absolute path to the extracted engine executable.
    pub program: PathBuf,
    /// Ordered argument vector, exactly as handed to the child.
    pub args: Vec<OsString>,
    /// Child process working directory (the working area).
    pub working_dir: PathBuf,
}

/// Assemble the argument vector for one compression run.
///
/// The fixed flags force non-interactive, single-batch, quiet operation and
/// keep visual fidelity while reducing size: no blanket font embedding, but
/// subsets of the fonts actually used are embedded.
///
/// # Arguments
///
/// * `executable` - absolute path to the extracted engine binary
/// * `level` - validated compression level
/// * `source` - absolute path of the document to compress
/// * `artifact` - absolute path the engine writes its output to
/// * `working_dir` - the working area the child runs in
pub fn build_invocation(
    executable: &Path,
    level: CompressionLevel,
    source: &Path,
    artifact: &Path,
    working_dir: &Path,
) -> EngineInvocation {
    let mut args: Vec<OsString> = vec![
        "-sDEVICE=pdfwrite".into(),
        "-dCompatibilityLevel=1.5".into(),
        format!("-dPDFSETTINGS={}", level.profile()).into(),
        "-dNOPAUSE".into(),
        "-dQUIET".into(),
        "-dBATCH".into(),
        "-dEmbedAllFonts=false".into(),
        "-dSubsetFonts=true".into(),
    ];

    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(artifact.as_os_str());
    args.push(output_flag);

    // Input path last, unflagged.
    args.push(source.as_os_str().to_os_string());

    EngineInvocation {
        program: executable.to_path_buf(),
        args,
        working_dir: working_dir.to_path_buf(),
    }
}
