//! Shared helpers for pdfsqueeze integration tests.
//!
//! The real engine is stood in for by small shell scripts served from a
//! `MemoryBundle`, so the whole pipeline runs for real without a Ghostscript
//! install. Engine-driven tests are therefore Unix-only.

#![allow(dead_code)] // each scenario module uses a different subset

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdfsqueeze::{Compressor, EngineFiles, MemoryBundle};
use std::sync::Arc;

/// Engine stand-in that copies the input to the requested output file.
pub const PASS_THROUGH_ENGINE: &str = r#"#!/bin/sh
out=""
in=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
    -*) ;;
    *) in="$arg" ;;
  esac
done
cp "$in" "$out"
exit 0
"#;

/// Engine stand-in that writes a fixed short output.
pub const TRUNCATING_ENGINE: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
done
printf 'small' > "$out"
exit 0
"#;

/// Engine stand-in that fails after writing a partial output.
pub const FAILING_ENGINE: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
done
printf 'partial garbage' > "$out"
echo "GPL Ghostscript: Unrecoverable error" >&2
exit 1
"#;

/// Engine stand-in that never finishes on its own.
pub const HANGING_ENGINE: &str = "#!/bin/sh\nsleep 30\nexit 0\n";

/// A compressor whose engine is the given script.
pub fn script_compressor(script: &str) -> Compressor {
    let files = EngineFiles::for_host();
    let bundle = MemoryBundle::new().with(files.executable, script.as_bytes().to_vec());
    Compressor::new(Arc::new(bundle))
}

/// Build a small but structurally complete one-page PDF.
pub fn minimal_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let content = Content {
        operations: vec![Operation::new("BT", vec![]), Operation::new("ET", vec![])],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode fixture content"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize fixture PDF");
    buf
}

/// Page count of the PDF at `path`, panicking if it is not a valid PDF.
pub fn page_count(path: &Path) -> usize {
    Document::load(path)
        .expect("output must be a loadable PDF")
        .get_pages()
        .len()
}

/// Working-area directories currently present in the system temp dir.
///
/// Leak checks snapshot this before an operation and assert the set is
/// unchanged afterwards; tests doing so run serially.
pub fn working_area_dirs() -> BTreeSet<PathBuf> {
    let mut dirs = BTreeSet::new();
    if let Ok(entries) = std::fs::read_dir(std::env::temp_dir()) {
        for entry in entries.flatten() {
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with("pdfsqueeze-")
            {
                dirs.insert(entry.path());
            }
        }
    }
    dirs
}

/// Files currently present in `dir` (one level, sorted).
pub fn dir_entries(dir: &Path) -> BTreeSet<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read test directory")
        .map(|entry| entry.expect("read dir entry").path())
        .collect()
}
