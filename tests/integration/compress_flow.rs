//! End-to-end pipeline tests with a scripted stand-in engine.

#![cfg(unix)]

use pdfsqueeze::{CompressionLevel, SqueezeError};
use serial_test::serial;
use std::time::Duration;

use crate::common::{
    HANGING_ENGINE, PASS_THROUGH_ENGINE, TRUNCATING_ENGINE, dir_entries, minimal_pdf, page_count,
    script_compressor, working_area_dirs,
};

#[tokio::test]
#[serial]
async fn test_success_replaces_source_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.pdf");
    let original = minimal_pdf();
    std::fs::write(&source, &original).unwrap();

    let areas_before = working_area_dirs();
    let compressor = script_compressor(PASS_THROUGH_ENGINE);
    let outcome = compressor
        .compress(&source, CompressionLevel::Strong)
        .await
        .unwrap();

    assert_eq!(outcome.original_size, original.len() as u64);
    assert_eq!(outcome.compressed_size, original.len() as u64);

    // Still a valid one-page PDF at the same path.
    assert_eq!(page_count(&source), 1);

    // No artifact left next to the source, no leaked working area.
    assert_eq!(dir_entries(dir.path()), [source.clone()].into());
    assert_eq!(working_area_dirs(), areas_before);
}

#[tokio::test]
#[serial]
async fn test_success_at_every_level() {
    for level in [
        CompressionLevel::Strong,
        CompressionLevel::Medium,
        CompressionLevel::Weak,
        CompressionLevel::Prepress,
    ] {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc.pdf");
        std::fs::write(&source, minimal_pdf()).unwrap();

        let compressor = script_compressor(PASS_THROUGH_ENGINE);
        let outcome = compressor.compress(&source, level).await.unwrap();
        assert_eq!(outcome.compressed_size, outcome.original_size);
    }
}

#[tokio::test]
#[serial]
async fn test_recompressing_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.pdf");
    std::fs::write(&source, minimal_pdf()).unwrap();

    let compressor = script_compressor(PASS_THROUGH_ENGINE);
    let first = compressor
        .compress(&source, CompressionLevel::Medium)
        .await
        .unwrap();
    let second = compressor
        .compress(&source, CompressionLevel::Medium)
        .await
        .unwrap();

    // Same level again succeeds and the size does not grow.
    assert!(second.compressed_size <= first.compressed_size);
    assert_eq!(page_count(&source), 1);
}

#[tokio::test]
#[serial]
async fn test_compressed_size_reflects_engine_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.pdf");
    std::fs::write(&source, minimal_pdf()).unwrap();

    let compressor = script_compressor(TRUNCATING_ENGINE);
    let outcome = compressor
        .compress(&source, CompressionLevel::Strong)
        .await
        .unwrap();

    assert_eq!(outcome.compressed_size, 5);
    assert_eq!(std::fs::read(&source).unwrap(), b"small");
}

#[tokio::test]
#[serial]
async fn test_relative_source_path() {
    // The child runs inside the working area; a relative source path must
    // still resolve against the caller's directory.
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.pdf");
    std::fs::write(&source, minimal_pdf()).unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let compressor = script_compressor(PASS_THROUGH_ENGINE);
    let result = compressor
        .compress("doc.pdf".as_ref(), CompressionLevel::Strong)
        .await;

    std::env::set_current_dir(previous).unwrap();

    result.unwrap();
    assert_eq!(page_count(&source), 1);
}

#[tokio::test]
#[serial]
async fn test_timeout_kills_engine_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("doc.pdf");
    let original = minimal_pdf();
    std::fs::write(&source, &original).unwrap();

    let areas_before = working_area_dirs();
    let compressor =
        script_compressor(HANGING_ENGINE).with_timeout(Duration::from_millis(100));
    let err = compressor
        .compress(&source, CompressionLevel::Strong)
        .await
        .unwrap_err();

    assert!(matches!(err, SqueezeError::EngineTimeout { .. }));
    assert_eq!(std::fs::read(&source).unwrap(), original);
    assert_eq!(dir_entries(dir.path()), [source.clone()].into());
    assert_eq!(working_area_dirs(), areas_before);
}

#[tokio::test]
#[serial]
async fn test_parallel_operations_on_different_sources() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    std::fs::write(&a, minimal_pdf()).unwrap();
    std::fs::write(&b, minimal_pdf()).unwrap();

    let compressor = script_compressor(PASS_THROUGH_ENGINE);
    let (first, second) = tokio::join!(
        compressor.compress(&a, CompressionLevel::Strong),
        compressor.compress(&b, CompressionLevel::Weak),
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(page_count(&a), 1);
    assert_eq!(page_count(&b), 1);
}
