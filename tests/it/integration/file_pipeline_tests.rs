//! End-to-end runs against resources on disk.

use crate::helpers::WORDS_CSV;
use lexiscatter::data::FileFetcher;
use lexiscatter::settings::ExplorerSettings;
use lexiscatter::{ExplorerPipeline, PipelineState, StaticPage};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn pipeline_over(root: &Path, resource_path: &str) -> ExplorerPipeline<FileFetcher, StaticPage> {
    let settings = ExplorerSettings {
        resource_path: resource_path.to_string(),
        ..ExplorerSettings::default()
    };
    let page = StaticPage::new(&settings.container_id, &settings.canvas_id, 800.0, 500.0);
    ExplorerPipeline::new(settings, FileFetcher::new(root), page)
}

#[test]
fn test_renders_dataset_from_disk() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("words.csv"), WORDS_CSV).unwrap();

    let mut pipeline = pipeline_over(dir.path(), "words.csv");
    pipeline.load().unwrap();
    pipeline.run_until_idle();
    assert_eq!(pipeline.state(), PipelineState::Ready);

    let html = pipeline.page().to_html("Lexical Explorer");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Lexical Explorer</title>"));
    assert!(html.contains("id=\"datasetChart\""));
    assert!(html.contains("width: 740px; height: 440px;"));
    assert!(html.contains("<svg"));
    assert!(html.contains(">False Friends</text>"));
    assert!(html.contains("Levenshtein Similarity"));
}

#[test]
fn test_tab_separated_resource_in_subdirectory() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::write(
        dir.path().join("data").join("words.tsv"),
        WORDS_CSV.replace(',', "\t"),
    )
    .unwrap();

    let mut pipeline = pipeline_over(dir.path(), "data/words.tsv");
    let report = pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(report.dataset.len(), 5);
    assert_eq!(pipeline.chart().unwrap().spec().point_count(), 5);
}

#[test]
fn test_missing_file_shows_diagnostic_in_page() {
    let dir = tempdir().unwrap();
    let mut pipeline = pipeline_over(dir.path(), "missing.csv");
    pipeline.load().unwrap_err();

    let html = pipeline.page().to_html("Lexical Explorer");
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("HTTP error! status: 404"));
    assert!(html.contains("Expected path: missing.csv"));
    assert!(!html.contains("<svg"));
}

#[test]
fn test_path_outside_root_is_forbidden() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("site");
    fs::create_dir(&root).unwrap();
    fs::write(dir.path().join("secret.csv"), WORDS_CSV).unwrap();

    let mut pipeline = pipeline_over(&root, "../secret.csv");
    pipeline.load().unwrap_err();

    let html = pipeline.page().to_html("Lexical Explorer");
    assert!(html.contains("HTTP error! status: 403"));
}

#[test]
fn test_changed_file_is_picked_up_on_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.csv");
    fs::write(&path, WORDS_CSV).unwrap();

    let mut pipeline = pipeline_over(dir.path(), "words.csv");
    pipeline.load().unwrap();
    pipeline.run_until_idle();
    assert_eq!(pipeline.dataset().len(), 5);

    let trimmed: String = WORDS_CSV.lines().take(3).map(|l| format!("{l}\n")).collect();
    fs::write(&path, trimmed).unwrap();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.dataset().len(), 2);
    assert_eq!(pipeline.render_count(), 2);
}
