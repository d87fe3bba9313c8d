//! Failure presentation: network and parse errors, a container that never
//! becomes ready, and a canvas that disappears before the first render.

use crate::helpers::{ms, MemoryFetcher, TestPipelineBuilder, WORDS_CSV};
use lexiscatter::data::{FetchResponse, LoadError};
use lexiscatter::error::ExplorerError;
use lexiscatter::error_presenter::FAILURE_LABEL;
use lexiscatter::PipelineState;

#[test]
fn test_not_found_is_presented_with_path() {
    let mut pipeline = TestPipelineBuilder::new().with_status(404).build();

    let err = pipeline.load().unwrap_err();
    assert_eq!(err, ExplorerError::Load(LoadError::network(404)));
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(pipeline.chart().is_none());
    assert_eq!(pipeline.pending_timers(), 0);

    let markup = pipeline.page().container_markup().unwrap();
    assert!(markup.contains(FAILURE_LABEL));
    assert!(markup.contains("HTTP error! status: 404"));
    assert!(markup.contains("Expected path: language_analysis_masterframe25OCT.csv"));
    assert!(pipeline.page().canvas().is_none());
}

#[test]
fn test_server_error_status_is_named() {
    let mut pipeline = TestPipelineBuilder::new().with_status(503).build();
    pipeline.load().unwrap_err();

    let markup = pipeline.page().container_markup().unwrap();
    assert!(markup.contains("HTTP error! status: 503"));
    assert_eq!(pipeline.last_error().and_then(|e| match e {
        ExplorerError::Load(load) => load.status(),
        _ => None,
    }), Some(503));
}

#[test]
fn test_parse_failure_is_presented() {
    let mut pipeline = TestPipelineBuilder::new().with_csv("").build();

    let err = pipeline.load().unwrap_err();
    assert!(matches!(err, ExplorerError::Load(LoadError::Parse { .. })));
    let markup = pipeline.page().container_markup().unwrap();
    assert!(markup.contains("Parse error: Empty file"));
    assert!(markup.contains(FAILURE_LABEL));
}

#[test]
fn test_container_never_ready_gives_up_after_fifty_checks() {
    let mut pipeline = TestPipelineBuilder::new()
        .with_csv(WORDS_CSV)
        .with_viewport(800.0, 0.0)
        .build();
    pipeline.load().unwrap();

    pipeline.advance(ms(4899));
    assert_eq!(pipeline.state(), PipelineState::AwaitingContainer);
    pipeline.advance(ms(1));

    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert_eq!(
        pipeline.last_error(),
        Some(&ExplorerError::ContainerNotReady { attempts: 50 })
    );
    assert_eq!(pipeline.pending_timers(), 0);
    assert_eq!(pipeline.render_count(), 0);

    let markup = pipeline.page().container_markup().unwrap();
    assert!(markup.contains("Chart container not ready after 50 attempts"));
}

#[test]
fn test_poll_limit_follows_settings() {
    let mut pipeline = TestPipelineBuilder::new()
        .with_csv(WORDS_CSV)
        .with_viewport(800.0, 0.0)
        .with_settings(|s| s.timing.max_container_polls = 3)
        .build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.now(), ms(200));
    assert_eq!(
        pipeline.last_error(),
        Some(&ExplorerError::ContainerNotReady { attempts: 3 })
    );
}

#[test]
fn test_missing_container_fails_without_markup() {
    let mut pipeline = TestPipelineBuilder::new()
        .with_csv(WORDS_CSV)
        .without_container()
        .build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(matches!(
        pipeline.last_error(),
        Some(ExplorerError::ContainerNotReady { .. })
    ));
    assert!(pipeline.page().container_markup().is_none());
}

#[test]
fn test_canvas_removed_before_render() {
    let mut pipeline = TestPipelineBuilder::new().with_csv(WORDS_CSV).build();
    pipeline.load().unwrap();
    pipeline.page_mut().remove_canvas();
    pipeline.run_until_idle();

    assert_eq!(
        pipeline.last_error(),
        Some(&ExplorerError::render_target_missing("datasetChart"))
    );
    assert!(pipeline.chart().is_none());
    let markup = pipeline.page().container_markup().unwrap();
    assert!(markup.contains("Render target missing: #datasetChart"));
}

#[test]
fn test_plain_load_after_failure_finds_no_canvas() {
    let path = lexiscatter::ExplorerSettings::default().resource_path;
    let fetcher = MemoryFetcher::new().with_status(&path, 404);
    let mut pipeline = TestPipelineBuilder::new().with_fetcher(fetcher.clone()).build();
    pipeline.load().unwrap_err();

    // the diagnostic took the canvas's place, so a good reload has nowhere to draw
    fetcher.set(&path, FetchResponse::ok(WORDS_CSV));
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(pipeline.chart().is_none());
    assert!(pipeline
        .page()
        .container_markup()
        .unwrap()
        .contains("Render target missing: #datasetChart"));
}

#[test]
fn test_reload_recovers_after_transient_failure() {
    let path = lexiscatter::ExplorerSettings::default().resource_path;
    let fetcher = MemoryFetcher::new().with(&path, WORDS_CSV);
    let mut pipeline = TestPipelineBuilder::new().with_fetcher(fetcher.clone()).build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();
    assert_eq!(pipeline.state(), PipelineState::Ready);

    // file briefly missing while an editor rewrites it
    fetcher.set(&path, FetchResponse::status(404));
    pipeline.reload().unwrap_err();
    assert!(pipeline.page().canvas().is_none());

    fetcher.set(&path, FetchResponse::ok(WORDS_CSV));
    pipeline.reload().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert!(pipeline.last_error().is_none());
    assert_eq!(pipeline.render_count(), 2);
    assert!(pipeline.page().container_markup().is_none());
    let canvas = pipeline.page().canvas().unwrap();
    assert_eq!((canvas.width, canvas.height), (740, 440));
    assert!(canvas.drawing.as_deref().unwrap().starts_with("<svg"));
}

#[test]
fn test_reload_after_parse_failure_recovers() {
    let path = lexiscatter::ExplorerSettings::default().resource_path;
    let fetcher = MemoryFetcher::new().with(&path, "");
    let mut pipeline = TestPipelineBuilder::new().with_fetcher(fetcher.clone()).build();
    pipeline.reload().unwrap_err();
    assert!(pipeline
        .page()
        .container_markup()
        .unwrap()
        .contains("Parse error: Empty file"));

    fetcher.set(&path, FetchResponse::ok(WORDS_CSV));
    pipeline.reload().unwrap();
    pipeline.run_until_idle();
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert_eq!(pipeline.dataset().len(), 5);
}
