//! Load and render workflows through the pipeline.

use crate::helpers::{ms, rendered_pipeline, MemoryFetcher, TestPipelineBuilder, HEADER, WORDS_CSV};
use lexiscatter::data::FetchResponse;
use lexiscatter::host::HostPage;
use lexiscatter::PipelineState;

#[test]
fn test_load_then_render() {
    let pipeline = rendered_pipeline();

    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert_eq!(pipeline.render_count(), 1);
    assert_eq!(pipeline.dataset().len(), 5);
    assert!(pipeline.last_error().is_none());

    let chart = pipeline.chart().unwrap();
    assert_eq!(chart.spec().datasets().len(), 3);
    assert_eq!(chart.spec().point_count(), 5);

    let canvas = pipeline.page().canvas().unwrap();
    assert!(canvas.drawing.as_deref().unwrap().starts_with("<svg"));
}

#[test]
fn test_load_reports_counts() {
    let mut pipeline = TestPipelineBuilder::new().with_csv(WORDS_CSV).build();
    let report = pipeline.load().unwrap();
    assert_eq!((report.parsed, report.rejected), (7, 2));
    assert_eq!(report.dataset.len(), 5);
}

#[test]
fn test_chart_waits_for_settle_delay() {
    let mut pipeline = TestPipelineBuilder::new().with_csv(WORDS_CSV).build();
    pipeline.load().unwrap();

    assert_eq!(pipeline.state(), PipelineState::Settling);
    assert_eq!(pipeline.next_deadline(), Some(ms(50)));

    assert_eq!(pipeline.advance(ms(49)), 0);
    assert!(pipeline.chart().is_none());
    assert_eq!(pipeline.advance(ms(1)), 1);
    assert!(pipeline.chart().is_some());
    assert_eq!(pipeline.pending_timers(), 0);
}

#[test]
fn test_container_sized_late_is_picked_up_by_polling() {
    let mut pipeline = TestPipelineBuilder::new()
        .with_csv(WORDS_CSV)
        .with_viewport(800.0, 0.0)
        .build();
    pipeline.load().unwrap();
    assert_eq!(pipeline.state(), PipelineState::AwaitingContainer);

    pipeline.advance(ms(1000));
    assert_eq!(pipeline.state(), PipelineState::AwaitingContainer);

    pipeline.page_mut().resize_container(800.0, 500.0);
    // next poll at 1100ms, settle 50ms later
    pipeline.advance(ms(100));
    assert_eq!(pipeline.state(), PipelineState::Settling);
    pipeline.advance(ms(50));
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert_eq!(pipeline.now(), ms(1150));
}

#[test]
fn test_reload_replaces_chart() {
    let mut pipeline = rendered_pipeline();
    let first = pipeline.chart().unwrap().id();

    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.render_count(), 2);
    assert_ne!(pipeline.chart().unwrap().id(), first);
    assert_eq!(pipeline.renderer().created(), 2);
    assert_eq!(pipeline.renderer().destroyed(), 1);
}

#[test]
fn test_newer_load_wins() {
    let settings_path = lexiscatter::ExplorerSettings::default().resource_path;
    let fetcher = MemoryFetcher::new().with(&settings_path, WORDS_CSV);
    let mut pipeline = TestPipelineBuilder::new().with_fetcher(fetcher.clone()).build();

    pipeline.load().unwrap();
    pipeline.advance(ms(20));
    let newer = format!("{HEADER}\nhello,hola,cognates,greeting,0.4,1.0\n");
    fetcher.set(&settings_path, FetchResponse::ok(newer));
    pipeline.load().unwrap();

    // only the newer load's settle timer is left
    assert_eq!(pipeline.pending_timers(), 1);
    pipeline.run_until_idle();

    assert_eq!(pipeline.render_count(), 1);
    assert_eq!(pipeline.dataset().len(), 1);
    assert_eq!(pipeline.chart().unwrap().spec().point_count(), 1);
    assert_eq!(fetcher.fetches().len(), 2);
}

#[test]
fn test_header_only_renders_empty_chart() {
    let mut pipeline = TestPipelineBuilder::new().with_csv(HEADER).build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.state(), PipelineState::Ready);
    let chart = pipeline.chart().unwrap();
    assert!(chart.spec().datasets().is_empty());
    assert_eq!(chart.spec().point_count(), 0);
}

#[test]
fn test_canvas_fills_padded_container() {
    let mut pipeline = TestPipelineBuilder::new()
        .with_csv(WORDS_CSV)
        .with_viewport(1024.5, 600.0)
        .build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    assert_eq!(pipeline.chart().unwrap().size(), (964, 540));
    let rect = pipeline.page().element_rect("datasetChart").unwrap();
    assert_eq!((rect.width, rect.height), (964.0, 540.0));
}

#[test]
fn test_hover_tooltip_after_render() {
    let pipeline = rendered_pipeline();
    let chart = pipeline.chart().unwrap();

    let hotel = &chart.spec().datasets()[0].data[0];
    let (x, y) = chart.layout().project(hotel.x, hotel.y);
    let tip = chart.tooltip_at(x, y).unwrap();

    assert_eq!(
        tip.lines,
        vec![
            "English: hotel",
            "Spanish: hotel",
            "Similarity: 1.00",
            "Complexity: 2.10",
            "Domain: travel",
        ]
    );
    assert!(tip.title.is_empty());
    assert!(!chart.hit_test(x, y).is_empty());
}
