//! Unit tests for load/render timing.

use crate::helpers::{TestPipelineBuilder, WORDS_CSV};
use lexiscatter::perf::{PassStats, PerfMonitor, OP_LOAD, OP_RENDER, SLOW_RENDER_MS};

#[test]
fn test_empty_stats_are_zero() {
    let stats = PassStats::default();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.average(), 0.0);
    assert_eq!(stats.p95(), 0.0);
    assert_eq!(stats.min_ms(), 0.0);
}

#[test]
fn test_slow_samples_are_still_recorded() {
    let mut monitor = PerfMonitor::default();
    monitor.record(OP_RENDER, SLOW_RENDER_MS * 3.0, SLOW_RENDER_MS);
    monitor.record(OP_RENDER, 1.0, SLOW_RENDER_MS);

    let stats = monitor.stats(OP_RENDER).unwrap();
    assert_eq!(stats.count(), 2);
    assert_eq!(stats.max_ms(), 300.0);
    assert_eq!(stats.min_ms(), 1.0);
    monitor.log_summary();
}

#[test]
fn test_percentile_uses_nearest_rank() {
    let mut stats = PassStats::default();
    for ms in [5.0, 1.0, 4.0, 2.0, 3.0] {
        stats.record(ms);
    }
    assert_eq!(stats.p95(), 5.0);
    assert_eq!(stats.average(), 3.0);
}

#[cfg(feature = "profiling")]
#[test]
fn test_scoped_timer_reports_name_and_time() {
    use lexiscatter::perf::{measure, ScopedTimer};

    let timer = ScopedTimer::start("group");
    let (_, ms) = measure(|| std::hint::black_box((0..1000).sum::<u64>()));
    assert_eq!(timer.name(), "group");
    assert!(timer.elapsed_ms() >= ms);
}

#[test]
fn test_pipeline_records_each_pass() {
    let mut pipeline = TestPipelineBuilder::new().with_csv(WORDS_CSV).build();
    pipeline.load().unwrap();
    pipeline.run_until_idle();

    let perf = pipeline.perf();
    assert_eq!(perf.stats(OP_LOAD).map(|s| s.count()), Some(1));
    assert_eq!(perf.stats(OP_RENDER).map(|s| s.count()), Some(1));
}

#[test]
fn test_failed_load_is_timed_too() {
    let mut pipeline = TestPipelineBuilder::new().with_status(404).build();
    assert!(pipeline.load().is_err());
    assert_eq!(pipeline.perf().stats(OP_LOAD).map(|s| s.count()), Some(1));
    assert!(pipeline.perf().stats(OP_RENDER).is_none());
}
