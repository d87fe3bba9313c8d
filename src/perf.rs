//! Pass timing.
//!
//! The pipeline times every load and render pass with [`measure`] and feeds
//! the result to a [`PerfMonitor`], which keeps a rolling window per pass and
//! warns when a pass runs over its budget.
//!
//! Finer-grained timing of the aggregation, layout and drawing steps is
//! compiled in only with the `profiling` feature:
//!
//! ```ignore
//! use lexiscatter::profile_scope;
//!
//! fn draw() {
//!     profile_scope!("draw_svg");
//!     // traced on scope exit when slower than 1ms
//! }
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;
use tracing::{info, warn};

/// Budget for fetch + parse + validate
pub const SLOW_LOAD_MS: f64 = 500.0;

/// Budget for aggregate + layout + draw
pub const SLOW_RENDER_MS: f64 = 100.0;

pub const OP_LOAD: &str = "load";
pub const OP_RENDER: &str = "render";

/// Samples kept per pass
const WINDOW: usize = 100;

/// Expands to a [`ScopedTimer`] with the `profiling` feature, to nothing otherwise.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _scope = $crate::perf::ScopedTimer::start($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

pub use profile_scope;

/// Rolling timings of one kind of pass.
#[derive(Clone, Debug, Default)]
pub struct PassStats {
    window: VecDeque<f64>,
    total: u64,
    fastest: Option<f64>,
    slowest: f64,
}

impl PassStats {
    pub fn record(&mut self, ms: f64) {
        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(ms);
        self.total += 1;
        self.fastest = Some(self.fastest.map_or(ms, |f| f.min(ms)));
        self.slowest = self.slowest.max(ms);
    }

    /// Mean of the samples in the window
    pub fn average(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    /// Nearest-rank 95th percentile of the window
    pub fn p95(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        let mut samples: Vec<f64> = self.window.iter().copied().collect();
        let rank = (samples.len() * 95).div_ceil(100).max(1) - 1;
        let (_, value, _) = samples.select_nth_unstable_by(rank, f64::total_cmp);
        *value
    }

    /// Passes recorded, including those that left the window
    pub fn count(&self) -> u64 {
        self.total
    }

    pub fn min_ms(&self) -> f64 {
        self.fastest.unwrap_or(0.0)
    }

    pub fn max_ms(&self) -> f64 {
        self.slowest
    }
}

/// Per-pass statistics, keyed by pass name.
#[derive(Debug, Default)]
pub struct PerfMonitor {
    passes: BTreeMap<&'static str, PassStats>,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pass; warns when it took longer than `budget_ms`.
    pub fn record(&mut self, pass: &'static str, elapsed_ms: f64, budget_ms: f64) {
        self.passes.entry(pass).or_default().record(elapsed_ms);
        if elapsed_ms > budget_ms {
            warn!(pass, elapsed_ms = format!("{elapsed_ms:.2}"), budget_ms, "Slow pass");
        }
    }

    pub fn stats(&self, pass: &str) -> Option<&PassStats> {
        self.passes.get(pass)
    }

    pub fn passes(&self) -> impl Iterator<Item = (&'static str, &PassStats)> {
        self.passes.iter().map(|(name, stats)| (*name, stats))
    }

    /// Log one line per pass.
    pub fn log_summary(&self) {
        for (pass, stats) in &self.passes {
            info!(
                pass,
                count = stats.count(),
                avg_ms = format!("{:.2}", stats.average()),
                p95_ms = format!("{:.2}", stats.p95()),
                max_ms = format!("{:.2}", stats.max_ms()),
                "Pass timings"
            );
        }
    }

    pub fn reset(&mut self) {
        self.passes.clear();
    }
}

#[cfg(feature = "profiling")]
thread_local! {
    static DEPTH: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Traces the time spent in a scope, indented by nesting depth.
#[cfg(feature = "profiling")]
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    depth: usize,
}

#[cfg(feature = "profiling")]
impl ScopedTimer {
    /// Scopes faster than this are not traced
    const TRACE_ABOVE_MS: f64 = 1.0;

    pub fn start(name: &'static str) -> Self {
        let depth = DEPTH.with(|d| d.replace(d.get() + 1));
        Self {
            name,
            start: Instant::now(),
            depth,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(feature = "profiling")]
impl Drop for ScopedTimer {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(self.depth));
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > Self::TRACE_ABOVE_MS {
            tracing::trace!("{}[PERF] {}: {:.2}ms", "  ".repeat(self.depth), self.name, elapsed_ms);
        }
    }
}

/// Run `f`, returning its result and the wall time it took in milliseconds.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64() * 1000.0)
}
