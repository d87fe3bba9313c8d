//! Explorer pipeline
//!
//! Owner of all mutable explorer state: the cached dataset, the chart
//! renderer, the resize coordinator and every pending timer. The pipeline is a
//! single-threaded state machine driven by explicit calls:
//!
//! - [`ExplorerPipeline::load`] fetches and validates the dataset, then starts
//!   polling for a sized container
//! - [`ExplorerPipeline::signal`] feeds viewport changes to the debouncer
//! - [`ExplorerPipeline::advance`] moves the virtual clock, running due timers
//! - [`ExplorerPipeline::dispose`] cancels everything
//!
//! A newer load supersedes an older one: timers carry the load generation
//! that scheduled them and stale ones are cancelled.

use crate::chart::{ChartInstance, ChartRenderer};
use crate::data::{group_by_relationship, DataLoader, LoadReport, ResourceFetcher};
use crate::error::{ExplorerError, ExplorerResult};
use crate::error_presenter::ErrorPresenter;
use crate::host::HostPage;
use crate::perf::{measure, PerfMonitor, OP_LOAD, OP_RENDER, SLOW_LOAD_MS, SLOW_RENDER_MS};
use crate::resize::{ResizeCoordinator, ResizeTask, ViewportSignal};
use crate::settings::ExplorerSettings;
use crate::timers::TimerQueue;
use crate::types::FilteredDataset;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the pipeline is in its load/render sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing loaded yet
    Idle,
    /// Dataset loaded; waiting for the container to get a height
    AwaitingContainer,
    /// Container ready; waiting out the settle delay
    Settling,
    /// A chart is on the page
    Ready,
    /// The last load or render failed and was presented
    Failed,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    PollContainer { generation: u64, attempt: u32 },
    Settle { generation: u64 },
    Resize(ResizeTask),
}

impl From<ResizeTask> for Task {
    fn from(task: ResizeTask) -> Self {
        Task::Resize(task)
    }
}

impl Task {
    fn is_load_step(&self) -> bool {
        matches!(self, Task::PollContainer { .. } | Task::Settle { .. })
    }
}

pub struct ExplorerPipeline<F, P> {
    settings: ExplorerSettings,
    loader: DataLoader<F>,
    page: P,
    renderer: ChartRenderer,
    presenter: ErrorPresenter,
    resize: ResizeCoordinator,
    timers: TimerQueue<Task>,
    dataset: FilteredDataset,
    generation: u64,
    state: PipelineState,
    last_error: Option<ExplorerError>,
    renders: u64,
    perf: PerfMonitor,
}

impl<F: ResourceFetcher, P: HostPage> ExplorerPipeline<F, P> {
    pub fn new(settings: ExplorerSettings, fetcher: F, page: P) -> Self {
        Self {
            loader: DataLoader::new(fetcher, settings.columns.clone()),
            renderer: ChartRenderer::new(&settings),
            presenter: ErrorPresenter::from_settings(&settings),
            resize: ResizeCoordinator::from_timing(&settings.timing),
            timers: TimerQueue::new(),
            dataset: FilteredDataset::default(),
            generation: 0,
            state: PipelineState::Idle,
            last_error: None,
            renders: 0,
            perf: PerfMonitor::new(),
            settings,
            page,
        }
    }

    /// Load the dataset and start the render sequence.
    ///
    /// The chart appears once the container is ready and the settle delay has
    /// elapsed on the pipeline clock. Load failures are presented in the
    /// container before being returned.
    pub fn load(&mut self) -> ExplorerResult<LoadReport> {
        if self.state == PipelineState::Disposed {
            return Err(ExplorerError::Disposed);
        }

        self.generation += 1;
        let cancelled = self.timers.cancel_where(Task::is_load_step);
        if cancelled > 0 {
            debug!(cancelled, generation = self.generation, "Superseded pending load steps");
        }

        let path = self.settings.resource_path.clone();
        let (result, elapsed_ms) = measure(|| self.loader.load(&path));
        self.perf.record(OP_LOAD, elapsed_ms, SLOW_LOAD_MS);

        match result {
            Ok(report) => {
                self.dataset = report.dataset.clone();
                self.state = PipelineState::AwaitingContainer;
                self.last_error = None;
                self.check_container(self.generation, 1);
                Ok(report)
            }
            Err(err) => {
                let err = ExplorerError::from(err);
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Load again into a page that outlives individual loads.
    ///
    /// A presented failure replaces the canvas, so a plain [`load`](Self::load)
    /// after one reports the missing canvas, as a single document would.
    /// This puts the canvas back first, letting a good reload recover.
    pub fn reload(&mut self) -> ExplorerResult<LoadReport> {
        if self.state == PipelineState::Disposed {
            return Err(ExplorerError::Disposed);
        }
        if self
            .page
            .restore_canvas(&self.settings.container_id, &self.settings.canvas_id)
        {
            debug!("Canvas restored for reload");
        }
        self.load()
    }

    /// Feed a viewport change.
    pub fn signal(&mut self, signal: ViewportSignal) -> ExplorerResult<()> {
        if self.state == PipelineState::Disposed {
            return Err(ExplorerError::Disposed);
        }
        self.resize.signal(signal, &mut self.timers);
        Ok(())
    }

    /// Run timers due within `delta` of the current time.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let target = self.timers.now() + delta;
        self.advance_to(target)
    }

    /// Run timers due at or before `target`, leaving the clock there.
    ///
    /// Returns the number of timers fired.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some((_, task)) = self.timers.pop_due(target) {
            fired += 1;
            self.run_task(task);
        }
        self.timers.set_now(target);
        fired
    }

    /// Run every pending timer, including ones scheduled along the way.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.timers.next_deadline() {
            fired += self.advance_to(deadline);
        }
        fired
    }

    /// Cancel all timers, destroy the chart and drop the dataset.
    ///
    /// Returns false if already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.state == PipelineState::Disposed {
            return false;
        }
        let cancelled = self.timers.clear();
        self.resize.reset();
        self.renderer.destroy();
        self.dataset = FilteredDataset::default();
        self.state = PipelineState::Disposed;
        debug!(cancelled, "Explorer disposed");
        true
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::PollContainer { generation, attempt } => {
                if generation == self.generation {
                    self.check_container(generation, attempt);
                }
            }
            Task::Settle { generation } => {
                if generation == self.generation {
                    self.render();
                }
            }
            Task::Resize(task) => {
                if self.resize.on_fired(task, &mut self.timers) {
                    self.on_resize();
                }
            }
        }
    }

    fn check_container(&mut self, generation: u64, attempt: u32) {
        let ready = self
            .page
            .element_rect(&self.settings.container_id)
            .is_some_and(|rect| rect.height > 0.0);

        if ready {
            debug!(attempt, "Chart container ready");
            self.state = PipelineState::Settling;
            self.timers
                .schedule(self.settings.timing.settle_delay(), Task::Settle { generation });
        } else if attempt >= self.settings.timing.max_container_polls {
            self.fail(ExplorerError::ContainerNotReady { attempts: attempt });
        } else {
            debug!(attempt, "Chart container not ready");
            self.timers.schedule(
                self.settings.timing.poll_interval(),
                Task::PollContainer {
                    generation,
                    attempt: attempt + 1,
                },
            );
        }
    }

    fn on_resize(&mut self) {
        if !self.renderer.has_instance() || self.dataset.is_empty() {
            debug!("Resize ignored: no chart or no data");
            return;
        }
        debug!("Resize re-render");
        self.render();
    }

    fn render(&mut self) {
        let series = group_by_relationship(&self.dataset);
        let (result, elapsed_ms) = measure(|| self.renderer.render(&mut self.page, &series).map(|c| c.id()));
        self.perf.record(OP_RENDER, elapsed_ms, SLOW_RENDER_MS);

        match result {
            Ok(chart) => {
                self.renders += 1;
                // a resize render must not hide a newer load still in progress
                if !self.timers.any(Task::is_load_step) {
                    self.state = PipelineState::Ready;
                }
                self.last_error = None;
                info!(chart, series = series.len(), points = self.dataset.len(), "Chart rendered");
            }
            Err(err) => {
                warn!(error = %err, "Chart render failed");
                self.fail(err);
            }
        }
    }

    fn fail(&mut self, err: ExplorerError) {
        if err.is_presentable() {
            self.presenter.present(&mut self.page, &err);
        }
        self.state = PipelineState::Failed;
        self.last_error = Some(err);
    }
}

impl<F, P> ExplorerPipeline<F, P> {
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn chart(&self) -> Option<&ChartInstance> {
        self.renderer.instance()
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    pub fn dataset(&self) -> &FilteredDataset {
        &self.dataset
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Successful renders so far
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn last_error(&self) -> Option<&ExplorerError> {
        self.last_error.as_ref()
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    /// Current pipeline clock
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
