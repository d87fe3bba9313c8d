//! Chart renderer
//!
//! Owns the single live [`ChartInstance`]. Every render destroys the previous
//! instance and builds a new one from scratch; instances are never patched.

use crate::chart::config::{tooltip_lines, tooltip_title, ChartSpec};
use crate::chart::layout::ChartLayout;
use crate::chart::svg;
use crate::error::{ExplorerError, ExplorerResult};
use crate::host::HostPage;
use crate::settings::ExplorerSettings;
use crate::spatial_index::{PointIndex, PointRef};
use crate::types::{Point, Series};
use tracing::{debug, warn};

/// Tooltip content for a hovered point
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub target: PointRef,
    pub title: String,
    pub lines: Vec<String>,
}

/// A chart bound to the canvas
pub struct ChartInstance {
    id: u64,
    spec: ChartSpec,
    width: u32,
    height: u32,
    layout: ChartLayout,
    index: PointIndex,
}

impl ChartInstance {
    fn build(id: u64, spec: ChartSpec, width: u32, height: u32) -> Self {
        let layout = ChartLayout::compute(&spec, width as f32, height as f32);
        let positions = spec.datasets().iter().enumerate().flat_map(|(d, dataset)| {
            let layout = &layout;
            dataset
                .data
                .iter()
                .enumerate()
                .map(move |(i, p)| (PointRef { dataset: d, index: i }, layout.project(p.x, p.y)))
        });
        let index = PointIndex::from_positions(positions.collect::<Vec<_>>());
        Self {
            id,
            spec,
            width,
            height,
            layout,
            index,
        }
    }

    /// Sequence number; a new render always yields a larger one.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn point(&self, target: PointRef) -> Option<&Point> {
        self.spec.datasets().get(target.dataset)?.data.get(target.index)
    }

    /// Points drawn under a pixel position, hover radius included.
    pub fn hit_test(&self, x: f32, y: f32) -> Vec<PointRef> {
        let mut hits = Vec::new();
        for target in self.index.within(x, y, self.max_hover_radius()) {
            let radius = self
                .spec
                .datasets()
                .get(target.dataset)
                .map_or(0.0, |d| d.point_hover_radius);
            let Some(point) = self.point(target) else {
                continue;
            };
            let (px, py) = self.layout.project(point.x, point.y);
            if (px - x).powi(2) + (py - y).powi(2) <= radius * radius {
                hits.push(target);
            }
        }
        hits.sort_by_key(|t| (t.dataset, t.index));
        hits
    }

    /// Tooltip for the point nearest a pixel position.
    ///
    /// Interaction does not require intersecting the point, so any position
    /// over a non-empty chart yields a tooltip.
    pub fn tooltip_at(&self, x: f32, y: f32) -> Option<Tooltip> {
        let (target, _) = self.index.nearest(x, y)?;
        let point = self.point(target)?;
        Some(Tooltip {
            target,
            title: tooltip_title(point),
            lines: tooltip_lines(point),
        })
    }

    pub fn to_svg(&self) -> String {
        svg::draw(&self.spec, &self.layout)
    }

    fn max_hover_radius(&self) -> f32 {
        self.spec
            .datasets()
            .iter()
            .map(|d| d.point_hover_radius)
            .fold(0.0, f32::max)
    }
}

/// Builds chart instances onto a host page
pub struct ChartRenderer {
    container_id: String,
    canvas_id: String,
    padding: f32,
    x_axis_title: String,
    y_axis_title: String,
    instance: Option<ChartInstance>,
    created: u64,
    destroyed: u64,
}

impl ChartRenderer {
    pub fn new(settings: &ExplorerSettings) -> Self {
        Self {
            container_id: settings.container_id.clone(),
            canvas_id: settings.canvas_id.clone(),
            padding: settings.container_padding,
            x_axis_title: settings.x_axis_title.clone(),
            y_axis_title: settings.y_axis_title.clone(),
            instance: None,
            created: 0,
            destroyed: 0,
        }
    }

    /// Replace the chart with one built from `series`.
    ///
    /// Fails without touching the current instance when the container or the
    /// canvas is absent.
    pub fn render<P: HostPage + ?Sized>(
        &mut self,
        page: &mut P,
        series: &[Series],
    ) -> ExplorerResult<&ChartInstance> {
        let Some(container) = page.element_rect(&self.container_id) else {
            warn!(element = %self.container_id, "Chart container missing");
            return Err(ExplorerError::render_target_missing(&self.container_id));
        };
        if page.element_rect(&self.canvas_id).is_none() {
            warn!(element = %self.canvas_id, "Chart canvas missing");
            return Err(ExplorerError::render_target_missing(&self.canvas_id));
        }

        self.destroy();

        let width = (container.width - self.padding).max(0.0).floor() as u32;
        let height = (container.height - self.padding).max(0.0).floor() as u32;
        page.set_canvas_size(&self.canvas_id, width, height);

        let spec = ChartSpec::scatter(series, &self.x_axis_title, &self.y_axis_title);
        self.created += 1;
        let instance = ChartInstance::build(self.created, spec, width, height);
        page.paint_canvas(&self.canvas_id, &instance.to_svg());

        debug!(
            chart = instance.id,
            width,
            height,
            datasets = instance.spec.datasets().len(),
            points = instance.spec.point_count(),
            "Chart created"
        );
        Ok(self.instance.insert(instance))
    }

    /// Destroy the live instance, if any.
    pub fn destroy(&mut self) -> bool {
        match self.instance.take() {
            Some(old) => {
                self.destroyed += 1;
                debug!(chart = old.id, "Chart destroyed");
                true
            }
            None => false,
        }
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Instances built so far
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Instances destroyed so far
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }
}
