//! Spatial Index Module
//!
//! R-tree over the pixel positions of plotted points, used for tooltip hit
//! testing. Nearest-point lookup is O(log n) instead of a scan over every
//! point in every dataset.

use rstar::primitives::GeomWithData;
use rstar::RTree;

/// Address of a point inside a chart configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    pub dataset: usize,
    pub index: usize,
}

type IndexedPoint = GeomWithData<[f32; 2], PointRef>;

/// Spatial index of projected chart points.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from `(ref, (x, y))` pixel positions.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (PointRef, (f32, f32))>,
    {
        let entries: Vec<IndexedPoint> = positions
            .into_iter()
            .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
            .map(|(r, (x, y))| GeomWithData::new([x, y], r))
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Closest point to a pixel position, with its distance.
    pub fn nearest(&self, x: f32, y: f32) -> Option<(PointRef, f32)> {
        self.tree.nearest_neighbor(&[x, y]).map(|entry| {
            let [px, py] = *entry.geom();
            (entry.data, ((px - x).powi(2) + (py - y).powi(2)).sqrt())
        })
    }

    /// All points within `radius` pixels of a position.
    pub fn within(&self, x: f32, y: f32, radius: f32) -> Vec<PointRef> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|entry| entry.data)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for PointIndex {
    fn default() -> Self {
        Self::new()
    }
}
