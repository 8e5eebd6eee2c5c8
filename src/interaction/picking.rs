use crate::animation::{AnimatedTree, TreeStore};
use crate::math::Vec2;

/// Grabbable region around a tree's trunk.
///
/// Spans from the anchor up to `growth * height_per_growth` pixels above it,
/// widened horizontally by `tolerance` on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrunkHitbox {
    pub anchor: Vec2,
    pub height: f64,
    pub tolerance: f64,
}

impl TrunkHitbox {
    pub fn for_tree(tree: &AnimatedTree, height_per_growth: f64, tolerance: f64) -> Self {
        Self {
            anchor: tree.anchor(),
            height: tree.current_growth.max(0.0) * height_per_growth,
            tolerance,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let top = self.anchor.y - self.height;
        (point.x - self.anchor.x).abs() < self.tolerance && point.y >= top && point.y <= self.anchor.y
    }
}

/// Hit-tests pointer positions against the live, animated trunks
#[derive(Debug, Clone, Copy)]
pub struct TrunkPicker {
    pub height_per_growth: f64,
}

impl TrunkPicker {
    pub fn new(height_per_growth: f64) -> Self {
        Self { height_per_growth }
    }

    /// Topmost tree whose trunk is under `point`.
    ///
    /// Walks the store newest-first so the most recently planted tree wins.
    pub fn pick<'a>(&self, store: &'a TreeStore, point: Vec2, tolerance: f64) -> Option<&'a AnimatedTree> {
        store
            .iter()
            .rev()
            .find(|tree| TrunkHitbox::for_tree(tree, self.height_per_growth, tolerance).contains(point))
    }
}
