//! Browser-independent garden engine
//!
//! `Garden` ties the tree store, particle systems and gesture controller
//! together behind a small step/frame/input API. Any host loop can drive it:
//! call `step` once per display frame, then paint whatever `frame` returns.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::animation::{ReconcileSummary, TreeStore};
use crate::config::GardenConfig;
use crate::data::Tree;
use crate::growth::BranchGenerator;
use crate::interaction::{Cursor, GestureController, GestureOutcome, InputKind};
use crate::math::Vec2;
use crate::particles::SplashSystem;
use crate::sketch::Frame;

/// Notification for the host
#[derive(Debug, Clone, PartialEq)]
pub enum GardenEvent {
    /// A tree was tapped; carries its current snapshot
    TreeSelected(Tree),
    /// A tree was dragged to a new horizontal position
    TreeMoved { id: String, x: f64 },
}

pub struct Garden {
    config: GardenConfig,
    store: TreeStore,
    splash: SplashSystem,
    gestures: GestureController,
    generator: BranchGenerator,
    width: f64,
    height: f64,
    water_counter: u64,
    events: Vec<GardenEvent>,
    rng: SmallRng,
}

impl Garden {
    pub fn new(config: GardenConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic garden for tests and replays
    pub fn with_seed(config: GardenConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GardenConfig, rng: SmallRng) -> Self {
        Self {
            store: TreeStore::new(),
            splash: SplashSystem::new(),
            gestures: GestureController::new(config.interaction),
            generator: BranchGenerator::new(config.geometry),
            config,
            width: 0.0,
            height: 0.0,
            water_counter: 0,
            events: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    /// Swap tuning knobs; live animation state is kept, any gesture is dropped
    pub fn set_config(&mut self, config: GardenConfig) {
        self.gestures = GestureController::new(config.interaction);
        self.generator = BranchGenerator::new(config.geometry);
        self.config = config;
    }

    /// Replace the tree list; diffed by identity
    pub fn set_trees(&mut self, trees: Vec<Tree>) -> ReconcileSummary {
        self.store.reconcile(&trees, &mut self.rng, &self.config)
    }

    /// Report the host's water counter; each change launches one splash
    pub fn set_water_event(&mut self, counter: u64) {
        if counter == self.water_counter {
            return;
        }
        self.water_counter = counter;

        if counter == 0 {
            return;
        }
        if !self.has_surface() {
            tracing::warn!(counter, "water event ignored on a zero-sized surface");
            return;
        }

        let origin = Vec2::new(self.width / 2.0, self.height);
        self.splash.spawn_burst(origin, &mut self.rng, &self.config.splash);
        tracing::info!(counter, droplets = self.splash.count(), "water burst");
    }

    /// Resize the drawing surface; animation state is untouched
    pub fn resize(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if width == self.width && height == self.height {
            return;
        }

        self.width = width;
        self.height = height;
        if self.has_surface() {
            tracing::info!(width, height, "surface resized");
        } else {
            tracing::warn!(width, height, "surface has no area, pausing");
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn has_surface(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Advance everything by `dt` display frames
    pub fn step(&mut self, dt: f64) {
        if !self.has_surface() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.store.advance(dt, &self.config.motion);
        self.splash.update(dt, &self.config.splash);
    }

    /// Everything to draw this frame, in paint order
    pub fn frame(&self) -> Frame {
        let mut frame = Frame {
            width: self.width,
            height: self.height,
            ..Frame::default()
        };
        if !self.has_surface() {
            return frame;
        }

        frame.trees = self
            .store
            .iter()
            .map(|tree| {
                let sketch = self.generator.generate(&tree.pose());
                let center = tree.canopy_center(&self.config.geometry, &self.config.canopy);
                let glows = tree.canopy.glows(center, tree.current_growth, &self.config.canopy);
                (sketch, glows)
            })
            .collect();
        frame.splash = self.splash.glows();
        frame
    }

    pub fn pointer_down(&mut self, point: Vec2, kind: InputKind) -> bool {
        if !self.has_surface() {
            return false;
        }
        self.gestures.press(point, kind, &self.store)
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.gestures.drag(point, &mut self.store);
    }

    pub fn pointer_up(&mut self, point: Vec2) {
        match self.gestures.release(point, &mut self.store) {
            GestureOutcome::None => {}
            GestureOutcome::Selected { id } => {
                if let Some(tree) = self.store.get(&id) {
                    self.events.push(GardenEvent::TreeSelected(tree.tree.clone()));
                }
            }
            GestureOutcome::Moved { id, x } => {
                self.events.push(GardenEvent::TreeMoved { id, x });
            }
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.gestures.cancel();
    }

    /// Whether a gesture currently holds a tree
    pub fn is_dragging(&self) -> bool {
        self.gestures.captured().is_some()
    }

    pub fn hover(&self, point: Vec2) -> Cursor {
        if !self.has_surface() {
            return Cursor::Default;
        }
        self.gestures.hover(point, &self.store)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Take every pending host notification
    pub fn drain_events(&mut self) -> Vec<GardenEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn trees(&self) -> &TreeStore {
        &self.store
    }

    pub fn splash(&self) -> &SplashSystem {
        &self.splash
    }

    pub fn tree_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(GardenConfig::default())
    }
}
