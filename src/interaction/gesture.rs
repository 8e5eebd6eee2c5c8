//! Press / drag / release gesture state machine.
//!
//! Decoupled from any DOM event API: the host feeds surface-space points and
//! says whether they came from a precise pointer or a finger. On release the
//! controller decides between a tap (select) and a drag (move). A drag moves
//! the captured tree's live x immediately, so the next frame draws it in its
//! new spot before the host has heard anything.

use super::picking::TrunkPicker;
use crate::animation::TreeStore;
use crate::config::InteractionConfig;
use crate::math::Vec2;

/// Where a gesture came from; touch gets looser tolerances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Pointer,
    Touch,
}

/// Hover affordance for the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// Active gesture, if any
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    /// Waiting for the next press.
    #[default]
    Idle,
    /// A tree was captured and the pointer has not yet left the tap threshold.
    Pressed {
        /// Identity of the captured tree.
        id: String,
        /// Pointer position at press time.
        start: Vec2,
        /// Tree x at press time; drags offset from here.
        origin_x: f64,
        kind: InputKind,
    },
    /// The pointer has travelled past the drag threshold at least once.
    Dragging {
        id: String,
        start: Vec2,
        origin_x: f64,
        kind: InputKind,
    },
}

/// Result of a completed gesture
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing was captured at press time.
    None,
    /// Short press: the tree was tapped.
    Selected { id: String },
    /// Long enough travel: the tree now lives at `x`.
    Moved { id: String, x: f64 },
}

pub struct GestureController {
    state: GestureState,
    config: InteractionConfig,
    picker: TrunkPicker,
}

impl GestureController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: GestureState::Idle,
            picker: TrunkPicker::new(config.hit_height_per_growth),
            config,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Id of the tree held by the current gesture
    pub fn captured(&self) -> Option<&str> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Pressed { id, .. } | GestureState::Dragging { id, .. } => Some(id),
        }
    }

    fn tolerance(&self, kind: InputKind) -> f64 {
        match kind {
            InputKind::Pointer => self.config.pointer_tolerance,
            InputKind::Touch => self.config.touch_tolerance,
        }
    }

    fn threshold(&self, kind: InputKind) -> f64 {
        match kind {
            InputKind::Pointer => self.config.pointer_drag_threshold,
            InputKind::Touch => self.config.touch_drag_threshold,
        }
    }

    /// Start a gesture; returns whether a tree was captured.
    ///
    /// A press during an active gesture (e.g. a second finger) is ignored.
    pub fn press(&mut self, point: Vec2, kind: InputKind, store: &TreeStore) -> bool {
        if !self.is_idle() {
            return false;
        }

        match self.picker.pick(store, point, self.tolerance(kind)) {
            Some(tree) => {
                tracing::trace!(id = %tree.id(), ?kind, "gesture pressed");
                self.state = GestureState::Pressed {
                    id: tree.id().to_string(),
                    start: point,
                    origin_x: tree.tree.x,
                    kind,
                };
                true
            }
            None => false,
        }
    }

    /// Follow the pointer; moves the captured tree horizontally in place
    pub fn drag(&mut self, point: Vec2, store: &mut TreeStore) {
        let (id, start, origin_x, kind) = match &self.state {
            GestureState::Idle => return,
            GestureState::Pressed { id, start, origin_x, kind }
            | GestureState::Dragging { id, start, origin_x, kind } => (id.clone(), *start, *origin_x, *kind),
        };

        if let Some(tree) = store.get_mut(&id) {
            tree.set_x(origin_x + (point.x - start.x));
        }

        if matches!(self.state, GestureState::Pressed { .. }) && point.distance(&start) > self.threshold(kind) {
            tracing::trace!(id = %id, "gesture became a drag");
            self.state = GestureState::Dragging { id, start, origin_x, kind };
        }
    }

    /// Finish the gesture and classify it by total displacement.
    ///
    /// A tap puts the tree back where it was pressed, since the host never
    /// hears about sub-threshold movement.
    pub fn release(&mut self, point: Vec2, store: &mut TreeStore) -> GestureOutcome {
        let state = std::mem::take(&mut self.state);
        let (id, start, origin_x, kind) = match state {
            GestureState::Idle => return GestureOutcome::None,
            GestureState::Pressed { id, start, origin_x, kind }
            | GestureState::Dragging { id, start, origin_x, kind } => (id, start, origin_x, kind),
        };

        // The tree may have been cleared out from under the gesture
        let Some(tree) = store.get_mut(&id) else {
            tracing::debug!(id = %id, "captured tree vanished before release");
            return GestureOutcome::None;
        };

        if point.distance(&start) > self.threshold(kind) {
            GestureOutcome::Moved { id, x: tree.tree.x }
        } else {
            tree.set_x(origin_x);
            GestureOutcome::Selected { id }
        }
    }

    /// Abandon the gesture without reporting anything
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Cursor to show at `point`; side-effect free
    pub fn hover(&self, point: Vec2, store: &TreeStore) -> Cursor {
        if !self.is_idle() {
            return Cursor::Grabbing;
        }
        match self.picker.pick(store, point, self.config.pointer_tolerance) {
            Some(_) => Cursor::Grab,
            None => Cursor::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GardenConfig;
    use crate::data::Tree;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn garden() -> (GestureController, TreeStore) {
        let config = GardenConfig::default();
        let mut store = TreeStore::new();
        let mut rng = SmallRng::seed_from_u64(2);
        store.reconcile(
            &[Tree::new("a", 100.0, 500.0).with_growth(2.0, 5.0)],
            &mut rng,
            &config,
        );
        store.advance(1e6, &config.motion);
        (GestureController::new(config.interaction), store)
    }

    fn gesture(ctrl: &mut GestureController, store: &mut TreeStore, kind: InputKind, dx: f64) -> GestureOutcome {
        let start = Vec2::new(100.0, 480.0);
        assert!(ctrl.press(start, kind, store));
        let end = Vec2::new(start.x + dx, start.y);
        ctrl.drag(Vec2::new(start.x + dx / 2.0, start.y), store);
        ctrl.drag(end, store);
        ctrl.release(end, store)
    }

    #[test]
    fn test_small_pointer_move_is_tap() {
        let (mut ctrl, mut store) = garden();
        let outcome = gesture(&mut ctrl, &mut store, InputKind::Pointer, 3.0);
        assert_eq!(outcome, GestureOutcome::Selected { id: "a".to_string() });
        assert!(ctrl.is_idle());
        assert_eq!(store.get("a").unwrap().tree.x, 100.0);
    }

    #[test]
    fn test_longer_pointer_move_is_drag() {
        let (mut ctrl, mut store) = garden();
        let outcome = gesture(&mut ctrl, &mut store, InputKind::Pointer, 8.0);
        assert_eq!(outcome, GestureOutcome::Moved { id: "a".to_string(), x: 108.0 });
        assert_eq!(store.get("a").unwrap().tree.x, 108.0);
    }

    #[test]
    fn test_touch_needs_larger_move() {
        let (mut ctrl, mut store) = garden();
        let outcome = gesture(&mut ctrl, &mut store, InputKind::Touch, 8.0);
        assert_eq!(outcome, GestureOutcome::Selected { id: "a".to_string() });

        let outcome = gesture(&mut ctrl, &mut store, InputKind::Touch, 12.0);
        assert!(matches!(outcome, GestureOutcome::Moved { .. }));
    }

    #[test]
    fn test_drag_never_moves_vertically() {
        let (mut ctrl, mut store) = garden();
        assert!(ctrl.press(Vec2::new(100.0, 480.0), InputKind::Pointer, &store));
        ctrl.drag(Vec2::new(150.0, 300.0), &mut store);
        let tree = &store.get("a").unwrap().tree;
        assert_eq!(tree.x, 150.0);
        assert_eq!(tree.y, 500.0);
        assert!(matches!(ctrl.state(), GestureState::Dragging { .. }));
    }

    #[test]
    fn test_press_on_empty_space_captures_nothing() {
        let (mut ctrl, mut store) = garden();
        assert!(!ctrl.press(Vec2::new(400.0, 480.0), InputKind::Pointer, &store));
        ctrl.drag(Vec2::new(450.0, 480.0), &mut store);
        assert_eq!(ctrl.release(Vec2::new(450.0, 480.0), &mut store), GestureOutcome::None);
        assert_eq!(store.get("a").unwrap().tree.x, 100.0);
    }

    #[test]
    fn test_release_after_removal_reports_nothing() {
        let (mut ctrl, mut store) = garden();
        assert!(ctrl.press(Vec2::new(100.0, 480.0), InputKind::Pointer, &store));
        let mut rng = SmallRng::seed_from_u64(0);
        store.reconcile(&[], &mut rng, &GardenConfig::default());
        assert_eq!(ctrl.release(Vec2::new(100.0, 480.0), &mut store), GestureOutcome::None);
    }

    #[test]
    fn test_hover_cursor() {
        let (mut ctrl, store) = garden();
        assert_eq!(ctrl.hover(Vec2::new(100.0, 480.0), &store), Cursor::Grab);
        assert_eq!(ctrl.hover(Vec2::new(300.0, 480.0), &store), Cursor::Default);

        ctrl.press(Vec2::new(100.0, 480.0), InputKind::Pointer, &store);
        assert_eq!(ctrl.hover(Vec2::new(300.0, 480.0), &store), Cursor::Grabbing);
        assert_eq!(Cursor::Grabbing.css(), "grabbing");
    }

    #[test]
    fn test_second_press_ignored() {
        let (mut ctrl, store) = garden();
        assert!(ctrl.press(Vec2::new(100.0, 480.0), InputKind::Touch, &store));
        assert!(!ctrl.press(Vec2::new(100.0, 490.0), InputKind::Touch, &store));
        assert_eq!(ctrl.captured(), Some("a"));
        ctrl.cancel();
        assert!(ctrl.is_idle());
    }
}
