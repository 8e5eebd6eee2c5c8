//! Live animation state for a single planted tree
//!
//! Wraps the host descriptor with everything that evolves frame to frame:
//! - Growth easing toward the host's target
//! - A decaying wiggle after each watering
//! - A gentle sway that never stops
//! - The tree's own canopy particles

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{CanopyConfig, GardenConfig, GeometryConfig, MotionConfig};
use crate::data::Tree;
use crate::growth::TreePose;
use crate::math::Vec2;
use crate::particles::Canopy;

/// Wiggle intensity right after a watering
pub const WIGGLE_MAX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTree {
    /// Latest descriptor; `tree.x` is the live position and may differ from
    /// the host's while a drag is in flight
    pub tree: Tree,
    /// Animated growth level, converging on `tree.target_growth`
    pub current_growth: f64,
    pub wiggle_intensity: f64,
    pub wiggle_phase: f64,
    pub sway_phase: f64,
    pub sway_intensity: f64,
    /// Fraction of the remaining growth gap closed per frame
    pub growth_rate: f64,
    pub canopy: Canopy,
    /// Last x the host reported, used to tell a fresh position from a stale one
    external_x: f64,
}

impl AnimatedTree {
    /// Plant a new tree at zero growth
    pub fn plant(tree: Tree, rng: &mut impl Rng, config: &GardenConfig) -> Self {
        let canopy = Canopy::seeded(tree.seed, tree.branches, &config.canopy);
        Self {
            external_x: tree.x,
            current_growth: 0.0,
            wiggle_intensity: 0.0,
            wiggle_phase: 0.0,
            sway_phase: rng.gen::<f64>() * TAU,
            sway_intensity: config.motion.sway_intensity.at(rng.gen()),
            growth_rate: config.motion.growth_rate.at(rng.gen()),
            canopy,
            tree,
        }
    }

    pub fn id(&self) -> &str {
        &self.tree.id
    }

    /// Fold a fresh host descriptor into the live state.
    ///
    /// Growth, sway and existing particles carry over untouched. Returns true
    /// if the update was a watering (target growth rose).
    pub fn absorb(&mut self, incoming: &Tree, rng: &mut impl Rng, canopy: &CanopyConfig) -> bool {
        let watered = incoming.target_growth > self.tree.target_growth;
        if incoming.branches > self.tree.branches {
            self.canopy
                .add_for_branches(incoming.branches - self.tree.branches, rng, canopy);
        }

        // Keep a locally dragged x unless the host sent a new position
        let live_x = if incoming.x != self.external_x {
            incoming.x
        } else {
            self.tree.x
        };
        self.external_x = incoming.x;
        self.tree = Tree {
            x: live_x,
            ..incoming.clone()
        };

        if watered {
            self.wiggle_intensity = WIGGLE_MAX;
            self.wiggle_phase = rng.gen::<f64>() * TAU;
        }
        watered
    }

    /// Advance every time-varying field by `dt` frames
    pub fn advance(&mut self, dt: f64, motion: &MotionConfig) {
        let target = self.tree.target_growth;
        let gap = target - self.current_growth;
        if gap != 0.0 {
            // Exponential approach: closes `rate` of the gap per frame and never crosses it
            let closed = 1.0 - (1.0 - self.growth_rate).powf(dt);
            self.current_growth += gap * closed.clamp(0.0, 1.0);
            if (target - self.current_growth) * gap <= 0.0 {
                self.current_growth = target;
            }
        }

        if self.wiggle_intensity > 0.0 {
            self.wiggle_intensity *= motion.wiggle_decay.powf(dt);
            self.wiggle_phase += motion.wiggle_phase_step * dt;
            if self.wiggle_intensity < motion.wiggle_floor {
                self.wiggle_intensity = 0.0;
            }
        }

        self.sway_phase = (self.sway_phase + motion.sway_phase_step * dt) % TAU;
        self.canopy.advance(dt);
    }

    /// Move the live position during a drag
    pub fn set_x(&mut self, x: f64) {
        self.tree.x = x;
    }

    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.tree.x, self.tree.y)
    }

    /// Snapshot for the generator
    pub fn pose(&self) -> TreePose {
        TreePose {
            origin: self.anchor(),
            growth: self.current_growth,
            seed: self.tree.seed,
            fan_out: self.tree.branches,
            wiggle_intensity: self.wiggle_intensity,
            wiggle_phase: self.wiggle_phase,
            sway_intensity: self.sway_intensity,
            sway_phase: self.sway_phase,
            category: self.tree.file_type,
            verified: self.tree.is_verified,
        }
    }

    /// Point the canopy particles orbit around
    pub fn canopy_center(&self, geometry: &GeometryConfig, canopy: &CanopyConfig) -> Vec2 {
        let trunk = self.current_growth * geometry.trunk_length_per_growth;
        Vec2::new(self.tree.x, self.tree.y - trunk * canopy.center_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn planted(target: f64) -> (AnimatedTree, SmallRng, GardenConfig) {
        let config = GardenConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let tree = Tree::new("t", 100.0, 500.0)
            .with_growth(target, 5.0)
            .with_seed(321.0)
            .with_branches(2);
        (AnimatedTree::plant(tree, &mut rng, &config), rng, config)
    }

    #[test]
    fn test_plant_initial_state() {
        let (t, _, config) = planted(1.0);
        assert_eq!(t.current_growth, 0.0);
        assert_eq!(t.wiggle_intensity, 0.0);
        assert_eq!(t.canopy.len(), 4);
        assert!(t.growth_rate >= config.motion.growth_rate.min && t.growth_rate <= config.motion.growth_rate.max);
        assert!(t.sway_phase >= 0.0 && t.sway_phase < TAU);
    }

    #[test]
    fn test_growth_converges_without_overshoot() {
        let (mut t, _, config) = planted(2.0);
        let mut prev = t.current_growth;
        for _ in 0..2_000 {
            t.advance(1.0, &config.motion);
            assert!(t.current_growth >= prev);
            assert!(t.current_growth <= 2.0);
            prev = t.current_growth;
        }
        assert!((2.0 - t.current_growth) < 1e-6);
    }

    #[test]
    fn test_large_step_does_not_overshoot() {
        let (mut t, _, config) = planted(1.0);
        t.advance(1e6, &config.motion);
        assert_eq!(t.current_growth, 1.0);
    }

    #[test]
    fn test_step_scaling_matches_repeated_frames() {
        let (mut a, _, config) = planted(3.0);
        let mut b = a.clone();
        a.advance(2.0, &config.motion);
        b.advance(1.0, &config.motion);
        b.advance(1.0, &config.motion);
        assert!((a.current_growth - b.current_growth).abs() < 1e-9);
    }

    #[test]
    fn test_watering_resets_wiggle() {
        let (mut t, mut rng, config) = planted(1.0);
        let watered = Tree { target_growth: 1.5, ..t.tree.clone() };
        assert!(t.absorb(&watered, &mut rng, &config.canopy));
        assert_eq!(t.wiggle_intensity, WIGGLE_MAX);

        t.advance(1.0, &config.motion);
        assert!((t.wiggle_intensity - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_same_descriptor_leaves_wiggle_alone() {
        let (mut t, mut rng, config) = planted(1.0);
        t.wiggle_intensity = 0.4;
        t.wiggle_phase = 2.0;
        let same = t.tree.clone();
        assert!(!t.absorb(&same, &mut rng, &config.canopy));
        assert_eq!(t.wiggle_intensity, 0.4);
        assert_eq!(t.wiggle_phase, 2.0);
    }

    #[test]
    fn test_wiggle_decays_to_zero() {
        let (mut t, _, config) = planted(1.0);
        t.wiggle_intensity = WIGGLE_MAX;
        for _ in 0..1_000 {
            t.advance(1.0, &config.motion);
        }
        assert_eq!(t.wiggle_intensity, 0.0);
    }

    #[test]
    fn test_sway_never_stops() {
        let (mut t, _, config) = planted(1.0);
        let intensity = t.sway_intensity;
        let phase = t.sway_phase;
        t.advance(1.0, &config.motion);
        assert_eq!(t.sway_intensity, intensity);
        assert!(t.sway_phase != phase);
    }

    #[test]
    fn test_dragged_x_survives_stale_update() {
        let (mut t, mut rng, config) = planted(1.0);
        let stale = t.tree.clone();
        t.set_x(250.0);
        t.absorb(&stale, &mut rng, &config.canopy);
        assert_eq!(t.tree.x, 250.0);
    }

    #[test]
    fn test_fresh_host_x_wins() {
        let (mut t, mut rng, config) = planted(1.0);
        t.set_x(250.0);
        let moved = Tree { x: 40.0, ..t.tree.clone() };
        t.absorb(&moved, &mut rng, &config.canopy);
        assert_eq!(t.tree.x, 40.0);
    }

    #[test]
    fn test_canopy_center_rises_with_growth() {
        let (mut t, _, config) = planted(1.0);
        t.current_growth = 2.0;
        let center = t.canopy_center(&config.geometry, &config.canopy);
        assert_eq!(center.x, 100.0);
        assert!((center.y - (500.0 - 60.0 * 0.8)).abs() < 1e-9);
    }
}
