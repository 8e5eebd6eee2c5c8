use std::f64::consts::{FRAC_PI_2, PI};

use super::style::{style_for, BranchStyle, VERIFIED_HALO};
use crate::config::GeometryConfig;
use crate::data::Category;
use crate::math::{seeded_centered, seeded_random, Vec2};
use crate::sketch::{Blossom, Sketch, Stroke};

/// Root fan-out is capped so one oversized descriptor cannot stall a frame
pub const MAX_FAN_OUT: u32 = 32;

/// Straight up on a canvas
const TRUNK_ANGLE: f64 = -FRAC_PI_2;

/// Everything the generator needs to know about a tree for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePose {
    pub origin: Vec2,
    pub growth: f64,
    pub seed: f64,
    pub fan_out: u32,
    pub wiggle_intensity: f64,
    pub wiggle_phase: f64,
    pub sway_intensity: f64,
    pub sway_phase: f64,
    pub category: Category,
    pub verified: bool,
}

impl TreePose {
    /// Depth budget for the current growth level
    pub fn max_depth(&self, geometry: &GeometryConfig) -> u32 {
        (self.growth.max(0.0) * geometry.depth_per_growth).floor() as u32 + 1
    }

    /// Transient watering wiggle at a given depth
    fn wiggle(&self, depth: u32) -> f64 {
        if self.wiggle_intensity > 0.0 {
            (self.wiggle_phase + depth as f64 * 0.5).sin() * 0.2 * self.wiggle_intensity
        } else {
            0.0
        }
    }

    /// Perpetual idle sway at a given depth
    fn sway(&self, depth: u32) -> f64 {
        (self.sway_phase + depth as f64 * 0.3).sin() * self.sway_intensity
    }
}

/// Recursive fractal branch generator
pub struct BranchGenerator {
    geometry: GeometryConfig,
}

/// Per-call constants threaded through the recursion
struct Walk<'a> {
    pose: &'a TreePose,
    style: &'static BranchStyle,
    max_depth: u32,
    sketch: &'a mut Sketch,
}

impl BranchGenerator {
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }

    /// Build this frame's strokes and blossoms for a tree
    pub fn generate(&self, pose: &TreePose) -> Sketch {
        let mut sketch = Sketch::new();
        if pose.verified {
            sketch.halo = Some(VERIFIED_HALO);
        }

        let mut walk = Walk {
            pose,
            style: style_for(pose.category),
            max_depth: pose.max_depth(&self.geometry),
            sketch: &mut sketch,
        };

        let trunk_length = pose.growth.max(0.0) * self.geometry.trunk_length_per_growth;
        self.branch(&mut walk, pose.origin, TRUNK_ANGLE, trunk_length, 0, 0.0);

        sketch
    }

    /// `node` is a stable key for this branch's position in the tree, so
    /// seeded choices never depend on where the tree currently stands.
    fn branch(&self, walk: &mut Walk<'_>, origin: Vec2, angle: f64, length: f64, depth: u32, node: f64) {
        let pose = walk.pose;
        let style = walk.style;

        if depth > walk.max_depth || length < self.geometry.min_segment_length {
            // Skip the tip entirely at the very start of growth
            if length > 1.0 {
                walk.sketch.add_blossom(Blossom {
                    center: origin,
                    size: 1.5 + pose.wiggle_intensity * 1.5,
                    shape: style.blossom_shape,
                    color: style.blossom_color,
                    shadow: style.blossom_shadow,
                });
            }
            return;
        }

        let depth_f = depth as f64;
        let final_angle = angle + pose.wiggle(depth) + pose.sway(depth);
        let end = origin + Vec2::from_angle(final_angle).scale(length);

        let control = if style.use_curves {
            let bend = (seeded_random(pose.seed * depth_f) * 2.0 - 1.0) * style.bend_scale;
            let offset = length * 0.4 * bend;
            Some(origin.midpoint(&end) + Vec2::from_angle(final_angle + PI / 2.0).scale(offset))
        } else {
            None
        };

        walk.sketch.add_stroke(Stroke {
            from: origin,
            to: end,
            control,
            width: ((walk.max_depth - depth + 1) as f64 * 0.8).max(0.5),
            color: style.branch_color,
        });

        let children = if depth == 0 {
            pose.fan_out.clamp(1, MAX_FAN_OUT)
        } else {
            (seeded_random(pose.seed * depth_f + node * 7.13) * 1.5).floor() as u32 + 1
        };
        let reduction = 0.65 + seeded_random(pose.seed * 2.0 + depth_f) * 0.2;
        let child_length = length * reduction;

        for i in 0..children {
            let child_node = node * 31.0 + i as f64 + 1.0;
            let deviation = seeded_centered(pose.seed * (i as f64 + 1.0) + child_node * 13.7 + depth_f);
            let child_angle = final_angle + deviation * style.angle_variance;
            self.branch(walk, end, child_angle, child_length, depth + 1, child_node);
        }
    }
}

impl Default for BranchGenerator {
    fn default() -> Self {
        Self::new(GeometryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::BlossomShape;

    fn pose(growth: f64, category: Category) -> TreePose {
        TreePose {
            origin: Vec2::new(200.0, 400.0),
            growth,
            seed: 1234.5,
            fan_out: 3,
            wiggle_intensity: 0.0,
            wiggle_phase: 0.0,
            sway_intensity: 0.02,
            sway_phase: 1.0,
            category,
            verified: false,
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = BranchGenerator::default();
        for category in Category::ALL {
            let p = pose(3.0, category);
            assert_eq!(generator.generate(&p), generator.generate(&p));
        }
    }

    #[test]
    fn test_zero_growth_draws_nothing() {
        let sketch = BranchGenerator::default().generate(&pose(0.0, Category::Other));
        assert!(sketch.is_empty());
    }

    #[test]
    fn test_tiny_growth_omits_blossom() {
        // trunk of 1.5px: too short for a stroke, and a blossom is only drawn above 1px
        let sketch = BranchGenerator::default().generate(&pose(0.05, Category::Other));
        assert!(sketch.strokes.is_empty());
        assert_eq!(sketch.blossoms.len(), 1);

        let sketch = BranchGenerator::default().generate(&pose(0.02, Category::Other));
        assert!(sketch.is_empty());
    }

    #[test]
    fn test_trunk_starts_at_origin_and_points_up() {
        let p = TreePose { sway_intensity: 0.0, ..pose(1.0, Category::Code) };
        let sketch = BranchGenerator::default().generate(&p);
        let trunk = sketch.strokes[0];
        assert_eq!(trunk.from, p.origin);
        assert!((trunk.to.x - p.origin.x).abs() < 1e-9);
        assert!((trunk.to.y - (p.origin.y - 30.0)).abs() < 1e-9);
        assert!(trunk.control.is_none());
    }

    #[test]
    fn test_root_fans_out() {
        let p = pose(1.0, Category::Other);
        let sketch = BranchGenerator::default().generate(&p);
        let trunk_end = sketch.strokes[0].to;
        let from_trunk = sketch.strokes.iter().filter(|s| s.from == trunk_end).count();
        assert_eq!(from_trunk, 3);
    }

    #[test]
    fn test_depth_budget_bounds_recursion() {
        let geometry = GeometryConfig::default();
        let p = pose(2.0, Category::Other);
        assert_eq!(p.max_depth(&geometry), 4);

        // depth 0 has fan_out children, every later depth at most two each
        let sketch = BranchGenerator::new(geometry).generate(&p);
        let max_strokes: u32 = 1 + (1..=4).map(|d| 3 * 2u32.pow(d - 1)).sum::<u32>();
        assert!(sketch.strokes.len() as u32 <= max_strokes);
        assert!(!sketch.blossoms.is_empty());
    }

    #[test]
    fn test_structure_independent_of_motion() {
        let generator = BranchGenerator::default();
        let calm = pose(3.0, Category::Media);
        let windy = TreePose { sway_phase: 4.0, wiggle_intensity: 1.0, wiggle_phase: 2.0, ..calm };
        let moved = TreePose { origin: Vec2::new(20.0, 300.0), ..calm };

        let a = generator.generate(&calm);
        let b = generator.generate(&windy);
        let c = generator.generate(&moved);
        assert_eq!(a.strokes.len(), b.strokes.len());
        assert_eq!(a.strokes.len(), c.strokes.len());
        assert_ne!(a.strokes, b.strokes);
    }

    #[test]
    fn test_wiggle_enlarges_blossoms() {
        let generator = BranchGenerator::default();
        let calm = generator.generate(&pose(2.0, Category::Other));
        let watered = generator.generate(&TreePose { wiggle_intensity: 1.0, ..pose(2.0, Category::Other) });
        assert_eq!(calm.blossoms[0].size, 1.5);
        assert_eq!(watered.blossoms[0].size, 3.0);
    }

    #[test]
    fn test_category_style_applied() {
        let generator = BranchGenerator::default();
        let image = generator.generate(&pose(2.0, Category::Image));
        assert!(image.blossoms.iter().all(|b| b.shape == BlossomShape::Petals));
        assert!(image.strokes.iter().all(|s| s.control.is_some()));

        let code = generator.generate(&pose(2.0, Category::Code));
        assert!(code.strokes.iter().all(|s| s.control.is_none()));
    }

    #[test]
    fn test_verified_adds_halo() {
        let generator = BranchGenerator::default();
        let p = TreePose { verified: true, ..pose(1.0, Category::Text) };
        assert_eq!(generator.generate(&p).halo, Some(VERIFIED_HALO));
        assert!(generator.generate(&pose(1.0, Category::Text)).halo.is_none());
    }

    #[test]
    fn test_oversized_fan_out_is_capped() {
        let p = TreePose { fan_out: 10_000, ..pose(0.5, Category::Other) };
        let sketch = BranchGenerator::default().generate(&p);
        let trunk_end = sketch.strokes[0].to;
        let from_trunk = sketch.strokes.iter().filter(|s| s.from == trunk_end).count();
        assert_eq!(from_trunk as u32, MAX_FAN_OUT);
    }

    #[test]
    fn test_stroke_width_tapers() {
        let sketch = BranchGenerator::default().generate(&pose(3.0, Category::Other));
        let trunk = sketch.strokes[0].width;
        assert!(sketch.strokes.iter().all(|s| s.width <= trunk && s.width >= 0.5));
    }
}
