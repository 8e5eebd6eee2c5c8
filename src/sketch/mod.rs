//! Flat drawing primitives produced once per frame
//!
//! The generator and particle systems emit these; the canvas painter consumes
//! them. Nothing here touches the browser, so frames can be inspected in tests.

pub mod primitives;

pub use primitives::{Blossom, BlossomShape, Glow, Halo, Rgba, Stroke};

/// Everything drawn for one tree's branches in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    pub strokes: Vec<Stroke>,
    pub blossoms: Vec<Blossom>,
    pub halo: Option<Halo>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn add_blossom(&mut self, blossom: Blossom) {
        self.blossoms.push(blossom);
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.blossoms.is_empty()
    }
}

/// A whole frame, in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    /// Per tree: its branches, then its canopy glows
    pub trees: Vec<(Sketch, Vec<Glow>)>,
    pub splash: Vec<Glow>,
}

impl Frame {
    pub fn stroke_count(&self) -> usize {
        self.trees.iter().map(|(s, _)| s.strokes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    fn stroke(from: Vec2, to: Vec2) -> Stroke {
        Stroke { from, to, control: None, width: 1.0, color: WHITE }
    }

    #[test]
    fn test_new_sketch_is_empty() {
        let mut sketch = Sketch::new();
        assert!(sketch.is_empty());
        sketch.add_stroke(stroke(Vec2::new(10.0, 100.0), Vec2::new(10.0, 70.0)));
        assert!(!sketch.is_empty());
    }

    #[test]
    fn test_petals_make_five_discs() {
        let blossom = Blossom {
            center: Vec2::ZERO,
            size: 2.0,
            shape: BlossomShape::Petals,
            color: WHITE,
            shadow: WHITE,
        };
        let discs = blossom.discs();
        assert_eq!(discs.len(), 5);
        for (c, r) in discs {
            assert!((c.length() - 3.0).abs() < 1e-9);
            assert_eq!(r, 2.0);
        }
    }

    #[test]
    fn test_rgba_css_and_fade() {
        let c = Rgba::new(80, 254, 213, 0.8);
        assert_eq!(c.css(), "rgba(80, 254, 213, 0.8)");
        assert_eq!(c.fade(0.5).a, 0.4);
        assert_eq!(c.fade(3.0).a, 1.0);
    }
}
