use crate::data::Category;
use crate::sketch::{BlossomShape, Halo, Rgba};

/// Visual parameters for one file category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchStyle {
    pub branch_color: Rgba,
    pub blossom_color: Rgba,
    pub blossom_shadow: Rgba,
    pub blossom_shape: BlossomShape,
    /// Quadratic bends when true, straight segments otherwise
    pub use_curves: bool,
    /// Multiplier on the seeded bend factor
    pub bend_scale: f64,
    /// Full width of the seeded angular deviation for children, in radians
    pub angle_variance: f64,
}

const OTHER: BranchStyle = BranchStyle {
    branch_color: Rgba::new(80, 254, 213, 0.7),
    blossom_color: Rgba::new(255, 106, 90, 0.8),
    blossom_shadow: Rgba::new(255, 106, 90, 1.0),
    blossom_shape: BlossomShape::Round,
    use_curves: true,
    bend_scale: 1.0,
    angle_variance: 1.2,
};

const IMAGE: BranchStyle = BranchStyle {
    branch_color: Rgba::new(122, 92, 255, 0.8),
    blossom_color: Rgba::new(255, 180, 90, 0.9),
    blossom_shadow: Rgba::new(255, 180, 90, 1.0),
    blossom_shape: BlossomShape::Petals,
    ..OTHER
};

const TEXT: BranchStyle = BranchStyle {
    branch_color: Rgba::new(200, 220, 255, 0.7),
    blossom_color: Rgba::new(220, 230, 255, 0.9),
    blossom_shadow: Rgba::new(220, 236, 255, 1.0),
    bend_scale: 0.2,
    angle_variance: 0.8,
    ..OTHER
};

const CODE: BranchStyle = BranchStyle {
    branch_color: Rgba::new(80, 220, 254, 0.8),
    blossom_color: Rgba::new(80, 254, 213, 1.0),
    blossom_shadow: Rgba::new(80, 254, 213, 1.0),
    blossom_shape: BlossomShape::Square,
    use_curves: false,
    angle_variance: 1.57,
    ..OTHER
};

const MEDIA: BranchStyle = BranchStyle {
    branch_color: Rgba::new(255, 106, 90, 0.7),
    blossom_color: Rgba::new(255, 136, 120, 0.9),
    blossom_shadow: Rgba::new(255, 136, 120, 1.0),
    bend_scale: 1.5,
    angle_variance: 1.5,
    ..OTHER
};

/// Glow layered under verified trees
pub const VERIFIED_HALO: Halo = Halo {
    color: Rgba::new(80, 254, 213, 0.7),
    blur: 15.0,
};

/// Colour of canopy and splash glows
pub const GLOW_COLOR: Rgba = Rgba::new(80, 254, 213, 0.8);
pub const SPLASH_COLOR: Rgba = Rgba::new(80, 254, 213, 0.9);

/// Style table lookup
pub fn style_for(category: Category) -> &'static BranchStyle {
    match category {
        Category::Image => &IMAGE,
        Category::Text => &TEXT,
        Category::Code => &CODE,
        Category::Media => &MEDIA,
        Category::Other => &OTHER,
    }
}
