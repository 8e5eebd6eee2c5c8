use crate::math::Vec2;

/// RGBA colour, components in `0..=255` except alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha multiplied by `factor`
    pub fn fade(&self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..*self
        }
    }

    /// CSS colour string for the canvas API
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One branch segment, optionally bent through a quadratic control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Vec2,
    pub to: Vec2,
    pub control: Option<Vec2>,
    pub width: f64,
    pub color: Rgba,
}

/// Blossom outline drawn at a branch tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlossomShape {
    /// Single disc
    Round,
    /// Five discs ringed around the tip
    Petals,
    /// Axis-aligned square
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blossom {
    pub center: Vec2,
    pub size: f64,
    pub shape: BlossomShape,
    pub color: Rgba,
    pub shadow: Rgba,
}

impl Blossom {
    /// Disc centres and radius making up this blossom
    pub fn discs(&self) -> Vec<(Vec2, f64)> {
        match self.shape {
            BlossomShape::Petals => (0..5)
                .map(|i| {
                    let a = (i as f64 / 5.0) * std::f64::consts::TAU;
                    (self.center + Vec2::from_angle(a).scale(self.size * 1.5), self.size)
                })
                .collect(),
            BlossomShape::Round | BlossomShape::Square => vec![(self.center, self.size)],
        }
    }
}

/// A soft glowing point (canopy particle or splash droplet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    pub radius: f64,
    pub alpha: f64,
}

/// Halo drawn under a verified tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halo {
    pub color: Rgba,
    pub blur: f64,
}
