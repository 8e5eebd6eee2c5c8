//! Engine tuning knobs
//!
//! Every constant that shapes motion or interaction lives here so a host can
//! override it from YAML. Defaults reproduce the stock garden look.

use serde::{Deserialize, Serialize};

use crate::error::GardenError;

/// Inclusive-exclusive range sampled uniformly for one-off randomness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Value at fraction `t` of the way through the span
    pub fn at(&self, t: f64) -> f64 {
        self.min + (self.max - self.min) * t
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Parameters for growth and idle motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of the remaining growth gap closed per frame
    pub growth_rate: Span,
    /// Wiggle multiplier applied per frame after a watering
    pub wiggle_decay: f64,
    /// Wiggle below this is snapped to zero
    pub wiggle_floor: f64,
    /// Wiggle phase advance per frame
    pub wiggle_phase_step: f64,
    /// Sway phase advance per frame
    pub sway_phase_step: f64,
    /// Constant sway amplitude in radians
    pub sway_intensity: Span,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            growth_rate: Span::new(0.015, 0.025),
            wiggle_decay: 0.98,
            wiggle_floor: 1e-3,
            wiggle_phase_step: 0.1,
            sway_phase_step: 0.01,
            sway_intensity: Span::new(0.01, 0.03),
        }
    }
}

/// Parameters for the recursive branch generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Trunk length in pixels per growth level
    pub trunk_length_per_growth: f64,
    /// Depth budget is `floor(growth * depth_per_growth) + 1`
    pub depth_per_growth: f64,
    /// Segments shorter than this end in a blossom
    pub min_segment_length: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            trunk_length_per_growth: 30.0,
            depth_per_growth: 1.5,
            min_segment_length: 2.0,
        }
    }
}

/// Parameters for the orbiting canopy points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    pub particles_per_branch: u32,
    pub radius: Span,
    /// Extra orbit radius per growth level
    pub radius_per_growth: f64,
    /// Angular speed in radians per frame (signed)
    pub speed: Span,
    pub size: Span,
    /// Canopy center sits this fraction of the trunk length above the anchor
    pub center_height: f64,
    /// Vertical squash of the orbit ellipse
    pub vertical_squash: f64,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            particles_per_branch: 2,
            radius: Span::new(15.0, 30.0),
            radius_per_growth: 3.0,
            speed: Span::new(-0.01, 0.01),
            size: Span::new(1.0, 2.5),
            center_height: 0.8,
            vertical_squash: 0.6,
        }
    }
}

/// Parameters for the watering splash burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub burst_size: usize,
    /// Downward acceleration in pixels per frame squared
    pub gravity: f64,
    pub speed: Span,
    /// Lifetime in frames
    pub life: Span,
    pub size: Span,
    /// Total fan of launch angles around straight up, in radians
    pub spread: f64,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            burst_size: 50,
            gravity: 0.05,
            speed: Span::new(3.0, 8.0),
            life: Span::new(80.0, 120.0),
            size: Span::new(1.0, 3.0),
            spread: 1.2,
        }
    }
}

/// Parameters for pointer and touch gestures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Grabbable trunk height in pixels per growth level
    pub hit_height_per_growth: f64,
    pub pointer_tolerance: f64,
    pub touch_tolerance: f64,
    pub pointer_drag_threshold: f64,
    pub touch_drag_threshold: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hit_height_per_growth: 40.0,
            pointer_tolerance: 20.0,
            touch_tolerance: 28.0,
            pointer_drag_threshold: 5.0,
            touch_drag_threshold: 10.0,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    pub motion: MotionConfig,
    pub geometry: GeometryConfig,
    pub canopy: CanopyConfig,
    pub splash: SplashConfig,
    pub interaction: InteractionConfig,
}

impl GardenConfig {
    /// Parse a (possibly partial) YAML document; missing keys keep defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, GardenError> {
        let config: GardenConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or explode the animation
    pub fn validate(&self) -> Result<(), GardenError> {
        let m = &self.motion;
        let g = &self.geometry;
        let c = &self.canopy;
        let s = &self.splash;
        let i = &self.interaction;

        let spans = [
            ("motion.growth_rate", m.growth_rate),
            ("motion.sway_intensity", m.sway_intensity),
            ("canopy.radius", c.radius),
            ("canopy.speed", c.speed),
            ("canopy.size", c.size),
            ("splash.speed", s.speed),
            ("splash.life", s.life),
            ("splash.size", s.size),
        ];
        for (name, span) in spans {
            if !span.is_valid() {
                return Err(invalid(format!("{} must satisfy min <= max", name)));
            }
        }

        if m.growth_rate.min <= 0.0 || m.growth_rate.max > 1.0 {
            return Err(invalid("motion.growth_rate must lie in (0, 1]".to_string()));
        }
        if !(0.0..1.0).contains(&m.wiggle_decay) {
            return Err(invalid("motion.wiggle_decay must lie in [0, 1)".to_string()));
        }
        if g.trunk_length_per_growth <= 0.0 || g.depth_per_growth <= 0.0 || g.min_segment_length <= 0.0 {
            return Err(invalid("geometry values must be positive".to_string()));
        }
        if s.burst_size == 0 {
            return Err(invalid("splash.burst_size must be positive".to_string()));
        }
        if s.life.min <= 0.0 {
            return Err(invalid("splash.life must be positive".to_string()));
        }
        if i.pointer_tolerance <= 0.0 || i.pointer_drag_threshold <= 0.0 {
            return Err(invalid("pointer tolerance and threshold must be positive".to_string()));
        }
        if i.touch_tolerance < i.pointer_tolerance || i.touch_drag_threshold < i.pointer_drag_threshold {
            return Err(invalid("touch tolerance and threshold must not be tighter than pointer".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> GardenError {
    GardenError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GardenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_stock_garden() {
        let config = GardenConfig::default();
        assert_eq!(config.splash.burst_size, 50);
        assert_eq!(config.interaction.pointer_drag_threshold, 5.0);
        assert_eq!(config.interaction.touch_drag_threshold, 10.0);
        assert!(config.interaction.touch_tolerance > config.interaction.pointer_tolerance);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "splash:\n  burst_size: 20\n";
        let config = GardenConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.splash.burst_size, 20);
        assert_eq!(config.splash.gravity, 0.05);
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn test_rejects_zero_burst() {
        let err = GardenConfig::from_yaml("splash:\n  burst_size: 0\n").unwrap_err();
        assert!(matches!(err, GardenError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_span() {
        let yaml = "canopy:\n  radius:\n    min: 30\n    max: 10\n";
        assert!(GardenConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_tight_touch() {
        let yaml = "interaction:\n  touch_drag_threshold: 2\n";
        assert!(GardenConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = GardenConfig::from_yaml("splash: [1, 2").unwrap_err();
        assert!(matches!(err, GardenError::ConfigParse(_)));
    }

    #[test]
    fn test_span_at() {
        let span = Span::new(10.0, 20.0);
        assert_eq!(span.at(0.0), 10.0);
        assert_eq!(span.at(0.5), 15.0);
    }
}
