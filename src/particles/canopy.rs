//! Glowing points orbiting a tree's canopy
//!
//! Each tree owns its particles for its whole lifetime. The set only ever
//! grows: when a tree gains branches, new particles are appended and the
//! existing ones keep their angle and parameters.

use rand::Rng;

use crate::config::CanopyConfig;
use crate::math::{seeded_random, Vec2};
use crate::sketch::Glow;

/// A single orbiting canopy particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopyParticle {
    /// Current orbital angle in radians
    pub angle: f64,
    /// Base orbital radius before growth is added
    pub radius: f64,
    /// Angular speed in radians per frame
    pub speed: f64,
    pub size: f64,
}

impl CanopyParticle {
    /// Particle whose parameters derive from the tree seed, so a tree's
    /// initial canopy looks the same every time it is planted
    fn seeded(seed: f64, index: usize, config: &CanopyConfig) -> Self {
        let i = index as f64;
        Self {
            angle: seeded_random(seed + i) * std::f64::consts::TAU,
            radius: config.radius.at(seeded_random(seed + i * 2.0)),
            speed: config.speed.at(seeded_random(seed + i * 3.0)),
            size: config.size.at(seeded_random(seed + i * 4.0)),
        }
    }

    fn random(rng: &mut impl Rng, config: &CanopyConfig) -> Self {
        Self {
            angle: rng.gen::<f64>() * std::f64::consts::TAU,
            radius: config.radius.at(rng.gen()),
            speed: config.speed.at(rng.gen()),
            size: config.size.at(rng.gen()),
        }
    }
}

/// The particle set owned by one tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canopy {
    particles: Vec<CanopyParticle>,
}

impl Canopy {
    /// Initial canopy for a freshly planted tree
    pub fn seeded(seed: f64, branches: u32, config: &CanopyConfig) -> Self {
        let count = Self::target_count(branches, config);
        Self {
            particles: (0..count).map(|i| CanopyParticle::seeded(seed, i, config)).collect(),
        }
    }

    /// Number of particles a tree with `branches` branches should carry
    pub fn target_count(branches: u32, config: &CanopyConfig) -> usize {
        branches as usize * config.particles_per_branch as usize
    }

    /// Append fresh particles for newly gained branches; returns how many
    pub fn add_for_branches(&mut self, gained: u32, rng: &mut impl Rng, config: &CanopyConfig) -> usize {
        let extra = Self::target_count(gained, config);
        self.particles
            .extend((0..extra).map(|_| CanopyParticle::random(rng, config)));
        extra
    }

    /// Advance every orbit by `dt` frames
    pub fn advance(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.angle = (p.angle + p.speed * dt) % std::f64::consts::TAU;
        }
    }

    /// Render positions around `center`; the orbit widens with growth
    pub fn glows(&self, center: Vec2, growth: f64, config: &CanopyConfig) -> Vec<Glow> {
        self.particles
            .iter()
            .map(|p| {
                let orbit = p.radius + growth * config.radius_per_growth;
                Glow {
                    center: Vec2::new(
                        center.x + p.angle.cos() * orbit,
                        center.y + p.angle.sin() * orbit * config.vertical_squash,
                    ),
                    radius: p.size,
                    alpha: 1.0,
                }
            })
            .collect()
    }

    pub fn particles(&self) -> &[CanopyParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
