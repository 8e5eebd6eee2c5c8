//! Ballistic water droplets thrown up by a watering
//!
//! Global and independent of any tree: a burst launches from the bottom centre
//! of the surface, droplets fall under gravity and vanish once spent.

use std::f64::consts::FRAC_PI_2;

use rand::Rng;

use crate::config::SplashConfig;
use crate::math::Vec2;
use crate::sketch::Glow;

/// A single splash droplet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime in frames, never negative
    pub life: f64,
    pub max_life: f64,
    pub size: f64,
}

impl WaterParticle {
    fn launch(origin: Vec2, rng: &mut impl Rng, config: &SplashConfig) -> Self {
        // Upward-biased fan centred on straight up
        let angle = -FRAC_PI_2 + (rng.gen::<f64>() - 0.5) * config.spread;
        let speed = config.speed.at(rng.gen());
        let life = config.life.at(rng.gen());

        Self {
            position: origin,
            velocity: Vec2::from_angle(angle).scale(speed),
            life,
            max_life: life,
            size: config.size.at(rng.gen()),
        }
    }

    /// Integrate one step of `dt` frames; returns whether the droplet survives
    fn integrate(&mut self, dt: f64, gravity: f64) -> bool {
        self.position = self.position + self.velocity.scale(dt);
        self.velocity.y += gravity * dt;
        self.life = (self.life - dt).max(0.0);
        self.life > 0.0
    }

    /// Opacity proportional to remaining life
    pub fn opacity(&self) -> f64 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// All live splash droplets
#[derive(Debug, Clone, Default)]
pub struct SplashSystem {
    particles: Vec<WaterParticle>,
}

impl SplashSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch one burst from `origin`
    pub fn spawn_burst(&mut self, origin: Vec2, rng: &mut impl Rng, config: &SplashConfig) {
        self.particles.reserve(config.burst_size);
        for _ in 0..config.burst_size {
            self.particles.push(WaterParticle::launch(origin, rng, config));
        }
    }

    /// Advance every droplet and drop the spent ones in place
    pub fn update(&mut self, dt: f64, config: &SplashConfig) {
        self.particles.retain_mut(|p| p.integrate(dt, config.gravity));
    }

    pub fn glows(&self) -> Vec<Glow> {
        self.particles
            .iter()
            .map(|p| Glow {
                center: p.position,
                radius: p.size,
                alpha: p.opacity(),
            })
            .collect()
    }

    pub fn particles(&self) -> &[WaterParticle] {
        &self.particles
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }
}
