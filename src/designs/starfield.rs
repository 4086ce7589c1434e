//! Starfield design.

use rand::Rng;

use super::shaping::{amplitude, range_mean};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::effects::Particle;
use crate::render::{Canvas, Rgba};

const STAR_COUNT: usize = 320;
const BASE_SPEED: f32 = 0.004;
const NEAR_PLANE: f32 = 0.02;
/// Chance of a shooting star on a beat frame.
const SHOOTING_STAR_CHANCE: f64 = 0.35;

#[derive(Debug, Clone, Copy)]
struct Star {
    x: f32,
    y: f32,
    z: f32,
}

impl Star {
    fn random<R: Rng + ?Sized>(rng: &mut R, z: f32) -> Self {
        Self {
            x: rng.random_range(-1.0..1.0),
            y: rng.random_range(-1.0..1.0),
            z,
        }
    }
}

/// Stars streaming outward from the centre; overall energy sets the speed.
pub struct StarfieldDesign {
    stars: Vec<Star>,
}

impl StarfieldDesign {
    pub fn new() -> Self {
        Self { stars: Vec::new() }
    }
}

impl Default for StarfieldDesign {
    fn default() -> Self {
        Self::new()
    }
}

impl Design for StarfieldDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Starfield
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        if self.stars.is_empty() {
            self.stars = (0..STAR_COUNT)
                .map(|_| {
                    let z = fx.rng.random_range(NEAR_PLANE..1.0);
                    let star = Star::random(fx.rng, z);
                    // Start on screen: projected position is (x / z, y / z).
                    Star {
                        x: star.x * z,
                        y: star.y * z,
                        z,
                    }
                })
                .collect();
        }

        let (width, height) = params.size();
        let (cx, cy) = params.center();
        let energy = amplitude(range_mean(signal, 0.0, 0.5), 1.5, params.sensitivity);
        let speed = BASE_SPEED + energy * 0.03;
        let project = |s: &Star, z: f32| (cx + s.x / z * cx, cy + s.y / z * cy);

        for star in &mut self.stars {
            let before = project(star, star.z);
            star.z -= speed;
            if star.z <= NEAR_PLANE {
                *star = Star::random(fx.rng, 1.0);
                continue;
            }
            let after = project(star, star.z);
            if after.0 < 0.0 || after.0 > width || after.1 < 0.0 || after.1 > height {
                *star = Star::random(fx.rng, 1.0);
                continue;
            }
            let nearness = 1.0 - star.z;
            let color = params
                .palette
                .secondary
                .lerp(Rgba::WHITE, 0.6)
                .fade(0.3 + nearness * 0.7);
            canvas.line(before.0, before.1, after.0, after.1, 0.5 + nearness * 2.5, color);
        }

        if params.beat && fx.rng.random_bool(SHOOTING_STAR_CHANCE) {
            let x = fx.rng.random_range(0.0..width.max(1.0));
            let vx = fx.rng.random_range(6.0..10.0) * if x > cx { -1.0 } else { 1.0 };
            fx.particles.spawn(Particle::new(
                x,
                0.0,
                vx,
                fx.rng.random_range(1.0..3.0),
                2.0,
                params.palette.accent,
            ));
        }
    }
}
