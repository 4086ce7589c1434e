//! Particle-driven designs.
//!
//! Neither design keeps particles itself; they spawn into the shared
//! `ParticleSystem`, which the pipeline advances, culls and draws after the
//! design returns.

use std::f32::consts::TAU;

use rand::Rng;

use super::shaping::{amplitude, bands, glow, range_mean};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::effects::{Orbit, Particle, Shockwave};
use crate::render::Canvas;

/// Bass amplitude above which particles start streaming out of the core.
pub const SPAWN_THRESHOLD: f32 = 0.35;

/// Core that sheds particles on bass hits and fires a shockwave on beats.
pub struct ParticlesDesign;

impl Design for ParticlesDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Particles
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let bass = amplitude(range_mean(signal, 0.0, 0.12), 1.5, params.sensitivity);
        let core = params.min_dim() * (0.07 + bass.min(1.5) * 0.05);

        canvas.set_glow(glow(params.palette.primary, params.beat));
        canvas.fill_circle(cx, cy, core, params.palette.primary.fade(0.85));
        canvas.set_glow(None);
        canvas.fill_circle(cx, cy, core * 0.6, params.palette.background_glow);

        if bass > SPAWN_THRESHOLD {
            let count = (bass * 6.0).ceil() as usize;
            for _ in 0..count {
                let angle = fx.rng.random_range(0.0..TAU);
                let speed = fx.rng.random_range(2.0..6.0) * bass.min(1.5);
                let index = fx.rng.random_range(0..32);
                let color = params.palette.element_color(index, 32, bass, params.beat);
                fx.particles.spawn(Particle::new(
                    cx + angle.cos() * core,
                    cy + angle.sin() * core,
                    angle.cos() * speed,
                    angle.sin() * speed - 1.0,
                    fx.rng.random_range(1.5..4.0),
                    color,
                ));
            }
        }

        if params.beat {
            fx.particles.spawn_shockwave(Shockwave::new(
                cx,
                cy,
                core,
                6.0,
                params.palette.accent,
            ));
        }
    }
}

const ORBIT_DOTS: usize = 64;

/// Ring of dots with particles launched into orbit around it.
pub struct OrbitDesign;

impl Design for OrbitDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Orbit
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let base = params.min_dim() * 0.25;
        let spin = params.time as f32 * 0.3;
        let values = bands(signal, ORBIT_DOTS);

        canvas.set_glow(glow(params.palette.secondary, params.beat));
        for (i, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let angle = i as f32 / ORBIT_DOTS as f32 * TAU + spin;
            let r = base + amp * params.min_dim() * 0.05;
            let color = params.palette.element_color(i, ORBIT_DOTS, amp, params.beat);
            canvas.fill_circle(cx + angle.cos() * r, cy + angle.sin() * r, 1.5 + amp * 4.0, color);
        }
        canvas.set_glow(None);

        let energy = amplitude(range_mean(signal, 0.0, 0.3), 1.5, params.sensitivity);
        let launches = if params.beat {
            6
        } else if energy > SPAWN_THRESHOLD && fx.rng.random_bool(0.5) {
            1
        } else {
            0
        };
        for _ in 0..launches {
            let radius = base * fx.rng.random_range(0.8..1.5);
            let direction = if fx.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let orbit = Orbit {
                center: (cx, cy),
                angle: fx.rng.random_range(0.0..TAU),
                radius,
                base_radius: base,
                angular_velocity: direction * fx.rng.random_range(0.01..0.05),
            };
            let color = params.palette.accent.lerp(params.palette.primary, fx.rng.random());
            fx.particles.spawn(Particle::orbiting(orbit, fx.rng.random_range(1.5..3.5), color));
        }
    }
}
