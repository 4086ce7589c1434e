//! Particle and shockwave simulation.
//!
//! Designs push short-lived particles and expanding rings into the
//! `ParticleSystem`; the pipeline advances, culls and draws them once per
//! frame after the active design has run. Nothing outside the system keeps
//! references to live particles between frames.

use crate::render::{Canvas, Rgba};

/// Downward acceleration added to `vy` every frame (px/frame²).
pub const GRAVITY: f32 = 0.1;

/// Opacity lost per frame. A power of two so decay reaches exactly zero.
pub const OPACITY_DECAY: f32 = 1.0 / 64.0;

/// How far below the surface a particle may fall before it is culled.
pub const CULL_MARGIN: f32 = 50.0;

pub const MAX_PARTICLES: usize = 2000;
pub const MAX_SHOCKWAVES: usize = 32;

/// Circular motion around a fixed centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub center: (f32, f32),
    pub angle: f32,
    pub radius: f32,
    pub base_radius: f32,
    pub angular_velocity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub orbit: Option<Orbit>,
    pub radius: f32,
    pub opacity: f32,
    pub color: Rgba,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32, color: Rgba) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            orbit: None,
            radius,
            opacity: 1.0,
            color,
        }
    }

    /// A particle locked to an orbit; its position is derived from the orbit.
    pub fn orbiting(orbit: Orbit, radius: f32, color: Rgba) -> Self {
        let (x, y) = orbit_position(&orbit);
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            orbit: Some(orbit),
            radius,
            opacity: 1.0,
            color,
        }
    }

    fn advance(&mut self) {
        match &mut self.orbit {
            Some(orbit) => {
                orbit.angle += orbit.angular_velocity;
                let (x, y) = orbit_position(orbit);
                self.x = x;
                self.y = y;
            }
            None => {
                self.x += self.vx;
                self.y += self.vy;
                self.vy += GRAVITY;
            }
        }
        self.opacity = (self.opacity - OPACITY_DECAY).max(0.0);
    }
}

fn orbit_position(orbit: &Orbit) -> (f32, f32) {
    (
        orbit.center.0 + orbit.angle.cos() * orbit.radius,
        orbit.center.1 + orbit.angle.sin() * orbit.radius,
    )
}

/// Expanding ring carrying a beat impulse across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Shockwave {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    pub line_width: f32,
    pub color: Rgba,
}

impl Shockwave {
    pub fn new(x: f32, y: f32, radius: f32, line_width: f32, color: Rgba) -> Self {
        Self {
            x,
            y,
            radius,
            opacity: 1.0,
            line_width,
            color,
        }
    }

    fn advance(&mut self) {
        self.radius += 4.0 + self.line_width * 0.5;
        self.line_width = (self.line_width * 0.96).max(0.5);
        self.opacity = (self.opacity - OPACITY_DECAY * 2.0).max(0.0);
    }
}

/// Owner of every live particle and shockwave.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    shockwaves: Vec<Shockwave>,
    dropped: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle; ignored once the live cap is reached.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= MAX_PARTICLES {
            self.dropped += 1;
            return false;
        }
        self.particles.push(particle);
        true
    }

    pub fn spawn_shockwave(&mut self, wave: Shockwave) -> bool {
        if self.shockwaves.len() >= MAX_SHOCKWAVES {
            self.dropped += 1;
            return false;
        }
        self.shockwaves.push(wave);
        true
    }

    /// Integrate one frame of motion and decay.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.advance();
        }
        for w in &mut self.shockwaves {
            w.advance();
        }
    }

    /// Remove faded particles and those that fell below the surface.
    ///
    /// Survivors keep their relative order so draw order stays stable.
    pub fn cull(&mut self, surface_height: f32) {
        let limit = surface_height + CULL_MARGIN;
        self.particles.retain(|p| p.opacity > 0.0 && p.y <= limit);
        self.shockwaves.retain(|w| w.opacity > 0.0);
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for w in &self.shockwaves {
            canvas.stroke_circle(w.x, w.y, w.radius, w.line_width, w.color.fade(w.opacity));
        }
        for p in &self.particles {
            canvas.fill_circle(p.x, p.y, p.radius, p.color.fade(p.opacity));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.shockwaves.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shockwaves(&self) -> &[Shockwave] {
        &self.shockwaves
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.shockwaves.is_empty()
    }

    /// Spawns rejected because a cap was reached.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32) -> Particle {
        Particle::new(x, y, 0.0, 0.0, 2.0, Rgba::WHITE)
    }

    #[test]
    fn test_particle_culled_after_exact_decay() {
        let mut system = ParticleSystem::new();
        system.spawn(still(10.0, 10.0));
        let lifetime = (1.0 / OPACITY_DECAY).ceil() as usize;

        for _ in 0..lifetime - 1 {
            system.advance();
            system.cull(100_000.0);
        }
        assert_eq!(system.len(), 1);

        system.advance();
        system.cull(100_000.0);
        assert_eq!(system.len(), 0);
    }

    #[test]
    fn test_gravity_accelerates_downward() {
        let mut system = ParticleSystem::new();
        system.spawn(still(0.0, 0.0));
        system.advance();
        system.advance();
        let p = &system.particles()[0];
        assert!((p.vy - 2.0 * GRAVITY).abs() < 1e-6);
        assert!((p.y - GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_is_monotonic() {
        let mut system = ParticleSystem::new();
        system.spawn(still(0.0, 0.0));
        let mut last = 1.0;
        for _ in 0..10 {
            system.advance();
            let now = system.particles()[0].opacity;
            assert!(now <= last);
            last = now;
        }
    }

    #[test]
    fn test_cull_below_surface_keeps_order() {
        let mut system = ParticleSystem::new();
        system.spawn(still(1.0, 10.0));
        system.spawn(still(2.0, 500.0));
        system.spawn(still(3.0, 20.0));
        system.cull(100.0);
        let xs: Vec<f32> = system.particles().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn test_orbit_recomputes_position() {
        let orbit = Orbit {
            center: (50.0, 50.0),
            angle: 0.0,
            radius: 10.0,
            base_radius: 10.0,
            angular_velocity: std::f32::consts::FRAC_PI_2,
        };
        let mut system = ParticleSystem::new();
        system.spawn(Particle::orbiting(orbit, 2.0, Rgba::WHITE));
        assert!((system.particles()[0].x - 60.0).abs() < 1e-4);
        system.advance();
        let p = &system.particles()[0];
        assert!((p.x - 50.0).abs() < 1e-3);
        assert!((p.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut system = ParticleSystem::new();
        for _ in 0..MAX_PARTICLES {
            assert!(system.spawn(still(0.0, 0.0)));
        }
        assert!(!system.spawn(still(0.0, 0.0)));
        assert_eq!(system.len(), MAX_PARTICLES);
        assert_eq!(system.dropped(), 1);
    }

    #[test]
    fn test_shockwave_expands_and_fades() {
        let mut system = ParticleSystem::new();
        system.spawn_shockwave(Shockwave::new(0.0, 0.0, 10.0, 4.0, Rgba::WHITE));
        system.advance();
        let w = &system.shockwaves()[0];
        assert!(w.radius > 10.0);
        assert!(w.opacity < 1.0);
        for _ in 0..64 {
            system.advance();
        }
        system.cull(100.0);
        assert!(system.shockwaves().is_empty());
    }
}
