//! Visual particles: explosion, thrust gas and invincibility sparkles
//!
//! Particles never affect gameplay. Emission rates and lifetimes were tuned
//! in 60 Hz frames; velocities here are stored in pixels/second and lives in
//! milliseconds so advancing them is frame-rate independent.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::Rgb;
use crate::consts::REFERENCE_FRAME_MS;
use crate::frame_scale;

/// Particle shape / behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Explosion,
    Gas,
    GasCloud,
    GasStream,
    InvincibleSparkle,
}

impl ParticleKind {
    /// Gas kinds expand and slow down as they age
    pub fn is_gas(&self) -> bool {
        matches!(
            self,
            ParticleKind::Gas | ParticleKind::GasCloud | ParticleKind::GasStream
        )
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Pixels/second
    pub vel: Vec2,
    pub life_ms: f32,
    pub max_life_ms: f32,
    pub size: f32,
    pub color: Rgb,
    pub opacity: f32,
    /// Size multiplier per 60 Hz frame (1.0 = constant)
    pub expansion: f32,
}

impl Particle {
    /// Remaining life fraction (1 = fresh)
    pub fn alpha(&self) -> f32 {
        (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life_ms > 0.0
    }
}

/// Frames at the reference rate to milliseconds
fn frames(n: f32) -> f32 {
    n * REFERENCE_FRAME_MS
}

/// Per-frame velocity to pixels/second
fn per_frame(v: f32) -> f32 {
    v * 1000.0 / REFERENCE_FRAME_MS
}

/// Game-over burst at the player center
pub fn emit_explosion(rng: &mut Pcg32, out: &mut Vec<Particle>, at: Vec2) {
    for _ in 0..15 {
        let vel = Vec2::new(
            per_frame((rng.random::<f32>() - 0.5) * 10.0),
            per_frame((rng.random::<f32>() - 0.5) * 10.0),
        );
        let hue = rng.random::<f32>() * 60.0 + 15.0;
        out.push(Particle {
            kind: ParticleKind::Explosion,
            pos: at,
            vel,
            life_ms: frames(30.0),
            max_life_ms: frames(30.0),
            size: 3.0,
            color: hsl_to_rgb(hue, 1.0, 0.5),
            opacity: 1.0,
            expansion: 1.0,
        });
    }
}

/// Exhaust puff while thrusting; every third `puff` adds a larger gas cloud
pub fn emit_gas(rng: &mut Pcg32, out: &mut Vec<Particle>, at: Vec2, puff: u64) {
    let white = Rgb(255, 255, 255);
    let jitter = |rng: &mut Pcg32, spread: f32| (rng.random::<f32>() - 0.5) * spread;

    let life = 10.0 + rng.random::<f32>() * 5.0;
    let pos = Vec2::new(at.x - 5.0 + jitter(rng, 2.0), at.y + jitter(rng, 3.0));
    out.push(Particle {
        kind: ParticleKind::Gas,
        pos,
        vel: Vec2::new(
            per_frame(-60.0 + rng.random::<f32>() * 30.0),
            per_frame(jitter(rng, 20.0)),
        ),
        life_ms: frames(life),
        max_life_ms: frames(15.0),
        size: rng.random::<f32>() * 3.0 + 1.0,
        color: white,
        opacity: rng.random::<f32>() * 0.6 + 0.4,
        expansion: rng.random::<f32>() * 0.2 + 0.95,
    });

    if puff % 3 == 0 {
        let life = 12.0 + rng.random::<f32>() * 8.0;
        let pos = Vec2::new(at.x - 8.0 + jitter(rng, 3.0), at.y + jitter(rng, 4.0));
        out.push(Particle {
            kind: ParticleKind::GasCloud,
            pos,
            vel: Vec2::new(
                per_frame(-40.0 + rng.random::<f32>() * 20.0),
                per_frame(jitter(rng, 15.0)),
            ),
            life_ms: frames(life),
            max_life_ms: frames(20.0),
            size: rng.random::<f32>() * 4.0 + 2.0,
            color: white,
            opacity: rng.random::<f32>() * 0.5 + 0.3,
            expansion: rng.random::<f32>() * 0.1 + 0.9,
        });
    }

    for _ in 0..2 {
        let life = 8.0 + rng.random::<f32>() * 5.0;
        let pos = Vec2::new(at.x - 10.0 + jitter(rng, 2.0), at.y + jitter(rng, 2.0));
        out.push(Particle {
            kind: ParticleKind::GasStream,
            pos,
            vel: Vec2::new(
                per_frame(-80.0 + rng.random::<f32>() * 40.0),
                per_frame(jitter(rng, 10.0)),
            ),
            life_ms: frames(life),
            max_life_ms: frames(13.0),
            size: rng.random::<f32>() * 2.0 + 1.0,
            color: white,
            opacity: rng.random::<f32>() * 0.7 + 0.3,
            expansion: rng.random::<f32>() * 0.1 + 0.95,
        });
    }
}

/// Gold burst when a star is collected
pub fn emit_sparkles(rng: &mut Pcg32, out: &mut Vec<Particle>, at: Vec2) {
    for _ in 0..15 {
        out.push(Particle {
            kind: ParticleKind::InvincibleSparkle,
            pos: at,
            vel: Vec2::new(
                per_frame((rng.random::<f32>() - 0.5) * 8.0),
                per_frame((rng.random::<f32>() - 0.5) * 8.0),
            ),
            life_ms: frames(30.0),
            max_life_ms: frames(30.0),
            size: rng.random::<f32>() * 4.0 + 2.0,
            color: Rgb(255, 215, 0),
            opacity: 1.0,
            expansion: 1.0,
        });
    }
}

/// Age, move and cull particles, keeping at most `cap` (newest win)
pub fn advance_particles(particles: &mut Vec<Particle>, dt_ms: f32, cap: usize) {
    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }

    let scale = frame_scale(dt_ms);
    let dt = dt_ms / 1000.0;
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.life_ms -= dt_ms;

        if p.kind.is_gas() {
            p.size *= p.expansion.powf(scale);
            p.vel.y *= 0.96f32.powf(scale);
            p.vel.x *= 0.98f32.powf(scale);
        }
    }

    particles.retain(Particle::is_alive);
}

/// HSL (hue in degrees, saturation/lightness 0-1) to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let ch = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(ch(r), ch(g), ch(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_explosion_count_and_colors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = Vec::new();
        emit_explosion(&mut rng, &mut out, Vec2::new(110.0, 210.0));
        assert_eq!(out.len(), 15);
        for p in &out {
            assert_eq!(p.kind, ParticleKind::Explosion);
            // Hues 15-75 are orange through yellow: no blue component
            assert_eq!(p.color.2, 0);
            assert!(p.color.0 == 255 || p.color.1 == 255);
        }
    }

    #[test]
    fn test_gas_cloud_every_third_puff() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut out = Vec::new();
        emit_gas(&mut rng, &mut out, Vec2::ZERO, 3);
        assert_eq!(out.len(), 4);
        out.clear();
        emit_gas(&mut rng, &mut out, Vec2::ZERO, 4);
        assert_eq!(out.len(), 3);
        assert!(!out.iter().any(|p| p.kind == ParticleKind::GasCloud));
    }

    #[test]
    fn test_advance_expires_and_caps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        for _ in 0..5 {
            emit_sparkles(&mut rng, &mut particles, Vec2::ZERO);
        }
        assert_eq!(particles.len(), 75);

        advance_particles(&mut particles, 16.0, 50);
        assert_eq!(particles.len(), 50);

        // Sparkles live 30 frames (500 ms)
        advance_particles(&mut particles, 600.0, 50);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_movement_is_time_based() {
        let make = || Particle {
            kind: ParticleKind::Explosion,
            pos: Vec2::ZERO,
            vel: Vec2::new(120.0, 0.0),
            life_ms: 1000.0,
            max_life_ms: 1000.0,
            size: 3.0,
            color: Rgb(255, 0, 0),
            opacity: 1.0,
            expansion: 1.0,
        };
        let mut a = vec![make()];
        let mut b = vec![make()];
        advance_particles(&mut a, 100.0, 50);
        advance_particles(&mut b, 50.0, 50);
        advance_particles(&mut b, 50.0, 50);
        assert!((a[0].pos.x - 12.0).abs() < 1e-3);
        assert!((a[0].pos.x - b[0].pos.x).abs() < 1e-3);
    }

    #[test]
    fn test_hsl() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(hsl_to_rgb(60.0, 1.0, 0.5), Rgb(255, 255, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb(0, 255, 0));
    }
}
