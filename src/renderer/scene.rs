//! Background, player and effect layers

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::{ColorStop, Painter};
use crate::Rgb;
use crate::consts::TRAIL_LIFE_MS;
use crate::sim::{Cloud, Item, Particle, ParticleKind, Player, TrailPoint};

const DAY_SKY: [ColorStop<'static>; 3] = [(0.0, "#FFE0B2"), (0.7, "#FFCC80"), (1.0, "#FF8A65")];
const NIGHT_SKY: [ColorStop<'static>; 3] =
    [(0.0, "#1A1A2E"), (0.7, "#16213E"), (1.0, "#0F3460")];

const CLOUD_STOPS: [ColorStop<'static>; 3] = [
    (0.0, "rgba(255, 255, 255, 0.9)"),
    (0.5, "rgba(240, 248, 255, 0.7)"),
    (1.0, "rgba(220, 235, 250, 0.5)"),
];

const FOG_LAYERS: [(f32, &str); 3] = [
    (0.9, "rgba(180, 180, 180, 0.95)"),
    (0.7, "rgba(220, 220, 220, 0.8)"),
    (0.5, "rgba(240, 240, 240, 0.6)"),
];

const STAR_COUNT: u32 = 20;

/// Stable pseudo-random value in 0-1 for a small integer key
pub(crate) fn hash01(key: u32) -> f32 {
    let mut x = key.wrapping_add(0x9E37_79B9).wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    (x & 0xFFFF) as f32 / 65535.0
}

/// Day gradient with the night gradient laid over it at `night` strength
pub fn draw_sky(p: &mut impl Painter, width: f32, height: f32, night: f32) {
    p.set_fill_linear(0.0, height, &DAY_SKY);
    p.fill_rect(0.0, 0.0, width, height);

    if night > 0.0 {
        p.save();
        p.set_alpha(night);
        p.set_fill_linear(0.0, height, &NIGHT_SKY);
        p.fill_rect(0.0, 0.0, width, height);
        p.restore();
    }
}

/// Sun fading out as the moon and stars fade in
pub fn draw_celestial(p: &mut impl Painter, width: f32, night: f32) {
    let anchor = Vec2::new(width - 100.0, 80.0);

    if night < 1.0 {
        p.set_fill(&Rgb(255, 193, 7).rgba(0.8 * (1.0 - night)));
        p.fill_circle(anchor, 40.0);
    }
    if night <= 0.0 {
        return;
    }

    p.set_fill(&Rgb(255, 255, 255).rgba(0.9 * night));
    p.fill_circle(anchor, 35.0);
    p.set_fill(&Rgb(200, 200, 200).rgba(0.3 * night));
    p.fill_circle(anchor + Vec2::new(8.0, -8.0), 25.0);

    p.set_fill(&Rgb(255, 255, 255).rgba(0.8 * night));
    for i in 0..STAR_COUNT {
        let x = (i as f32 * 47.0) % width.max(1.0);
        let y = (i as f32 * 31.0) % 150.0;
        p.fill_circle(Vec2::new(x, y), 1.0 + hash01(i) * 2.0);
    }
}

/// Four parallax hills drifting with elapsed time
pub fn draw_hills(p: &mut impl Painter, width: f32, height: f32, night: f32, elapsed_ms: f64) {
    let color = if night > 0.5 {
        Rgb(60, 40, 35).rgba(0.4)
    } else {
        Rgb(121, 85, 72).rgba(0.3)
    };
    p.set_fill(&color);

    let span = width as f64 + 150.0;
    for i in 0..4 {
        let fi = i as f32;
        let x = ((elapsed_ms * 0.05 + i as f64 * 200.0) % span) as f32 - 75.0;
        let y = height - 60.0 - fi * 10.0;
        p.fill_ellipse(Vec2::new(x, y), Vec2::new(80.0 + fi * 20.0, 30.0 + fi * 5.0));
    }
}

pub fn draw_trail(p: &mut impl Painter, trail: &[TrailPoint], color: Rgb) {
    if trail.len() < 2 {
        return;
    }
    let css = color.css();
    let opacity = |point: &TrailPoint| (point.life_ms / TRAIL_LIFE_MS).clamp(0.0, 1.0);

    p.save();
    p.set_stroke(&css, 8.0);
    for pair in trail.windows(2) {
        p.set_alpha(opacity(&pair[1]) * 0.4);
        p.stroke_line(pair[0].pos, pair[1].pos);
    }

    p.set_fill(&css);
    for point in trail {
        let o = opacity(point);
        p.set_alpha(o * 0.6);
        p.fill_circle(point.pos, 6.0 * o);
    }
    p.restore();
}

/// Round body, eyes and a spinning propeller; shimmers gold while invincible
pub fn draw_player(
    p: &mut impl Painter,
    player: &Player,
    invincible: bool,
    frame_count: u64,
    elapsed_ms: f64,
) {
    p.save();
    if invincible {
        p.set_alpha(0.7 + (frame_count as f32 * 0.3).sin() * 0.3);
        p.set_glow("#FFD700", 10.0);
    }

    p.set_fill(&player.color.css());
    p.fill_circle(player.center(), player.width / 2.0);

    let origin = Vec2::new(player.x, player.y);
    p.set_fill("white");
    p.fill_circle(origin + Vec2::new(6.4, 6.4), 3.2);
    p.fill_circle(origin + Vec2::new(13.6, 6.4), 3.2);
    p.set_fill("black");
    p.fill_circle(origin + Vec2::new(7.2, 6.4), 1.6);
    p.fill_circle(origin + Vec2::new(14.4, 6.4), 1.6);

    let hub = Vec2::new(player.x + player.width / 2.0, player.y - 4.8);
    let blade = Vec2::from_angle((elapsed_ms * 0.01) as f32) * 8.0;
    p.set_stroke("#FF5722", 1.6);
    p.stroke_line(hub - blade, hub + blade);

    p.restore();
}

pub fn draw_clouds(p: &mut impl Painter, clouds: &[Cloud]) {
    for cloud in clouds {
        p.save();
        p.set_alpha(cloud.opacity);
        let center = Vec2::new(cloud.x + cloud.width / 2.0, cloud.y + cloud.height / 2.0);
        p.set_fill_radial(center, cloud.width / 2.0, &CLOUD_STOPS);

        for i in 0..4 {
            let fi = i as f32;
            let sway = if i % 2 == 0 { -0.2 } else { 0.2 };
            let bubble = Vec2::new(
                cloud.x + (fi / 3.0) * cloud.width * 0.8,
                cloud.y + cloud.height * 0.3 + sway * cloud.height * 0.3,
            );
            let radius = cloud.height * (0.5 + (i % 2) as f32 * 0.2);
            p.fill_circle(bubble, radius);
        }
        p.restore();
    }
}

/// Five-point star outline, rotated by `rotation`
fn star_points(center: Vec2, outer: f32, inner: f32, rotation: f32) -> Vec<Vec2> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = rotation - FRAC_PI_2 + i as f32 * PI / 5.0;
            center + Vec2::from_angle(angle) * r
        })
        .collect()
}

/// Bobbing, spinning invincibility stars
pub fn draw_items(p: &mut impl Painter, items: &[Item]) {
    for item in items.iter().filter(|i| !i.collected) {
        let float_y = item.y + item.animation.sin() * 3.0;
        let center = Vec2::new(item.x + item.width / 2.0, float_y + item.height / 2.0);
        let rotation = item.animation * 0.5;
        let outer = item.width / 2.0;
        let points = star_points(center, outer, outer * 0.4, rotation);

        p.save();
        p.set_fill("#FFD700");
        p.fill_polygon(&points);
        p.set_stroke("#FFA500", 2.0);
        p.stroke_polygon(&points);

        p.set_fill("rgba(255, 255, 255, 0.8)");
        let sparkle = Vec2::from_angle(rotation).rotate(Vec2::new(-3.0, -3.0));
        p.fill_circle(center + sparkle, 2.0);
        p.restore();
    }
}

pub fn draw_particles(p: &mut impl Painter, particles: &[Particle]) {
    for (index, particle) in particles.iter().enumerate() {
        p.save();
        p.set_fill(&particle.color.css());

        if particle.kind.is_gas() {
            p.set_alpha(particle.alpha() * particle.opacity);
            match particle.kind {
                ParticleKind::GasCloud => {
                    let size = particle.size;
                    for bubble in 0..4u32 {
                        let key = (index as u32) * 4 + bubble;
                        let offset = Vec2::new(
                            (hash01(key) - 0.5) * size * 0.6,
                            (hash01(key ^ 0x5bd1) - 0.5) * size * 0.4,
                        );
                        let radius = size * (0.5 + hash01(key ^ 0x1b87) * 0.5);
                        p.fill_circle(particle.pos + offset, radius);
                    }
                }
                ParticleKind::GasStream => {
                    let radii = Vec2::new(particle.size * 0.7, particle.size * 1.5);
                    p.fill_ellipse(particle.pos, radii);
                }
                _ => p.fill_circle(particle.pos, particle.size),
            }
        } else {
            p.set_alpha(particle.alpha());
            let size = if particle.size > 0.0 { particle.size } else { 3.0 };
            p.fill_circle(particle.pos, size);
        }
        p.restore();
    }
}

/// Three gray wash layers scaled by fog intensity
pub fn draw_fog(p: &mut impl Painter, width: f32, height: f32, fog: f32) {
    if fog <= 0.0 {
        return;
    }
    p.save();
    for (strength, color) in FOG_LAYERS {
        p.set_alpha(fog * strength);
        p.set_fill(color);
        p.fill_rect(0.0, 0.0, width, height);
    }
    p.restore();
}
