//! Obstacle drawing, one routine per kind

use std::f32::consts::TAU;

use glam::Vec2;

use super::Painter;
use crate::Rgb;
use crate::sim::{Geometry, Obstacle, ObstacleKind};

/// Top-left box of any obstacle shape
struct Frame {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Frame {
    fn of(obstacle: &Obstacle) -> Self {
        match obstacle.geometry {
            Geometry::Rect { y, width, height } => Self {
                x: obstacle.x,
                y,
                w: width,
                h: height,
            },
            Geometry::Circle { y, radius } => Self {
                x: obstacle.x,
                y,
                w: radius * 2.0,
                h: radius * 2.0,
            },
            Geometry::Columns { width, .. } => Self {
                x: obstacle.x,
                y: 0.0,
                w: width,
                h: 0.0,
            },
        }
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    fn radius(&self) -> f32 {
        self.w.min(self.h) / 2.0
    }
}

pub fn draw_obstacle(p: &mut impl Painter, obstacle: &Obstacle, playfield_height: f32) {
    let color = obstacle.color.css();
    let dark = obstacle.color.darker().css();
    let f = Frame::of(obstacle);
    p.set_fill(&color);

    match obstacle.kind {
        ObstacleKind::Normal | ObstacleKind::TopOnly | ObstacleKind::BottomOnly => {
            draw_columns(p, obstacle, &color, &dark, playfield_height)
        }
        ObstacleKind::Bird { black } => draw_bird(p, obstacle, &f, black),
        ObstacleKind::Cactus => draw_cactus(p, &f, &dark),
        ObstacleKind::MiniCactus => draw_mini_cactus(p, &f, &dark),
        ObstacleKind::Spike => {
            p.fill_rect(f.x + f.w * 0.3, f.y, f.w * 0.4, f.h);
            if f.h > 15.0 {
                p.fill_rect(f.x, f.y + f.h * 0.3, f.w * 0.4, f.h * 0.2);
                p.fill_rect(f.x + f.w * 0.6, f.y + f.h * 0.6, f.w * 0.4, f.h * 0.25);
            }
            p.set_fill(&dark);
            for i in 0..8 {
                let dot_x = f.x + f.w * 0.4 + (i % 2) as f32 * f.w * 0.2;
                let dot_y = f.y + (i as f32 / 8.0) * f.h;
                p.fill_rect(dot_x, dot_y, 1.0, 2.0);
            }
        }
        ObstacleKind::MiniSpike => {
            p.fill_rect(f.x + f.w * 0.3, f.y, f.w * 0.4, f.h);
            p.set_fill(&dark);
            for i in 0..3 {
                let dot_y = f.y + (i + 1) as f32 * f.h * 0.25;
                p.fill_rect(f.x + f.w * 0.5, dot_y, 0.5, 1.0);
            }
        }
        ObstacleKind::GroundBlock => draw_round_cactus(p, &f, &dark, 6, Vec2::new(1.0, 2.0)),
        ObstacleKind::MiniBlock => draw_round_cactus(p, &f, &dark, 4, Vec2::new(0.5, 1.0)),
        ObstacleKind::GroundCircle => {
            draw_barrel_cactus(p, &f, &dark, 8, 0.8, Vec2::new(1.0, 2.0))
        }
        ObstacleKind::MiniGroundCircle => {
            draw_barrel_cactus(p, &f, &dark, 4, 0.7, Vec2::new(0.5, 1.0))
        }
        ObstacleKind::CeilingSpike => draw_icicle(p, &f, &dark, 2.0),
        ObstacleKind::MiniCeilingSpike => draw_icicle(p, &f, &dark, 1.0),
        ObstacleKind::CeilingBlock | ObstacleKind::Floating => {
            p.fill_rect(f.x, f.y, f.w, f.h);
            p.set_fill(&dark);
            p.fill_rect(f.x + 2.0, f.y + 2.0, f.w - 4.0, f.h - 4.0);
            p.set_stroke(&dark, 2.0);
            p.stroke_rect(f.x, f.y, f.w, f.h);
        }
        ObstacleKind::MiniCeilingBlock => {
            p.fill_rect(f.x, f.y, f.w, f.h);
            p.set_stroke(&dark, 1.0);
            p.stroke_rect(f.x, f.y, f.w, f.h);
        }
        ObstacleKind::CeilingCircle | ObstacleKind::Circle => {
            let (c, r) = (f.center(), f.radius());
            p.fill_circle(c, r);
            p.set_stroke(&dark, 2.0);
            p.stroke_circle(c, r);
            p.set_fill(&dark);
            p.fill_circle(c, r * 0.6);
        }
        ObstacleKind::MiniCeilingCircle => {
            let (c, r) = (f.center(), f.radius());
            p.fill_circle(c, r);
            p.set_stroke(&dark, 1.0);
            p.stroke_circle(c, r);
        }
    }
}

/// Column pair with horizontal banding
fn draw_columns(p: &mut impl Painter, obstacle: &Obstacle, color: &str, dark: &str, floor: f32) {
    let Geometry::Columns {
        width,
        top_height,
        bottom_y,
        bottom_height,
    } = obstacle.geometry
    else {
        return;
    };
    let x = obstacle.x;

    if top_height > 0.0 {
        p.fill_rect(x, 0.0, width, top_height);
        p.set_fill(dark);
        let mut band = 0.0;
        while band < top_height {
            p.fill_rect(x + 2.0, band + 2.0, width - 4.0, 8.0);
            band += 15.0;
        }
        p.set_fill(color);
    }

    if bottom_height > 0.0 {
        p.fill_rect(x, bottom_y, width, bottom_height);
        p.set_fill(dark);
        let mut band = bottom_y;
        while band < floor {
            p.fill_rect(x + 2.0, band + 2.0, width - 4.0, 8.0);
            band += 15.0;
        }
        p.set_fill(color);
    }

    p.set_stroke(dark, 2.0);
    if top_height > 0.0 {
        p.stroke_rect(x, 0.0, width, top_height);
    }
    if bottom_height > 0.0 {
        p.stroke_rect(x, bottom_y, width, bottom_height);
    }
}

/// Saguaro: trunk, two arms and a column of spines
fn draw_cactus(p: &mut impl Painter, f: &Frame, dark: &str) {
    let main_w = f.w * 0.6;
    let main_x = f.x + (f.w - main_w) / 2.0;
    p.fill_rect(main_x, f.y, main_w, f.h);

    let left_y = f.y + f.h * 0.4;
    let left_w = f.w * 0.4;
    let left_h = f.h * 0.3;
    p.fill_rect(f.x, left_y, left_w + main_w / 2.0, main_w * 0.8);
    p.fill_rect(f.x, left_y, main_w * 0.8, left_h);

    let right_y = f.y + f.h * 0.3;
    let right_w = f.w * 0.4;
    let right_h = f.h * 0.25;
    let right_x = main_x + main_w / 2.0;
    p.fill_rect(right_x, right_y, right_w, main_w * 0.8);
    p.fill_rect(main_x + main_w - main_w * 0.8, right_y, main_w * 0.8, right_h);

    p.set_fill(dark);
    let spines = (f.h / 8.0).floor() as u32;
    for j in 0..spines {
        let sx = main_x + main_w * 0.3 + (j % 2) as f32 * main_w * 0.4;
        let sy = f.y + j as f32 * 8.0 + 4.0;
        p.fill_rect(sx - 1.0, sy - 1.0, 2.0, 2.0);
    }
    for j in 0..3 {
        let sx = f.x + left_w * 0.3 + j as f32 * left_w * 0.2;
        let sy = left_y + left_h * 0.5;
        p.fill_rect(sx - 0.5, sy - 0.5, 1.0, 1.0);
    }
    for j in 0..3 {
        let sx = right_x + right_w * 0.2 + j as f32 * right_w * 0.3;
        let sy = right_y + right_h * 0.4;
        p.fill_rect(sx - 0.5, sy - 0.5, 1.0, 1.0);
    }
}

fn draw_mini_cactus(p: &mut impl Painter, f: &Frame, dark: &str) {
    let main_w = f.w * 0.7;
    let main_x = f.x + (f.w - main_w) / 2.0;
    p.fill_rect(main_x, f.y, main_w, f.h);

    let branch_y = f.y + f.h * 0.5;
    let branch_w = f.w * 0.3;
    let branch_h = f.h * 0.4;
    p.fill_rect(f.x, branch_y, branch_w + main_w / 2.0, main_w * 0.7);
    p.fill_rect(f.x, branch_y, main_w * 0.7, branch_h);

    p.set_fill(dark);
    let spines = (f.h / 5.0).floor() as u32;
    for j in 0..spines {
        let sx = main_x + main_w * 0.3 + (j % 2) as f32 * main_w * 0.4;
        let sy = f.y + j as f32 * 5.0 + 2.0;
        p.fill_rect(sx - 0.5, sy - 0.5, 1.0, 1.0);
    }
}

/// Oval cactus with spines on an inner ring
fn draw_round_cactus(p: &mut impl Painter, f: &Frame, dark: &str, spines: u32, dot: Vec2) {
    let c = f.center();
    p.fill_ellipse(c, Vec2::new(f.w / 2.0, f.h / 2.0));

    p.set_fill(dark);
    for i in 0..spines {
        let dir = Vec2::from_angle(i as f32 / spines as f32 * TAU);
        let at = c + dir * Vec2::new(f.w * 0.3, f.h * 0.3);
        p.fill_rect(at.x, at.y, dot.x, dot.y);
    }
}

/// Round cactus with spines centered on a ring at `reach` of the radius
fn draw_barrel_cactus(
    p: &mut impl Painter,
    f: &Frame,
    dark: &str,
    spines: u32,
    reach: f32,
    dot: Vec2,
) {
    let (c, r) = (f.center(), f.radius());
    p.fill_circle(c, r);

    p.set_fill(dark);
    for i in 0..spines {
        let at = c + Vec2::from_angle(i as f32 / spines as f32 * TAU) * r * reach;
        p.fill_rect(at.x - dot.x / 2.0, at.y - dot.y / 2.0, dot.x, dot.y);
    }
}

/// Downward-pointing triangle hanging from the top edge
fn draw_icicle(p: &mut impl Painter, f: &Frame, dark: &str, outline: f32) {
    let points = [
        Vec2::new(f.x + f.w / 2.0, f.y + f.h),
        Vec2::new(f.x, f.y),
        Vec2::new(f.x + f.w, f.y),
    ];
    p.fill_polygon(&points);
    p.set_stroke(dark, outline);
    p.stroke_polygon(&points);
}

fn draw_bird(p: &mut impl Painter, obstacle: &Obstacle, f: &Frame, black: bool) {
    let c = f.center();
    let (w, h) = (f.w, f.h);
    let wing = obstacle
        .bird
        .map(|m| m.wing_phase.sin() * 3.0)
        .unwrap_or(0.0);

    // Body and head
    p.fill_ellipse(c, Vec2::new(w / 2.0, h / 2.0));
    p.fill_circle(c - Vec2::new(w / 3.0, 0.0), h / 3.0);

    // Beak, pointing left
    let (beak, highlight) = if black {
        ("#FFD700", "#FFFF00")
    } else {
        ("#FF8C00", "#FFD700")
    };
    let bx = c.x - w / 2.0;
    let cy = c.y;
    p.set_fill(beak);
    p.fill_polygon(&[
        Vec2::new(bx - 1.0, cy),
        Vec2::new(bx - 12.0, cy - 3.0),
        Vec2::new(bx - 12.0, cy + 3.0),
    ]);
    p.set_fill(highlight);
    p.fill_polygon(&[
        Vec2::new(bx - 2.0, cy - 1.0),
        Vec2::new(bx - 10.0, cy - 2.0),
        Vec2::new(bx - 10.0, cy + 2.0),
        Vec2::new(bx - 2.0, cy + 1.0),
    ]);
    p.set_fill("#FFA500");
    p.fill_polygon(&[
        Vec2::new(bx - 10.0, cy - 2.0),
        Vec2::new(bx - 12.0, cy - 3.0),
        Vec2::new(bx - 12.0, cy + 3.0),
        Vec2::new(bx - 10.0, cy + 2.0),
    ]);

    // Eye
    let ex = c.x - w / 3.0;
    let (sclera, pupil) = if black {
        ("#FF0000", "#FF6666")
    } else {
        ("white", "black")
    };
    p.set_fill(sclera);
    p.fill_circle(Vec2::new(ex - 5.0, cy - 3.0), 3.0);
    p.set_fill(pupil);
    p.fill_circle(Vec2::new(ex - 6.0, cy - 3.0), 2.0);
    p.set_fill("#FFFFFF");
    p.fill_circle(Vec2::new(ex - 6.5, cy - 3.5), 0.8);

    // Wings flap in opposition; the tail shares their color
    let (feather, detail) = if black {
        (Rgb::hex(0x1A1A1A), Rgb::hex(0x0D0D0D))
    } else {
        (obstacle.color.scaled(0.8), obstacle.color.darker())
    };
    p.set_fill(&feather.css());
    let wing_radii = Vec2::new(w / 4.0, h / 2.0);
    p.fill_ellipse(Vec2::new(c.x - w / 6.0, cy + wing), wing_radii);
    p.fill_ellipse(Vec2::new(c.x + w / 6.0, cy - wing), wing_radii);

    let tx = c.x + w / 2.0;
    p.fill_polygon(&[
        Vec2::new(tx, cy),
        Vec2::new(tx + 10.0, cy - 4.0),
        Vec2::new(tx + 8.0, cy + 4.0),
    ]);
    p.set_fill(&detail.css());
    p.fill_polygon(&[
        Vec2::new(tx + 2.0, cy - 2.0),
        Vec2::new(tx + 6.0, cy - 3.0),
        Vec2::new(tx + 4.0, cy + 1.0),
    ]);
    p.fill_polygon(&[
        Vec2::new(tx + 2.0, cy + 2.0),
        Vec2::new(tx + 6.0, cy + 3.0),
        Vec2::new(tx + 4.0, cy - 1.0),
    ]);
}
