//! Overlap tests between the player and everything else
//!
//! All predicates are pure; the tick decides what a hit means.

use glam::Vec2;

use super::state::{Cloud, GameState, Geometry, Item, Obstacle, Player};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn overlaps_x(&self, x: f32, w: f32) -> bool {
        self.x < x + w && self.x + self.w > x
    }
}

/// Circle vs circle
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Whether `obstacle` touches the player, by geometry
pub fn obstacle_hits(player: &Player, obstacle: &Obstacle) -> bool {
    let pb = player.bounds();
    match obstacle.geometry {
        Geometry::Columns {
            width,
            top_height,
            bottom_y,
            bottom_height,
        } => {
            pb.overlaps_x(obstacle.x, width)
                && ((top_height > 0.0 && pb.y < top_height)
                    || (bottom_height > 0.0 && pb.y + pb.h > bottom_y))
        }
        Geometry::Rect { y, width, height } => {
            pb.overlaps(&Bounds::new(obstacle.x, y, width, height))
        }
        Geometry::Circle { y, radius } => {
            let center = Vec2::new(obstacle.x + radius, y + radius);
            circles_overlap(player.center(), player.radius(), center, radius)
        }
    }
}

/// Obstacle collision for the current state; never true while invincible
pub fn check_collision(state: &GameState) -> bool {
    if state.invincible {
        return false;
    }
    state
        .obstacles
        .iter()
        .any(|o| obstacle_hits(&state.player, o))
}

/// Whether the player is inside any cloud
pub fn in_cloud(player: &Player, clouds: &[Cloud]) -> bool {
    let pb = player.bounds();
    clouds.iter().any(|c| pb.overlaps(&c.bounds()))
}

/// Index of the first uncollected item the player is touching
pub fn touched_item(player: &Player, items: &[Item]) -> Option<usize> {
    let pb = player.bounds();
    items
        .iter()
        .position(|item| !item.collected && pb.overlaps(&item.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgb;
    use crate::sim::state::ObstacleKind;

    fn player_at(y: f32) -> Player {
        let mut p = Player::new(Rgb(0, 0, 0));
        p.y = y;
        p
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Bounds::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Bounds::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Bounds::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_columns_gap() {
        let o = Obstacle::columns(
            1,
            ObstacleKind::Normal,
            95.0,
            20.0,
            100.0,
            240.0,
            160.0,
            Rgb(0, 0, 0),
            300.0,
        );
        assert!(!obstacle_hits(&player_at(150.0), &o));
        assert!(obstacle_hits(&player_at(90.0), &o));
        assert!(obstacle_hits(&player_at(225.0), &o));
    }

    #[test]
    fn test_columns_absent_half_is_harmless() {
        let top = Obstacle::columns(
            1,
            ObstacleKind::TopOnly,
            95.0,
            20.0,
            100.0,
            410.0,
            0.0,
            Rgb(0, 0, 0),
            300.0,
        );
        assert!(!obstacle_hits(&player_at(380.0), &top));
        assert!(obstacle_hits(&player_at(50.0), &top));
    }

    #[test]
    fn test_circle_uses_true_distance() {
        // Player center (110, 210), radius 10
        let touching = Obstacle::circle(1, ObstacleKind::Circle, 115.0, 205.0, 10.0, Rgb(0, 0, 0), 300.0);
        assert!(obstacle_hits(&player_at(200.0), &touching));

        // Bounding boxes overlap at the corner but the circles do not
        let corner = Obstacle::circle(2, ObstacleKind::Circle, 117.0, 217.0, 10.0, Rgb(0, 0, 0), 300.0);
        assert!(!obstacle_hits(&player_at(200.0), &corner));
    }

    #[test]
    fn test_items_skip_collected() {
        let player = player_at(200.0);
        let mut items = vec![crate::sim::state::Item::new(105.0, 205.0)];
        assert_eq!(touched_item(&player, &items), Some(0));
        items[0].collected = true;
        assert_eq!(touched_item(&player, &items), None);
    }
}
