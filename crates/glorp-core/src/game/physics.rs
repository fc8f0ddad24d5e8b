//! Bird and obstacle geometry

use crate::config::GameConfig;
use serde::Serialize;

/// The player-controlled subject
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bird {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Vertical velocity, positive is down
    pub velocity: f64,
    pub size: f64,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.bird_x(),
            y: config.bird_start_y(),
            velocity: 0.0,
            size: config.bird_size,
        }
    }

    /// Apply one tick of gravity and move
    pub fn integrate(&mut self, gravity: f64) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Collision box, shrunk by `inset` of the size on every side
    pub fn hitbox(&self, inset: f64) -> Hitbox {
        Hitbox {
            left: self.x + self.size * inset,
            right: self.x + self.size * (1.0 - inset),
            top: self.y + self.size * inset,
            bottom: self.y + self.size * (1.0 - inset),
        }
    }

    /// Above the top edge or below the bottom edge of the field
    pub fn out_of_bounds(&self, field_height: f64) -> bool {
        self.y < 0.0 || self.y + self.size > field_height
    }

    /// Tilt for rendering, in radians
    pub fn rotation(&self) -> f64 {
        self.velocity * 0.02
    }
}

/// Axis-aligned box used for collisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A scrolling pair of barriers with an opening between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f64,
    pub width: f64,
    /// The top barrier covers `0..gap_top`
    pub gap_top: f64,
    /// The bottom barrier covers `gap_bottom..field height`
    pub gap_bottom: f64,
    /// Already counted towards the score
    pub scored: bool,
}

impl Obstacle {
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Entirely past the left edge of the field
    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Whether the box overlaps the blocked part of this obstacle
    pub fn collides(&self, hitbox: &Hitbox) -> bool {
        let overlaps_horizontally = hitbox.right > self.x && hitbox.left < self.trailing_edge();
        let reaches_barrier = hitbox.top < self.gap_top || hitbox.bottom > self.gap_bottom;
        overlaps_horizontally && reaches_barrier
    }

    /// Midpoint of the opening
    pub fn gap_center(&self) -> f64 {
        (self.gap_top + self.gap_bottom) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(x: f64) -> Obstacle {
        Obstacle {
            x,
            width: 60.0,
            gap_top: 200.0,
            gap_bottom: 380.0,
            scored: false,
        }
    }

    #[test]
    fn test_gravity_integration() {
        let mut bird = Bird::new(&GameConfig::default());
        bird.integrate(0.2);
        bird.integrate(0.2);
        assert!((bird.velocity - 0.4).abs() < 1e-9);
        assert!((bird.y - (300.0 + 0.2 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn test_shrunk_hitbox_is_forgiving() {
        // The sprite pokes 5px into the top barrier, the hitbox stays clear.
        let bird = Bird { x: 100.0, y: 195.0, velocity: 0.0, size: 40.0 };
        let hitbox = bird.hitbox(0.2);
        assert_eq!(hitbox.top, 203.0);
        assert!(!obstacle(90.0).collides(&hitbox));

        let higher = Bird { y: 180.0, ..bird }.hitbox(0.2);
        assert!(obstacle(90.0).collides(&higher));

        let lower = Bird { y: 360.0, ..bird }.hitbox(0.2);
        assert!(obstacle(90.0).collides(&lower));
    }

    #[test]
    fn test_no_collision_when_horizontally_clear() {
        let bird = Bird { x: 100.0, y: 0.0, velocity: 0.0, size: 40.0 };
        assert!(!obstacle(200.0).collides(&bird.hitbox(0.2)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bird = Bird::new(&GameConfig::default());
        bird.y = 561.0;
        assert!(bird.out_of_bounds(600.0));
        bird.y = -0.5;
        assert!(bird.out_of_bounds(600.0));
        bird.y = 0.0;
        assert!(!bird.out_of_bounds(600.0));
    }
}
