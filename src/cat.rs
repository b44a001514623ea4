//! The player character.

use crate::config::CatConfig;

/// Rotation never leaves `[-MAX_ROTATION, MAX_ROTATION]` radians.
pub const MAX_ROTATION: f64 = 0.5;
/// Velocity is divided by this to get the tilt.
const ROTATION_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Cat {
    /// Left edge; fixed for the whole game.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Positive = falling.
    pub velocity: f64,
    pub rotation: f64,
    start_y: f64,
    gravity: f64,
    flap_impulse: f64,
}

impl Cat {
    pub fn new(config: &CatConfig) -> Self {
        Self {
            x: config.x,
            y: config.start_y,
            w: config.width,
            h: config.height,
            velocity: 0.0,
            rotation: 0.0,
            start_y: config.start_y,
            gravity: config.gravity,
            flap_impulse: config.flap_impulse,
        }
    }

    /// Overrides the current velocity with the upward impulse.
    pub fn flap(&mut self) {
        self.velocity = self.flap_impulse;
    }

    /// One tick of free fall. There is no terminal velocity.
    pub fn update(&mut self) {
        self.velocity += self.gravity;
        self.y += self.velocity;
        self.rotation = (self.velocity / ROTATION_DIVISOR).clamp(-MAX_ROTATION, MAX_ROTATION);
    }

    pub fn reset(&mut self) {
        self.y = self.start_y;
        self.velocity = 0.0;
        self.rotation = 0.0;
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}
