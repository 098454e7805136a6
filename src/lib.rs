//! Anvil Ascension - an anvil-and-ore brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ECS world, collisions, game state)
//! - `level`: Level text parsing and the per-level geometry table
//! - `controller`: Level switching with all-or-nothing swaps
//! - `audio`: Fire-and-forget sound cues
//! - `settings` / `tuning`: JSON configuration and data-driven balance

pub mod audio;
pub mod controller;
pub mod error;
pub mod input;
pub mod level;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use controller::{LevelController, LevelSlot};
pub use error::{LevelError, WorldError};
pub use input::{InputSnapshot, Key};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Minimum wall-clock time between accepted simulation steps (60 Hz)
    pub const STEP_INTERVAL: f64 = 1.0 / 60.0;
    /// Delta fed to each accepted step by the frame driver
    pub const STEP_DT: f32 = 0.1;

    /// Ball direction right after launch (and after every drop/reset)
    pub const LAUNCH_DIRECTION: Vec3 = Vec3::new(0.30, 1.0, 0.0);
    /// Linear pull applied to direction.y per unit of dt
    pub const GRAVITY: f32 = -0.01;
    /// Height of a docked ball above the paddle origin
    pub const DOCK_OFFSET: f32 = 0.25;

    /// Paddle displacement per unit of key value per unit of dt
    pub const PADDLE_SPEED: f32 = 1.0;
    /// Horizontal catch window either side of the paddle origin
    pub const PADDLE_CATCH_HALF_WIDTH: f32 = 0.40;
    /// Height at or below which an uncaught ball is lost
    pub const DROP_HEIGHT: f32 = 0.90;

    pub const STARTING_LIVES: i32 = 4;
    pub const BALL_DAMAGE: i32 = 1;

    /// Score for bouncing the ball off the paddle
    pub const PADDLE_CATCH_SCORE: u64 = 100;
    pub const DIRT_HIT_SCORE: u64 = 50;
    pub const DIRT_DESTROY_SCORE: u64 = 200;
    pub const GOLD_HIT_SCORE: u64 = 100;
    pub const GOLD_DESTROY_SCORE: u64 = 1000;
}

/// Well-known entity names the gameplay loop addresses
pub mod names {
    pub const PLAYER: &str = "Player";
    pub const BALL: &str = "Ball";
    pub const LEFT_WALL: &str = "L_Wall";
    pub const RIGHT_WALL: &str = "R_Wall";
    pub const CEILING: &str = "Ceiling";
    pub const FLOOR: &str = "Floor";
}

/// Strip a Blender-style duplicate suffix (`Dirt.001` -> `Dirt`)
#[inline]
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}
