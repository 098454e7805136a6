//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]; any field may be overridden from the
//! `tuning` section of the settings file.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub launch_direction: Vec3,
    pub gravity: f32,
    pub dock_offset: f32,
    pub paddle_speed: f32,
    pub paddle_catch_half_width: f32,
    /// A ball outside the catch window at or below this height is lost
    pub drop_height: f32,
    pub starting_lives: i32,
    pub paddle_catch_score: u64,
    pub dirt_hit_score: u64,
    pub dirt_destroy_score: u64,
    pub gold_hit_score: u64,
    pub gold_destroy_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            launch_direction: LAUNCH_DIRECTION,
            gravity: GRAVITY,
            dock_offset: DOCK_OFFSET,
            paddle_speed: PADDLE_SPEED,
            paddle_catch_half_width: PADDLE_CATCH_HALF_WIDTH,
            drop_height: DROP_HEIGHT,
            starting_lives: STARTING_LIVES,
            paddle_catch_score: PADDLE_CATCH_SCORE,
            dirt_hit_score: DIRT_HIT_SCORE,
            dirt_destroy_score: DIRT_DESTROY_SCORE,
            gold_hit_score: GOLD_HIT_SCORE,
            gold_destroy_score: GOLD_DESTROY_SCORE,
        }
    }
}
