//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time and step delta only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio, or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod placement;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::autopilot;
pub use collision::{PaddleJudgment, WallContact, judge_paddle_plane, wall_contact};
pub use placement::{Aabb, Placement};
pub use state::{
    BallState, BlockClass, BlockKind, GameEvent, GameState, Handles, Phase, SimState, Transition,
};
pub use tick::{Throttle, TickInput, tick, update};
pub use world::{Component, Damage, EntityId, Health, Lives, Velocity, World};
