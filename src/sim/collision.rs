//! Collision predicates for the ball against the playfield
//!
//! Everything here is a pure function of bounding boxes and positions. The
//! tick decides what a contact does to score, lives, and sound.

use glam::Vec3;

use super::placement::Aabb;

/// Side wall the ball is pressing into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallContact {
    Left,
    Right,
}

/// Check the ball against the side walls
///
/// The left wall wins when both overlap; a missing wall is never hit.
pub fn wall_contact(ball: &Aabb, left: Option<&Aabb>, right: Option<&Aabb>) -> Option<WallContact> {
    if left.is_some_and(|wall| ball.min.x < wall.max.x) {
        Some(WallContact::Left)
    } else if right.is_some_and(|wall| ball.max.x > wall.min.x) {
        Some(WallContact::Right)
    } else {
        None
    }
}

/// Point the horizontal component away from the wall
pub fn bounce_off_wall(direction: Vec3, contact: WallContact) -> Vec3 {
    let x = direction.x.abs();
    match contact {
        WallContact::Left => Vec3::new(x, direction.y, direction.z),
        WallContact::Right => Vec3::new(-x, direction.y, direction.z),
    }
}

/// True if the ball is heading into the wall it touches
pub fn heading_into_wall(direction: Vec3, contact: WallContact) -> bool {
    match contact {
        WallContact::Left => direction.x < 0.0,
        WallContact::Right => direction.x > 0.0,
    }
}

pub fn hits_ceiling(ball: &Aabb, ceiling: &Aabb) -> bool {
    ball.max.y > ceiling.min.y
}

/// Outcome of the ball reaching the paddle plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleJudgment {
    /// Ball still above the paddle
    Above,
    /// Horizontally within the catch window
    Catch,
    /// Outside the window but not yet past the drop height
    Falling,
    /// Outside the window and at or below the drop height
    Miss,
}

/// Judge the ball center against the paddle center
///
/// Only meaningful once the ball is at or below the paddle; the window
/// edge counts as a catch.
pub fn judge_paddle_plane(ball: Vec3, paddle: Vec3, half_width: f32, drop_height: f32) -> PaddleJudgment {
    if ball.y > paddle.y {
        PaddleJudgment::Above
    } else if (ball.x - paddle.x).abs() <= half_width {
        PaddleJudgment::Catch
    } else if ball.y <= drop_height {
        PaddleJudgment::Miss
    } else {
        PaddleJudgment::Falling
    }
}

/// Ball striking a block (caller checks that the ball is rising)
pub fn hits_block(ball: &Aabb, block: &Aabb) -> bool {
    ball.overlaps_xy(block)
}

/// Range of paddle x translations that keep it between the walls
///
/// `local` is the paddle box relative to its translation. When the gap is
/// narrower than the paddle the range is inverted; see [`clamp_paddle`].
pub fn paddle_limits(local: &Aabb, left: &Aabb, right: &Aabb) -> (f32, f32) {
    (left.max.x - local.min.x, right.min.x - local.max.x)
}

pub fn clamp_paddle(x: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        x.max(lo).min(hi)
    }
}
