//! Fixed timestep simulation tick
//!
//! Core game loop: paddle and ball motion, collision response, score and
//! lives. [`update`] gates [`tick`] to the step interval.

use glam::Vec3;

use super::collision::{
    PaddleJudgment, bounce_off_wall, clamp_paddle, heading_into_wall, hits_block, hits_ceiling,
    judge_paddle_plane, paddle_limits, wall_contact,
};
use super::placement::{Aabb, Placement};
use super::state::{BallState, BlockKind, GameEvent, GameState, Transition};
use super::world::{EntityId, Health, Lives, Velocity};
use crate::audio::SoundEffect;
use crate::input::{InputSnapshot, Key};

/// Input commands for a single tick
pub type TickInput = InputSnapshot;

/// Minimum-interval gate on wall-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    min_interval: f64,
    last: Option<f64>,
}

impl Throttle {
    /// Tolerance for timestamps accumulated in f64 landing just short of the interval
    const SLACK: f64 = 1e-9;

    pub fn new(min_interval: f64) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Accept `now` if the interval has elapsed since the last accepted call
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last + Self::SLACK < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Throttled step: a no-op if called again within the step interval
pub fn update(state: &mut GameState, input: &TickInput, now: f64, dt: f32) -> Vec<GameEvent> {
    if !state.throttle.ready(now) {
        return Vec::new();
    }
    tick(state, input, dt)
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let escape = input.held(Key::Escape);

    // Paused or terminal: only Reset gets through
    if escape || state.sim.phase.is_terminal() {
        if input.held(Key::Reset) {
            events.push(state.reset_game());
        }
        if escape {
            state.sim = state.sim.transition(Transition::Pause);
        }
        return events;
    }
    state.sim = state.sim.transition(Transition::Resume);
    state.time_ticks += 1;

    move_paddle(state, input.horizontal(), dt);

    match state.sim.ball {
        BallState::Docked => {
            state.dock_ball();
            if input.held(Key::Fire) {
                state.sim = state.sim.transition(Transition::Fire);
                state.ball_direction = state.tuning.launch_direction;
                events.push(GameEvent::Sound(SoundEffect::Launch));
                events.push(GameEvent::Launched);
            }
        }
        BallState::Launched => advance_ball(state, dt, &mut events),
    }

    if state.lives().is_some_and(|lives| lives <= 0) {
        let next = state.sim.transition(Transition::LivesDepleted);
        if next != state.sim {
            state.sim = next;
            log::info!("Game over (score {}, highscore {})", state.score, state.highscore);
            events.push(GameEvent::Sound(SoundEffect::GameOver));
            events.push(GameEvent::GameOver);
        }
    }

    if let Some(ball) = state.handles.ball {
        state.world.insert(ball, Velocity(state.ball_direction));
    }

    events
}

fn wall_bounds(state: &GameState) -> (Option<Aabb>, Option<Aabb>) {
    (
        state.placement(state.handles.left_wall).map(Placement::bounds),
        state.placement(state.handles.right_wall).map(Placement::bounds),
    )
}

fn move_paddle(state: &mut GameState, axis: f32, dt: f32) {
    let Some(paddle) = state.paddle().copied() else {
        log::trace!("no Player placement; paddle step skipped");
        return;
    };

    let mut position = paddle.translation();
    position.x += axis * state.tuning.paddle_speed * dt;

    if let (Some(left), Some(right)) = wall_bounds(state) {
        let (lo, hi) = paddle_limits(&paddle.local_bounds(), &left, &right);
        position.x = clamp_paddle(position.x, lo, hi);
    }

    if let Some(p) = state.handles.player.and_then(|id| state.world.get_mut::<Placement>(id)) {
        p.set_translation(position);
    }
}

fn advance_ball(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let Some(ball_id) = state.handles.ball else {
        log::trace!("no Ball entity; ball step skipped");
        return;
    };

    state.ball_direction.y += state.tuning.gravity * dt;
    let delta = Vec3::new(state.ball_direction.x * dt, state.ball_direction.y * dt, 0.0);
    let Some(placement) = state.world.get_mut::<Placement>(ball_id) else {
        log::trace!("no Ball placement; ball step skipped");
        return;
    };
    placement.translate(delta);
    let ball = *placement;
    let bounds = ball.bounds();

    bounce_off_walls(state, &bounds, events);
    bounce_off_ceiling(state, &bounds, events);
    if judge_paddle(state, ball.translation(), events) {
        strike_blocks(state, &bounds, events);
    }
}

fn bounce_off_walls(state: &mut GameState, ball: &Aabb, events: &mut Vec<GameEvent>) {
    let (left, right) = wall_bounds(state);
    if let Some(contact) = wall_contact(ball, left.as_ref(), right.as_ref()) {
        if heading_into_wall(state.ball_direction, contact) {
            events.push(GameEvent::Sound(SoundEffect::WallBounce));
        }
        state.ball_direction = bounce_off_wall(state.ball_direction, contact);
    }
}

fn bounce_off_ceiling(state: &mut GameState, ball: &Aabb, events: &mut Vec<GameEvent>) {
    let Some(ceiling) = state.placement(state.handles.ceiling).map(Placement::bounds) else {
        return;
    };
    if hits_ceiling(ball, &ceiling) {
        if state.ball_direction.y > 0.0 {
            events.push(GameEvent::Sound(SoundEffect::WallBounce));
        }
        state.ball_direction.y = -state.ball_direction.y.abs();
    }
}

/// Catch or drop at the paddle plane; false once the ball is docked again
fn judge_paddle(state: &mut GameState, ball: Vec3, events: &mut Vec<GameEvent>) -> bool {
    let Some(paddle) = state.paddle().map(Placement::translation) else {
        log::trace!("no Player placement; paddle judgment skipped");
        return true;
    };
    let half_width = state.tuning.paddle_catch_half_width;
    match judge_paddle_plane(ball, paddle, half_width, state.tuning.drop_height) {
        PaddleJudgment::Catch if state.ball_direction.y < 0.0 => {
            state.ball_direction.y = state.ball_direction.y.abs();
            state.score = state.score.saturating_add(state.tuning.paddle_catch_score);
            events.push(GameEvent::Sound(SoundEffect::PaddleBounce));
            true
        }
        PaddleJudgment::Miss => {
            drop_ball(state, events);
            false
        }
        _ => true,
    }
}

fn drop_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.ball_direction = state.tuning.launch_direction;
    state.sim = state.sim.transition(Transition::Drop);

    let lives = state.handles.player.and_then(|id| state.world.get_mut::<Lives>(id));
    if let Some(lives) = lives {
        lives.0 -= 1;
        let remaining = lives.0;
        log::info!("Ball dropped, {remaining} lives left");
        events.push(GameEvent::LifeLost { remaining });
    }

    state.dock_ball();
}

fn strike_blocks(state: &mut GameState, ball: &Aabb, events: &mut Vec<GameEvent>) {
    if state.ball_direction.y > 0.0 {
        let struck: Vec<(EntityId, BlockKind)> = state
            .world
            .query::<BlockKind>()
            .filter(|(id, _)| state.world.has::<Health>(*id))
            .filter(|(id, _)| {
                state
                    .world
                    .get::<Placement>(*id)
                    .is_some_and(|block| hits_block(ball, &block.bounds()))
            })
            .map(|(id, kind)| (id, *kind))
            .collect();

        for (id, kind) in struck {
            strike_block(state, id, kind, events);
        }
    }

    if state.blocks_remaining() == 0 {
        let next = state.sim.transition(Transition::BlocksCleared);
        if next != state.sim {
            state.sim = next;
            log::info!("Level complete (score {})", state.score);
            events.push(GameEvent::LevelComplete);
        }
    }
}

fn strike_block(state: &mut GameState, id: EntityId, kind: BlockKind, events: &mut Vec<GameEvent>) {
    let class = kind.class();
    state.ball_direction.y = -state.ball_direction.y.abs();
    state.score = state.score.saturating_add(class.hit_score(&state.tuning));
    events.push(GameEvent::Sound(class.hit_sound()));

    let Some(health) = state.world.get_mut::<Health>(id) else {
        return;
    };
    health.0 -= 1;
    let health = health.0;
    let name = state.world.name(id).unwrap_or_default().to_string();

    if health > 0 {
        log::debug!("{name} hit, {health} left");
        events.push(GameEvent::BlockHit { name, health });
        return;
    }

    state.world.despawn(id);
    state.score = state.score.saturating_add(class.destroy_score(&state.tuning));
    log::debug!("{name} destroyed");
    events.push(GameEvent::Sound(SoundEffect::BlockDestroyed));
    events.push(GameEvent::BlockDestroyed { name });
}
