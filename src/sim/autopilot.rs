//! Idle/demo mode: synthesizes input so the game plays itself

use super::state::{BallState, GameState, Phase};
use super::tick::TickInput;
use crate::input::Key;

/// Horizontal error the autopilot tolerates before steering
const DEADZONE: f32 = 0.02;

/// Build the input for the next step from the current state
///
/// Fires whenever the ball is docked, resets after a game over, and otherwise
/// steers the paddle under the ball.
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::new();

    match state.phase() {
        Phase::Dead => {
            input.set(Key::Reset, 1.0);
            return input;
        }
        Phase::LevelComplete => return input,
        Phase::Running | Phase::Paused => {}
    }

    if state.ball_state() == BallState::Docked {
        input.set(Key::Fire, 1.0);
        return input;
    }

    let (Some(ball), Some(paddle)) = (state.ball(), state.paddle()) else {
        return input;
    };

    // Oscillating offset so the ball does not settle into a perfect loop
    let time_factor = state.time_ticks as f32 * 0.01;
    let half_width = state.tuning.paddle_catch_half_width;
    let offset = (time_factor.sin() * 0.4 + (time_factor * 0.7).sin() * 0.2) * half_width;

    let error = ball.translation().x + offset - paddle.translation().x;
    if error > DEADZONE {
        input.set(Key::Right, (error * 10.0).min(1.0));
    } else if error < -DEADZONE {
        input.set(Key::Left, (-error * 10.0).min(1.0));
    }

    input
}
