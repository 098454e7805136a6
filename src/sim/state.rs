//! Game state and core simulation types
//!
//! [`GameState`] is the whole simulation context: the entity world seeded
//! from a level, the cached handles into it, the ball direction, and the
//! score. It is passed explicitly to every step function.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::placement::Placement;
use super::tick::Throttle;
use super::world::{Damage, EntityId, Health, Lives, Velocity, World};
use crate::audio::SoundEffect;
use crate::consts::{BALL_DAMAGE, STEP_INTERVAL};
use crate::level::LevelGeometry;
use crate::names;
use crate::tuning::Tuning;

/// Top-level phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Simulation advancing
    Running,
    /// Escape held
    Paused,
    /// Out of lives; only Reset is honored
    Dead,
    /// No blocks left; only Reset is honored
    LevelComplete,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Dead | Phase::LevelComplete)
    }
}

/// Ball sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Riding on the paddle, waiting for Fire
    Docked,
    /// Moving on its own
    Launched,
}

/// Everything that can move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pause,
    Resume,
    Fire,
    /// Ball fell past the paddle
    Drop,
    LivesDepleted,
    BlocksCleared,
    Reset { blocks_remaining: bool },
}

/// Combined phase and ball state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimState {
    pub phase: Phase,
    pub ball: BallState,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            phase: Phase::Running,
            ball: BallState::Docked,
        }
    }
}

impl SimState {
    /// The single transition function; inputs that do not apply leave the
    /// state unchanged
    pub fn transition(self, transition: Transition) -> Self {
        use BallState::*;
        use Phase::*;

        match (self.phase, self.ball, transition) {
            (Running, _, Transition::Pause) => Self { phase: Paused, ..self },
            (Paused, _, Transition::Resume) => Self { phase: Running, ..self },
            (Running, Docked, Transition::Fire) => Self { ball: Launched, ..self },
            (Running, Launched, Transition::Drop) => Self { ball: Docked, ..self },
            (Running | Paused, _, Transition::LivesDepleted) => Self { phase: Dead, ..self },
            (Running, _, Transition::BlocksCleared) => Self {
                phase: LevelComplete,
                ..self
            },
            (_, _, Transition::Reset { blocks_remaining }) => Self {
                phase: if blocks_remaining { Running } else { LevelComplete },
                ball: Docked,
            },
            _ => self,
        }
    }
}

/// Ore kinds, recognized by object name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Dirt,
    Tin,
    Gold,
    Emerald,
    Ruby,
    Moonstone,
}

/// Scoring and sound family of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockClass {
    Dirt,
    Gold,
}

impl BlockKind {
    const PREFIXES: [(&'static str, BlockKind); 6] = [
        ("Dirt", BlockKind::Dirt),
        ("Tin", BlockKind::Tin),
        ("Gold", BlockKind::Gold),
        ("Emerald", BlockKind::Emerald),
        ("Ruby", BlockKind::Ruby),
        ("Moonstone", BlockKind::Moonstone),
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }

    pub fn class(self) -> BlockClass {
        match self {
            BlockKind::Dirt | BlockKind::Tin => BlockClass::Dirt,
            BlockKind::Gold | BlockKind::Emerald | BlockKind::Ruby | BlockKind::Moonstone => {
                BlockClass::Gold
            }
        }
    }

    pub fn starting_health(self) -> i32 {
        match self {
            BlockKind::Ruby | BlockKind::Moonstone => 3,
            _ => 2,
        }
    }
}

impl BlockClass {
    pub fn hit_sound(self) -> SoundEffect {
        match self {
            BlockClass::Dirt => SoundEffect::DirtBounce,
            BlockClass::Gold => SoundEffect::GoldBounce,
        }
    }

    pub fn hit_score(self, tuning: &Tuning) -> u64 {
        match self {
            BlockClass::Dirt => tuning.dirt_hit_score,
            BlockClass::Gold => tuning.gold_hit_score,
        }
    }

    pub fn destroy_score(self, tuning: &Tuning) -> u64 {
        match self {
            BlockClass::Dirt => tuning.dirt_destroy_score,
            BlockClass::Gold => tuning.gold_destroy_score,
        }
    }
}

/// Side effects of a step, drained by the frame driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Fire-and-forget audio cue
    Sound(SoundEffect),
    Launched,
    LifeLost { remaining: i32 },
    BlockHit { name: String, health: i32 },
    BlockDestroyed { name: String },
    LevelComplete,
    GameOver,
    Reset,
}

/// Entities the loop addresses by role, resolved once per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Handles {
    pub player: Option<EntityId>,
    pub ball: Option<EntityId>,
    pub left_wall: Option<EntityId>,
    pub right_wall: Option<EntityId>,
    pub ceiling: Option<EntityId>,
    pub floor: Option<EntityId>,
}

impl Handles {
    pub fn resolve(world: &World) -> Self {
        Self {
            player: world.lookup(names::PLAYER),
            ball: world.lookup(names::BALL),
            left_wall: world.lookup(names::LEFT_WALL),
            right_wall: world.lookup(names::RIGHT_WALL),
            ceiling: world.lookup(names::CEILING),
            floor: world.lookup(names::FLOOR),
        }
    }
}

/// Complete simulation context for one loaded level
#[derive(Debug)]
pub struct GameState {
    pub world: World,
    pub handles: Handles,
    pub sim: SimState,
    /// Ball travel direction; z unused
    pub ball_direction: Vec3,
    pub score: u64,
    pub highscore: u64,
    pub tuning: Tuning,
    /// Simulated (not throttled-away) steps
    pub time_ticks: u64,
    pub(crate) throttle: Throttle,
}

impl GameState {
    /// Seed a fresh world from the level geometry table
    pub fn new(level: &LevelGeometry, tuning: Tuning) -> Self {
        let mut world = World::new();

        for object in level.objects() {
            let id = match world.spawn(object.name.as_str()) {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("Skipping level object: {e}");
                    continue;
                }
            };

            world.insert(
                id,
                Placement::new(object.transform, object.transform_index, object.world_bounds()),
            );

            if let Some(kind) = BlockKind::from_name(&object.name) {
                world.insert(id, kind);
                world.insert(id, Health(kind.starting_health()));
            } else if object.name == names::BALL {
                world.insert(id, Damage(BALL_DAMAGE));
                world.insert(id, Velocity(Vec3::ZERO));
            } else if object.name == names::PLAYER {
                world.insert(id, Lives(tuning.starting_lives));
            }
        }

        for (id, _) in world.query::<Lives>() {
            if let (Some(name), Some(placement)) = (world.name(id), world.get::<Placement>(id)) {
                let p = placement.translation();
                log::info!("Entity {name} located at X {} Y {} Z {}", p.x, p.y, p.z);
            }
        }

        let handles = Handles::resolve(&world);
        if handles.player.is_none() || handles.ball.is_none() {
            log::warn!("Level has no Player or Ball; dependent gameplay is skipped");
        }
        log::debug!(
            "Seeded {} entities ({} blocks)",
            world.len(),
            world.count::<BlockKind>()
        );

        Self {
            world,
            handles,
            sim: SimState::default(),
            ball_direction: tuning.launch_direction,
            score: 0,
            highscore: 0,
            tuning,
            time_ticks: 0,
            throttle: Throttle::new(STEP_INTERVAL),
        }
    }

    pub fn phase(&self) -> Phase {
        self.sim.phase
    }

    pub fn ball_state(&self) -> BallState {
        self.sim.ball
    }

    pub fn lives(&self) -> Option<i32> {
        self.handles
            .player
            .and_then(|id| self.world.get::<Lives>(id))
            .map(|l| l.0)
    }

    pub fn placement(&self, id: Option<EntityId>) -> Option<&Placement> {
        id.and_then(|id| self.world.get::<Placement>(id))
    }

    pub fn paddle(&self) -> Option<&Placement> {
        self.placement(self.handles.player)
    }

    pub fn ball(&self) -> Option<&Placement> {
        self.placement(self.handles.ball)
    }

    pub fn blocks_remaining(&self) -> usize {
        self.world.count::<BlockKind>()
    }

    /// Bank the score into the high score and re-arm the launch vector
    pub fn reset_ball(&mut self) {
        if self.score > self.highscore {
            self.highscore = self.score;
        }
        self.score = 0;
        self.ball_direction = self.tuning.launch_direction;
    }

    /// Full reset: ball, lives, and the terminal phase
    pub fn reset_game(&mut self) -> GameEvent {
        self.reset_ball();
        if let Some(player) = self.handles.player {
            self.world.insert(player, Lives(self.tuning.starting_lives));
        }
        self.sim = self.sim.transition(Transition::Reset {
            blocks_remaining: self.blocks_remaining() > 0,
        });
        self.dock_ball();
        log::info!(
            "Game reset (highscore {}, phase {:?})",
            self.highscore,
            self.sim.phase
        );
        GameEvent::Reset
    }

    /// Slave the ball to the paddle
    pub(crate) fn dock_ball(&mut self) {
        let Some(paddle) = self.paddle().map(Placement::translation) else {
            return;
        };
        let offset = Vec3::new(0.0, self.tuning.dock_offset, 0.0);
        if let Some(ball) = self.handles.ball.and_then(|id| self.world.get_mut::<Placement>(id)) {
            ball.set_translation(paddle + offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(phase: Phase, ball: BallState) -> SimState {
        SimState { phase, ball }
    }

    #[test]
    fn test_fire_only_from_running_docked() {
        let s = SimState::default().transition(Transition::Fire);
        assert_eq!(s, state(Phase::Running, BallState::Launched));
        // Firing again changes nothing
        assert_eq!(s.transition(Transition::Fire), s);

        let paused = state(Phase::Paused, BallState::Docked);
        assert_eq!(paused.transition(Transition::Fire), paused);
    }

    #[test]
    fn test_only_drop_or_reset_docks() {
        let launched = state(Phase::Running, BallState::Launched);
        for t in [
            Transition::Fire,
            Transition::Pause,
            Transition::Resume,
            Transition::BlocksCleared,
            Transition::LivesDepleted,
        ] {
            assert_eq!(launched.transition(t).ball, BallState::Launched, "{t:?}");
        }
        assert_eq!(launched.transition(Transition::Drop).ball, BallState::Docked);
        assert_eq!(
            launched
                .transition(Transition::Reset { blocks_remaining: true })
                .ball,
            BallState::Docked
        );
    }

    #[test]
    fn test_pause_and_resume() {
        let s = SimState::default().transition(Transition::Pause);
        assert_eq!(s.phase, Phase::Paused);
        assert_eq!(s.transition(Transition::Resume).phase, Phase::Running);

        let dead = state(Phase::Dead, BallState::Docked);
        assert_eq!(dead.transition(Transition::Pause), dead);
        assert_eq!(dead.transition(Transition::Resume), dead);
    }

    #[test]
    fn test_terminal_phases() {
        let dead = SimState::default().transition(Transition::LivesDepleted);
        assert!(dead.phase.is_terminal());
        assert_eq!(
            dead.transition(Transition::Reset { blocks_remaining: true }).phase,
            Phase::Running
        );

        let complete = state(Phase::Running, BallState::Launched).transition(Transition::BlocksCleared);
        assert_eq!(complete.phase, Phase::LevelComplete);
        assert_eq!(complete.transition(Transition::Fire), complete);
        assert_eq!(
            complete
                .transition(Transition::Reset { blocks_remaining: false })
                .phase,
            Phase::LevelComplete
        );
    }

    #[test]
    fn test_block_kind_from_name() {
        assert_eq!(BlockKind::from_name("Dirt"), Some(BlockKind::Dirt));
        assert_eq!(BlockKind::from_name("Gold.003"), Some(BlockKind::Gold));
        assert_eq!(BlockKind::from_name("Moonstone.001"), Some(BlockKind::Moonstone));
        assert_eq!(BlockKind::from_name("Player"), None);
        assert_eq!(BlockKind::from_name("L_Wall"), None);

        assert_eq!(BlockKind::Tin.class(), BlockClass::Dirt);
        assert_eq!(BlockKind::Ruby.class(), BlockClass::Gold);
        assert_eq!(BlockKind::Ruby.starting_health(), 3);
        assert_eq!(BlockKind::Emerald.starting_health(), 2);
    }
}
