//! Level transitions
//!
//! Owns the active level geometry and game state. A switch key loads the
//! target level first and only swaps both once it loaded cleanly, so a bad
//! file leaves the running game untouched.

use std::path::PathBuf;

use crate::error::LevelError;
use crate::input::{InputSnapshot, Key};
use crate::level::LevelGeometry;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, update};
use crate::tuning::Tuning;

/// Level files the game ships
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSlot {
    /// Loaded at startup (F1)
    Initial,
    /// F2
    Alternate,
}

impl LevelSlot {
    pub fn file_name(self) -> &'static str {
        match self {
            LevelSlot::Initial => "GameLevel_1.txt",
            LevelSlot::Alternate => "GameLevel.txt",
        }
    }
}

/// Switch keys in priority order
pub const LEVEL_KEYS: [(Key, LevelSlot); 2] = [
    (Key::LoadInitialLevel, LevelSlot::Initial),
    (Key::LoadAlternateLevel, LevelSlot::Alternate),
];

#[derive(Debug)]
pub struct LevelController {
    levels_dir: PathBuf,
    models_dir: PathBuf,
    tuning: Tuning,
    slot: LevelSlot,
    geometry: LevelGeometry,
    state: GameState,
    previous_input: InputSnapshot,
}

impl LevelController {
    /// Load the initial level; failure here is fatal to the caller
    pub fn new(settings: &Settings) -> Result<Self, LevelError> {
        let slot = LevelSlot::Initial;
        let path = settings.levels_dir.join(slot.file_name());
        let geometry = LevelGeometry::load(&path, &settings.models_dir)?;
        Ok(Self::with_level(settings, slot, geometry))
    }

    /// Start from an already loaded level
    pub fn with_level(settings: &Settings, slot: LevelSlot, geometry: LevelGeometry) -> Self {
        let state = GameState::new(&geometry, settings.tuning.clone());
        Self {
            levels_dir: settings.levels_dir.clone(),
            models_dir: settings.models_dir.clone(),
            tuning: settings.tuning.clone(),
            slot,
            geometry,
            state,
            previous_input: InputSnapshot::new(),
        }
    }

    pub fn level_path(&self, slot: LevelSlot) -> PathBuf {
        self.levels_dir.join(slot.file_name())
    }

    pub fn slot(&self) -> LevelSlot {
        self.slot
    }

    pub fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Replace the active level with `slot`
    ///
    /// The new level is fully loaded before anything is replaced; on error
    /// the previous geometry and state stay in place.
    pub fn change_level(&mut self, slot: LevelSlot) -> Result<(), LevelError> {
        let path = self.level_path(slot);
        log::info!("Changing level to {slot:?} ({})", path.display());

        let geometry = match LevelGeometry::load(&path, &self.models_dir) {
            Ok(geometry) => geometry,
            Err(e) => {
                log::error!("Failed to load new level: {e}");
                return Err(e);
            }
        };

        self.state = GameState::new(&geometry, self.tuning.clone());
        self.geometry = geometry;
        self.slot = slot;
        Ok(())
    }

    /// Switch levels on the press of a switch key
    ///
    /// Returns `None` when no switch was requested this step.
    pub fn check_for_level_change(&mut self, input: &InputSnapshot) -> Option<Result<(), LevelError>> {
        let pressed = LEVEL_KEYS
            .iter()
            .find(|(key, _)| input.held(*key) && !self.previous_input.held(*key))
            .map(|(_, slot)| *slot);
        self.previous_input = *input;

        pressed.map(|slot| self.change_level(slot))
    }

    /// Per-frame entry point: level switching, then the throttled gameplay step
    pub fn update(&mut self, input: &InputSnapshot, now: f64, dt: f32) -> Vec<GameEvent> {
        // A failed switch is already logged and the old level keeps running
        let _ = self.check_for_level_change(input);
        update(&mut self.state, input, now, dt)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::consts::STEP_DT;
    use crate::sim::{BallState, Phase};

    fn mesh(name: &str, x: f32, y: f32, half: (f32, f32)) -> String {
        let (hx, hy) = half;
        let mut text = format!(
            "MESH\n{name}\n<Matrix 4x4 (1.0000, 0.0000, 0.0000, 0.0000)\n\
             (0.0000, 1.0000, 0.0000, 0.0000)\n\
             (0.0000, 0.0000, 1.0000, 0.0000)\n\
             ({x:.4}, {y:.4}, 0.0000, 1.0000)>\n"
        );
        for (sx, sy, sz) in [
            (-1.0, -1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, 1.0, 1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (1.0, 1.0, 1.0),
            (1.0, -1.0, 1.0),
        ] {
            text.push_str(&format!(
                "<Vector ({:.4}, {:.4}, {:.4})>\n",
                sx * hx,
                sy * hy,
                sz * 0.1
            ));
        }
        text
    }

    fn level_text(blocks: &[&str]) -> String {
        let mut text = String::new();
        text.push_str(&mesh("L_Wall", -3.25, 3.0, (0.25, 4.0)));
        text.push_str(&mesh("R_Wall", 3.25, 3.0, (0.25, 4.0)));
        text.push_str(&mesh("Player", 0.0, 1.0, (0.4, 0.1)));
        text.push_str(&mesh("Ball", 0.0, 1.25, (0.1, 0.1)));
        for (i, name) in blocks.iter().enumerate() {
            text.push_str(&mesh(name, -2.0 + i as f32, 5.0, (0.3, 0.15)));
        }
        text
    }

    fn settings(dir: &Path) -> Settings {
        Settings {
            levels_dir: dir.to_path_buf(),
            models_dir: dir.join("Models"),
            ..Settings::default()
        }
    }

    fn write_levels(dir: &Path) {
        std::fs::write(dir.join("GameLevel_1.txt"), level_text(&["Dirt", "Gold"])).unwrap();
        std::fs::write(dir.join("GameLevel.txt"), level_text(&["Ruby", "Tin", "Emerald"])).unwrap();
    }

    #[test]
    fn test_starts_on_initial_level() {
        let dir = tempfile::tempdir().unwrap();
        write_levels(dir.path());

        let controller = LevelController::new(&settings(dir.path())).unwrap();
        assert_eq!(controller.slot(), LevelSlot::Initial);
        assert_eq!(controller.state().blocks_remaining(), 2);
        assert_eq!(controller.geometry().len(), 6);
    }

    #[test]
    fn test_shipped_levels_load() {
        let mut controller = LevelController::new(&Settings::default()).unwrap();
        for slot in [LevelSlot::Alternate, LevelSlot::Initial] {
            controller.change_level(slot).unwrap();
            let state = controller.state();
            assert!(state.handles.player.is_some());
            assert!(state.handles.ball.is_some());
            assert!(state.handles.floor.is_some());
            assert!(state.blocks_remaining() > 0);
            assert!(controller.geometry().sun().is_some());
        }
    }

    #[test]
    fn test_missing_initial_level_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LevelController::new(&settings(dir.path())),
            Err(LevelError::Io { .. })
        ));
    }

    #[test]
    fn test_switch_key_rebuilds_world() {
        let dir = tempfile::tempdir().unwrap();
        write_levels(dir.path());
        let mut controller = LevelController::new(&settings(dir.path())).unwrap();

        controller.update(&InputSnapshot::holding(&[Key::Fire]), 0.0, STEP_DT);
        controller.state_mut().score = 300;
        assert_eq!(controller.state().ball_state(), BallState::Launched);

        let f2 = InputSnapshot::holding(&[Key::LoadAlternateLevel]);
        controller.update(&f2, 1.0, STEP_DT);
        assert_eq!(controller.slot(), LevelSlot::Alternate);
        assert_eq!(controller.state().blocks_remaining(), 3);
        assert_eq!(controller.state().score, 0);
        assert_eq!(controller.state().ball_state(), BallState::Docked);
        assert_eq!(controller.state().lives(), Some(4));
    }

    #[test]
    fn test_switch_is_edge_triggered() {
        let dir = tempfile::tempdir().unwrap();
        write_levels(dir.path());
        let mut controller = LevelController::new(&settings(dir.path())).unwrap();

        let f2 = InputSnapshot::holding(&[Key::LoadAlternateLevel]);
        assert!(controller.check_for_level_change(&f2).is_some());
        controller.state_mut().score = 42;

        // Still held: no reload
        assert!(controller.check_for_level_change(&f2).is_none());
        assert_eq!(controller.state().score, 42);

        // Both pressed at once: the initial level wins
        controller.check_for_level_change(&InputSnapshot::new());
        let both = InputSnapshot::holding(&[Key::LoadInitialLevel, Key::LoadAlternateLevel]);
        controller.check_for_level_change(&both);
        assert_eq!(controller.slot(), LevelSlot::Initial);
    }

    #[test]
    fn test_failed_load_keeps_current_level() {
        let dir = tempfile::tempdir().unwrap();
        write_levels(dir.path());
        let mut controller = LevelController::new(&settings(dir.path())).unwrap();
        controller.state_mut().score = 1234;

        std::fs::write(dir.path().join("GameLevel.txt"), "MESH\nBroken\n<Matrix 4x4 (1, 2)\n").unwrap();
        let result = controller.change_level(LevelSlot::Alternate);
        assert!(matches!(result, Err(LevelError::Parse { .. })));
        assert_eq!(controller.slot(), LevelSlot::Initial);
        assert_eq!(controller.state().score, 1234);
        assert_eq!(controller.state().blocks_remaining(), 2);

        std::fs::remove_file(dir.path().join("GameLevel.txt")).unwrap();
        assert!(matches!(
            controller.change_level(LevelSlot::Alternate),
            Err(LevelError::Io { .. })
        ));
        assert_eq!(controller.state().phase(), Phase::Running);
        assert_eq!(controller.geometry().len(), 6);
    }
}
