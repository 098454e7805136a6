//! Anvil Ascension entry point
//!
//! Headless driver: loads settings and the initial level, then lets the
//! autopilot play for the configured number of frames.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use anvil_ascension::audio::AudioManager;
    use anvil_ascension::consts::{STEP_DT, STEP_INTERVAL};
    use anvil_ascension::settings::{SETTINGS_FILE, Settings};
    use anvil_ascension::sim::{GameEvent, autopilot};
    use anvil_ascension::LevelController;

    env_logger::init();
    log::info!("Anvil Ascension (native) starting...");

    let settings = Settings::load(SETTINGS_FILE);
    let mut audio = AudioManager::new(&settings);

    let mut controller = match LevelController::new(&settings) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("Failed to load game level: {e}");
            std::process::exit(1);
        }
    };
    audio.play_music();

    let mut now = 0.0f64;
    let mut frames = 0u32;
    while frames < settings.demo_frames {
        let input = autopilot(controller.state());
        for event in controller.update(&input, now, STEP_DT) {
            match event {
                GameEvent::Sound(effect) => audio.play(effect),
                GameEvent::BlockDestroyed { name } => log::info!("{name} mined out"),
                GameEvent::LevelComplete | GameEvent::GameOver => log::info!("{event:?}"),
                _ => log::debug!("{event:?}"),
            }
        }

        if controller.state().phase().is_terminal() && controller.state().blocks_remaining() == 0 {
            break;
        }
        now += STEP_INTERVAL;
        frames += 1;
    }

    audio.stop_music();
    let state = controller.state();
    log::info!(
        "Demo finished after {frames} frames: phase {:?}, score {}, highscore {}, lives {:?}, blocks left {}, cues {}",
        state.phase(),
        state.score,
        state.highscore,
        state.lives(),
        state.blocks_remaining(),
        audio.played()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host for the headless driver
}
