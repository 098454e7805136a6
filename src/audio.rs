//! Audio cues
//!
//! The simulation never plays sound itself; it emits [`SoundEffect`] cues
//! inside its events and the frame driver forwards them here. Playback is
//! fire-and-forget: nothing is awaited and nothing is returned.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball launched off the anvil
    Launch,
    /// Ball hits a wall or the ceiling
    WallBounce,
    /// Ball bounces off the anvil
    PaddleBounce,
    /// Ball hits a dirt-class block
    DirtBounce,
    /// Ball hits a gold-class block
    GoldBounce,
    /// Block broken
    BlockDestroyed,
    /// Last life lost
    GameOver,
}

impl SoundEffect {
    /// Clip file and base gain for this cue
    pub fn clip(self) -> (&'static str, f32) {
        match self {
            SoundEffect::Launch => ("SoundFX/LaunchBall.wav", 0.35),
            SoundEffect::WallBounce => ("SoundFX/RockHittingDirt.wav", 0.35),
            SoundEffect::PaddleBounce => ("SoundFX/anvilhit.wav", 0.15),
            SoundEffect::DirtBounce => ("SoundFX/RockHittingDirt.wav", 0.35),
            SoundEffect::GoldBounce => ("SoundFX/GoldHit.wav", 0.35),
            SoundEffect::BlockDestroyed => ("SoundFX/GoldFalling.wav", 0.35),
            SoundEffect::GameOver => ("SoundFX/GameOver.wav", 0.35),
        }
    }
}

/// Looping background track
pub const BACKGROUND_MUSIC: (&str, f32) = ("Music/Background.wav", 0.50);

/// Audio manager for the game
///
/// There is no output device behind this: cues are logged and counted so a
/// host with a real mixer can take over the same call sites.
#[derive(Debug)]
pub struct AudioManager {
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
    played: u64,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            music_playing: false,
            played: 0,
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        let (clip, gain) = effect.clip();
        self.played += 1;
        log::debug!("sfx {effect:?} -> {clip} @ {:.2}", gain * self.sfx_volume);
    }

    /// Start the background track (no-op if already playing)
    pub fn play_music(&mut self) {
        if self.music_playing || self.music_volume <= 0.0 {
            return;
        }
        let (clip, gain) = BACKGROUND_MUSIC;
        self.music_playing = true;
        log::info!("music {clip} @ {:.2} (looping)", gain * self.music_volume);
    }

    pub fn stop_music(&mut self) {
        self.music_playing = false;
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Number of cues that reached the mixer
    pub fn played(&self) -> u64 {
        self.played
    }
}
