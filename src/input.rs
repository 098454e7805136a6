//! Input snapshot consumed by the simulation
//!
//! The platform layer samples every logical key once per frame and hands the
//! result over as an [`InputSnapshot`]. Values are analog-capable (`0.0..=1.0`
//! for keys, anything for sticks); a key counts as held when its value is > 0.

use serde::{Deserialize, Serialize};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Move paddle left (A)
    Left,
    /// Move paddle right (D)
    Right,
    /// Launch the docked ball (Space)
    Fire,
    /// Pause while held (Escape)
    Escape,
    /// Reset after death or level completion (R)
    Reset,
    /// Switch to the initial level (F1)
    LoadInitialLevel,
    /// Switch to the alternate level (F2)
    LoadAlternateLevel,
}

impl Key {
    pub const COUNT: usize = 7;

    pub const ALL: [Key; Self::COUNT] = [
        Key::Left,
        Key::Right,
        Key::Fire,
        Key::Escape,
        Key::Reset,
        Key::LoadInitialLevel,
        Key::LoadAlternateLevel,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Channel values for every logical key, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    values: [f32; Key::COUNT],
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the given keys fully held
    pub fn holding(keys: &[Key]) -> Self {
        let mut snapshot = Self::new();
        for &key in keys {
            snapshot.set(key, 1.0);
        }
        snapshot
    }

    pub fn set(&mut self, key: Key, value: f32) {
        self.values[key.index()] = value;
    }

    pub fn with(mut self, key: Key, value: f32) -> Self {
        self.set(key, value);
        self
    }

    #[inline]
    pub fn value(&self, key: Key) -> f32 {
        self.values[key.index()]
    }

    #[inline]
    pub fn held(&self, key: Key) -> bool {
        self.value(key) > 0.0
    }

    /// Horizontal axis built from the Left/Right channels
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.value(Key::Right) - self.value(Key::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_indices_are_dense() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_horizontal_axis() {
        let input = InputSnapshot::new().with(Key::Right, 1.0).with(Key::Left, 0.25);
        assert!((input.horizontal() - 0.75).abs() < 1e-6);
        assert!(input.held(Key::Left));
        assert!(!input.held(Key::Fire));
    }
}
