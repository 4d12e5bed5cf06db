//! Game settings and preferences
//!
//! Persisted in LocalStorage. Nothing about play progress is stored; a reload
//! always starts again at level 1.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music playing
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Speech ===
    /// Read words aloud
    pub speech_enabled: bool,
    /// Utterance rate (1.0 = normal)
    pub speech_rate: f32,

    // === Display ===
    /// Draw the on-screen jump/arrow buttons
    pub touch_controls: bool,
    /// Debris bursts on smashed blocks
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,

            speech_enabled: true,
            speech_rate: 0.9,

            touch_controls: true,
            particles: true,
        }
    }
}

impl Settings {
    /// Flip the music preference; returns the new state
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Effective sound effect gain
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music gain (0 while music is off)
    pub fn effective_music_volume(&self) -> f32 {
        if !self.music_enabled {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp values that may have been hand-edited in storage
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.speech_rate = self.speech_rate.clamp(0.1, 10.0);
        self
    }

    /// Parse stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "word_hop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_music_silences_music_only() {
        let mut settings = Settings::default();
        assert!(settings.effective_music_volume() > 0.0);

        assert!(!settings.toggle_music());
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert!(settings.effective_sfx_volume() > 0.0);

        assert!(settings.toggle_music());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"music_enabled": false}"#);
        assert!(!settings.music_enabled);
        assert!(settings.speech_enabled);
        assert_eq!(settings.sfx_volume, 1.0);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 4.0, "speech_rate": 0.0}"#);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.speech_rate, 0.1);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let mut settings = Settings::default();
        settings.touch_controls = false;
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }
}
