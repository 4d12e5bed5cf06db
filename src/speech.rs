//! Text-to-Speech adapter
//!
//! Any pending utterance is cancelled before a new one starts, so only the
//! most recent request is heard. Browsers without speech synthesis simply
//! stay silent.

use crate::Settings;

/// Speaks words through the platform's speech synthesizer
#[derive(Debug, Clone)]
pub struct Speaker {
    enabled: bool,
    rate: f32,
    /// Last utterance requested (what is being heard now)
    current: Option<String>,
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new(true, 1.0)
    }
}

impl Speaker {
    pub fn new(enabled: bool, rate: f32) -> Self {
        Self {
            enabled,
            rate,
            current: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Follow the speech preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_rate(settings.speech_rate);
        self.set_enabled(settings.speech_enabled);
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Interrupt whatever is being said and say `text`
    pub fn speak(&mut self, text: &str) {
        if !self.enabled || text.is_empty() {
            return;
        }
        self.cancel();
        self.current = Some(text.to_string());
        self.utter(text);
    }

    /// Stop speaking
    pub fn cancel(&mut self) {
        self.current = None;
        self.cancel_platform();
    }

    #[cfg(target_arch = "wasm32")]
    fn synthesis() -> Option<web_sys::SpeechSynthesis> {
        let window = web_sys::window()?;
        // Older browsers lack the API entirely
        let has_api = js_sys::Reflect::has(&window, &"speechSynthesis".into()).unwrap_or(false);
        if !has_api {
            return None;
        }
        window.speech_synthesis().ok()
    }

    #[cfg(target_arch = "wasm32")]
    fn utter(&self, text: &str) {
        let Some(synth) = Self::synthesis() else {
            log::warn!("Speech synthesis unavailable; not saying {:?}", text);
            return;
        };
        let Ok(utterance) = web_sys::SpeechSynthesisUtterance::new_with_text(text) else {
            return;
        };
        utterance.set_rate(self.rate);
        synth.speak(&utterance);
    }

    #[cfg(target_arch = "wasm32")]
    fn cancel_platform(&self) {
        if let Some(synth) = Self::synthesis() {
            synth.cancel();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn utter(&self, text: &str) {
        log::info!("Say: {} (rate {})", text, self.rate);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn cancel_platform(&self) {}
}
