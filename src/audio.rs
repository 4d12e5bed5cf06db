//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and background music - no external
//! files needed. The audio context is created lazily on the first sound, and
//! resumed if the browser suspended it.

use crate::Settings;
use crate::sim::SoundCue;

/// Seconds of music scheduled ahead of the audio clock
pub const MUSIC_LOOKAHEAD: f64 = 0.25;

/// One melody step: MIDI note (`None` = rest) and length in beats
type Step = (Option<u8>, f32);

/// Looping background tune (C major, bouncy)
const MELODY: &[Step] = &[
    (Some(72), 0.5),
    (Some(76), 0.5),
    (Some(79), 0.5),
    (Some(76), 0.5),
    (Some(74), 0.5),
    (Some(77), 0.5),
    (Some(81), 1.0),
    (Some(79), 0.5),
    (Some(76), 0.5),
    (Some(72), 0.5),
    (Some(74), 0.5),
    (Some(76), 1.0),
    (None, 0.5),
    (Some(67), 0.5),
    (Some(72), 0.5),
    (Some(71), 0.5),
    (Some(69), 0.5),
    (Some(71), 0.5),
    (Some(72), 1.5),
    (None, 0.5),
];

/// Frequency in Hz of a MIDI note number
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// A note the sequencer wants played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    /// Start time on the audio clock (seconds)
    pub time: f64,
    pub freq: f32,
    /// Seconds
    pub duration: f64,
}

/// Steps through the melody against the audio clock
#[derive(Debug, Clone)]
pub struct MusicSequencer {
    tempo_bpm: f64,
    step: usize,
    next_time: f64,
}

impl Default for MusicSequencer {
    fn default() -> Self {
        Self::new(132.0)
    }
}

impl MusicSequencer {
    pub fn new(tempo_bpm: f64) -> Self {
        Self {
            tempo_bpm,
            step: 0,
            next_time: 0.0,
        }
    }

    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.tempo_bpm
    }

    /// Restart the melody at `start`
    pub fn reset(&mut self, start: f64) {
        self.step = 0;
        self.next_time = start;
    }

    /// Length of one pass through the melody in seconds
    pub fn loop_seconds(&self) -> f64 {
        MELODY.iter().map(|(_, beats)| *beats as f64).sum::<f64>() * self.beat_seconds()
    }

    /// Notes starting before `now + lookahead` that have not been handed out yet.
    /// If the clock ran past the schedule (hidden tab), the tune picks up at `now`
    /// instead of replaying the backlog.
    pub fn schedule(&mut self, now: f64, lookahead: f64) -> Vec<ScheduledNote> {
        if self.next_time < now {
            self.next_time = now;
        }

        let beat = self.beat_seconds();
        let mut notes = Vec::new();
        while self.next_time < now + lookahead {
            let (note, beats) = MELODY[self.step];
            let duration = beats as f64 * beat;
            if let Some(note) = note {
                notes.push(ScheduledNote {
                    time: self.next_time,
                    freq: midi_to_freq(note),
                    duration,
                });
            }
            self.next_time += duration;
            self.step = (self.step + 1) % MELODY.len();
        }
        notes
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

    use super::{MUSIC_LOOKAHEAD, MusicSequencer, ScheduledNote, Settings, SoundCue};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Context creation failed once; don't retry every sound
        unavailable: bool,
        music_gain: Option<GainNode>,
        sequencer: MusicSequencer,
        sfx_volume: f32,
        music_volume: f32,
        music_enabled: bool,
    }

    impl AudioManager {
        pub fn new(sfx_volume: f32, music_volume: f32, music_enabled: bool) -> Self {
            Self {
                ctx: None,
                unavailable: false,
                music_gain: None,
                sequencer: MusicSequencer::default(),
                sfx_volume,
                music_volume,
                music_enabled,
            }
        }

        /// Create (or resume) the audio context. Call from a user gesture.
        pub fn unlock(&mut self) -> Option<&AudioContext> {
            if self.ctx.is_none() && !self.unavailable {
                match AudioContext::new() {
                    Ok(ctx) => {
                        self.music_gain = ctx.create_gain().ok().and_then(|gain| {
                            gain.gain().set_value(self.music_volume);
                            gain.connect_with_audio_node(&ctx.destination()).ok()?;
                            Some(gain)
                        });
                        self.sequencer.reset(ctx.current_time());
                        log::info!("Audio context created");
                        self.ctx = Some(ctx);
                    }
                    Err(_) => {
                        log::warn!("Failed to create AudioContext - audio disabled");
                        self.unavailable = true;
                    }
                }
            }

            let ctx = self.ctx.as_ref()?;
            // Browsers start contexts suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        /// Set music volume (0.0 - 1.0)
        pub fn set_music_volume(&mut self, vol: f32) {
            self.music_volume = vol.clamp(0.0, 1.0);
            if let Some(gain) = &self.music_gain {
                gain.gain().set_value(self.music_volume);
            }
        }

        /// Push volume and music preferences into the live mix
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.set_sfx_volume(settings.effective_sfx_volume());
            self.set_music_volume(settings.effective_music_volume());
            self.set_music_enabled(settings.music_enabled);
        }

        pub fn set_music_enabled(&mut self, enabled: bool) {
            if enabled && !self.music_enabled {
                if let Some(ctx) = &self.ctx {
                    self.sequencer.reset(ctx.current_time());
                }
            }
            self.music_enabled = enabled;
            log::info!("Music {}", if enabled { "on" } else { "off" });
        }

        /// Keep the music scheduled ahead of the audio clock; call once per frame
        pub fn update_music(&mut self) {
            if !self.music_enabled || self.music_volume <= 0.0 {
                return;
            }
            let (Some(ctx), Some(gain)) = (&self.ctx, &self.music_gain) else {
                return;
            };
            if ctx.state() != web_sys::AudioContextState::Running {
                return;
            }
            for note in self.sequencer.schedule(ctx.current_time(), MUSIC_LOOKAHEAD) {
                Self::play_note(ctx, gain, &note);
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, cue: SoundCue) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.unlock() else { return };

            match cue {
                SoundCue::CoinPickup => Self::play_coin(ctx, vol),
                SoundCue::Jump => Self::play_jump(ctx, vol),
                SoundCue::BlockSmash => Self::play_smash(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope routed into `out`
        fn create_osc(
            ctx: &AudioContext,
            out: &AudioNode,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(out).ok()?;

            Some((osc, gain))
        }

        /// Coin - bright upward sweep
        fn play_coin(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) =
                Self::create_osc(ctx, &ctx.destination(), 900.0, OscillatorType::Sine)
            else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(2000.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.1 * vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01 * vol, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Jump - short chirp
        fn play_jump(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) =
                Self::create_osc(ctx, &ctx.destination(), 300.0, OscillatorType::Square)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.06, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.005, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Wrong block - crunchy break
        fn play_smash(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let out = ctx.destination();

            // Crackle
            if let Some((osc, gain)) =
                Self::create_osc(ctx, &out, 200.0, OscillatorType::Sawtooth)
            {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(200.0, t).ok();
                osc.frequency().set_value_at_time(1200.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(150.0, t + 0.04).ok();
                osc.frequency().set_value_at_time(900.0, t + 0.06).ok();
                osc.frequency().set_value_at_time(100.0, t + 0.09).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.22).ok();
            }

            // Thud
            if let Some((osc, gain)) = Self::create_osc(ctx, &out, 90.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(45.0, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.18).ok();
            }
        }

        /// One melody note through the music bus
        fn play_note(ctx: &AudioContext, bus: &GainNode, note: &ScheduledNote) {
            let Some((osc, gain)) = Self::create_osc(ctx, bus, note.freq, OscillatorType::Triangle)
            else {
                return;
            };
            let end = note.time + note.duration * 0.9;
            gain.gain().set_value_at_time(0.0001, note.time).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.12, note.time + 0.02)
                .ok();
            gain.gain().exponential_ramp_to_value_at_time(0.0001, end).ok();
            osc.start_with_when(note.time).ok();
            osc.stop_with_when(end + 0.01).ok();
        }
    }
}

/// Native stand-in: logs cues so headless runs show what would be heard
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AudioManager {
    sfx_volume: f32,
    music_volume: f32,
    music_enabled: bool,
    played: Vec<SoundCue>,
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new(sfx_volume: f32, music_volume: f32, music_enabled: bool) -> Self {
        Self {
            sfx_volume,
            music_volume,
            music_enabled,
            played: Vec::new(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_sfx_volume(settings.effective_sfx_volume());
        self.set_music_volume(settings.effective_music_volume());
        self.set_music_enabled(settings.music_enabled);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    /// Whether the music loop would be audible
    pub fn music_audible(&self) -> bool {
        self.music_enabled && self.music_volume > 0.0
    }

    pub fn update_music(&mut self) {}

    pub fn play(&mut self, cue: SoundCue) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        log::debug!("Sound {:?}", cue);
        self.played.push(cue);
    }

    /// Cues played so far
    pub fn played(&self) -> &[SoundCue] {
        &self.played
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_a4_and_c5() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(72) - 523.25).abs() < 0.01);
    }

    #[test]
    fn test_schedules_only_within_lookahead() {
        let mut seq = MusicSequencer::new(120.0);
        seq.reset(10.0);

        let notes = seq.schedule(10.0, 0.6);
        // Half-beat notes at 120 bpm are 0.25s apart: 10.0, 10.25, 10.5
        let times: Vec<_> = notes.iter().map(|n| n.time).collect();
        assert_eq!(times, vec![10.0, 10.25, 10.5]);

        // Nothing new until the clock advances
        assert!(seq.schedule(10.0, 0.6).is_empty());
        assert_eq!(seq.schedule(10.2, 0.6).len(), 1);
    }

    #[test]
    fn test_melody_loops() {
        let mut seq = MusicSequencer::new(120.0);
        seq.reset(0.0);
        let span = seq.loop_seconds();
        let first = seq.schedule(0.0, 0.01)[0];
        let notes = seq.schedule(0.0, span + 0.01);
        assert_eq!(notes.last().map(|n| n.freq), Some(first.freq));
    }

    #[test]
    fn test_settings_mute_effects_and_music() {
        let mut audio = AudioManager::new(1.0, 0.5, true);
        audio.play(SoundCue::Jump);

        let muted = Settings {
            master_volume: 0.0,
            ..Settings::default()
        };
        audio.apply_settings(&muted);
        audio.play(SoundCue::CoinPickup);
        assert_eq!(audio.played(), &[SoundCue::Jump]);
        assert!(!audio.music_audible());
    }

    #[test]
    fn test_music_toggle_restores_volume() {
        let mut settings = Settings::default();
        settings.toggle_music();
        let mut audio = AudioManager::new(
            settings.effective_sfx_volume(),
            settings.effective_music_volume(),
            settings.music_enabled,
        );
        assert!(!audio.music_audible());

        settings.toggle_music();
        audio.apply_settings(&settings);
        assert!(audio.music_audible());
    }

    #[test]
    fn test_skips_backlog_after_stall() {
        let mut seq = MusicSequencer::new(120.0);
        seq.reset(0.0);
        seq.schedule(0.0, 0.1);
        let notes = seq.schedule(100.0, 0.1);
        assert!(notes.iter().all(|n| n.time >= 100.0));
    }
}
