//! Audio system using Web Audio API
//!
//! Procedurally generated cues, no external files needed. Every cue starts
//! its own oscillators, so overlapping triggers simply layer.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Background melody
    Theme,
    /// Ball hits a well wall
    WallBounce,
    /// Ball erodes a settled cell
    BlockBreak,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::ThemeCue => Some(Self::Theme),
            GameEvent::WallBounce => Some(Self::WallBounce),
            GameEvent::BlockBreak => Some(Self::BlockBreak),
            GameEvent::PieceLanded | GameEvent::BallSpawned | GameEvent::GameOver => None,
        }
    }

    /// Themes follow the music volume, everything else the effects volume
    pub fn is_music(self) -> bool {
        matches!(self, Self::Theme)
    }
}

/// Theme phrase as (frequency Hz, length in beats)
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const THEME_NOTES: &[(f32, f64)] = &[
    (659.25, 1.0),
    (493.88, 0.5),
    (523.25, 0.5),
    (587.33, 1.0),
    (523.25, 0.5),
    (493.88, 0.5),
    (440.00, 1.0),
    (440.00, 0.5),
    (523.25, 0.5),
    (659.25, 1.0),
    (587.33, 0.5),
    (523.25, 0.5),
    (493.88, 1.5),
    (523.25, 0.5),
    (587.33, 1.0),
    (659.25, 1.0),
    (523.25, 1.0),
    (440.00, 1.0),
    (440.00, 2.0),
];

/// Seconds per beat of the theme
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const THEME_BEAT_SECS: f64 = 0.22;

/// Note start offsets in seconds, paired with frequency and duration
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn theme_schedule() -> impl Iterator<Item = (f64, f32, f64)> {
    THEME_NOTES.iter().scan(0.0, |start, &(freq, beats)| {
        let at = *start;
        let len = beats * THEME_BEAT_SECS;
        *start += len;
        Some((at, freq, len))
    })
}

#[cfg(target_arch = "wasm32")]
pub use manager::AudioManager;

#[cfg(target_arch = "wasm32")]
mod manager {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, theme_schedule};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
            }
        }

        /// Pick up changed volumes or mute
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play the cue belonging to a simulation event
        pub fn play_event(&self, event: GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = if effect.is_music() {
                self.music_volume
            } else {
                self.sfx_volume
            };
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Theme => self.play_theme(ctx, vol),
                SoundEffect::WallBounce => self.play_wall_bounce(ctx, vol),
                SoundEffect::BlockBreak => self.play_block_break(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Square-wave melody, one oscillator per note
        fn play_theme(&self, ctx: &AudioContext, vol: f32) {
            let t0 = ctx.current_time();
            for (at, freq, len) in theme_schedule() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                    continue;
                };
                let t = t0 + at;
                gain.gain().set_value_at_time(vol * 0.12, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + len * 0.95)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + len).ok();
            }
        }

        /// Short high ping
        fn play_wall_bounce(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Falling crunch
        fn play_block_break(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(320.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }
}
