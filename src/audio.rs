//! Audio system using Web Audio API
//!
//! Procedurally generated tones - no external files needed. Audio is
//! best-effort: if the context cannot be created the game runs silently.

use crate::settings::Settings;
use crate::sim::{GameEvent, GameOverReason};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started
    Jump,
    /// Player hit an obstacle
    Collision,
    /// Invincibility star picked up
    ItemCollect,
    GameOver,
    /// New personal best
    NewRecord,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Exponential glide target, if the pitch moves
    pub glide_to: Option<f32>,
    pub wave: Waveform,
    /// Seconds
    pub duration: f64,
}

/// Attack time of every envelope (seconds)
pub const ATTACK_S: f64 = 0.01;
/// Level the envelope decays to
pub const RELEASE_LEVEL: f32 = 0.001;

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        let (freq, glide_to, wave, duration) = match self {
            SoundEffect::Jump => (400.0, None, Waveform::Sine, 0.1),
            SoundEffect::Collision => (150.0, None, Waveform::Sawtooth, 0.3),
            SoundEffect::ItemCollect => (800.0, None, Waveform::Square, 0.2),
            SoundEffect::GameOver => (100.0, None, Waveform::Triangle, 1.0),
            SoundEffect::NewRecord => (400.0, Some(800.0), Waveform::Sine, 0.5),
        };
        Tone {
            freq,
            glide_to,
            wave,
            duration,
        }
    }
}

/// Sounds triggered by a frame's events, in order
pub fn sounds_for(events: &[GameEvent]) -> Vec<SoundEffect> {
    let mut out = Vec::new();
    for event in events {
        match event {
            GameEvent::Started => out.push(SoundEffect::Jump),
            GameEvent::ItemCollected => out.push(SoundEffect::ItemCollect),
            GameEvent::GameOver { reason, .. } => {
                if *reason == GameOverReason::Collision {
                    out.push(SoundEffect::Collision);
                }
                out.push(SoundEffect::GameOver);
            }
            GameEvent::Scored { .. } => {}
        }
    }
    out
}

/// Volume levels, independent of the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            sfx_volume: 0.8,
            muted: false,
        }
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Peak gain of an effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::*;

    impl From<Waveform> for OscillatorType {
        fn from(wave: Waveform) -> Self {
            match wave {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        mixer: Mixer,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(Mixer::default())
        }
    }

    impl AudioManager {
        pub fn new(mixer: Mixer) -> Self {
            // Fails outside a secure context or without Web Audio
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, mixer }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_mixer(&mut self, mixer: Mixer) {
            self.mixer = mixer;
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.mixer.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if self.play_tone(ctx, effect.tone(), vol).is_none() {
                log::warn!("Could not play {:?}", effect);
            }
        }

        pub fn play_all(&self, effects: &[SoundEffect]) {
            for effect in effects {
                self.play(*effect);
            }
        }

        /// Create an oscillator routed through a gain node
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

        /// Quick attack, exponential decay over the tone's duration
        fn play_tone(&self, ctx: &AudioContext, tone: Tone, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, tone.freq, tone.wave.into())?;
            let t = ctx.current_time();
            let end = t + tone.duration;

            gain.gain().set_value_at_time(0.0, t).ok()?;
            gain.gain()
                .linear_ramp_to_value_at_time(vol, t + ATTACK_S)
                .ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(RELEASE_LEVEL, end)
                .ok()?;

            if let Some(target) = tone.glide_to {
                osc.frequency().set_value_at_time(tone.freq, t).ok()?;
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, end)
                    .ok()?;
            }

            osc.start().ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }
}
