use party_engine::{Tone, Waveform};
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

/// Peak gain of a tone; the envelope decays exponentially to `FADE_GAIN`.
const PEAK_GAIN: f32 = 0.1;
const FADE_GAIN: f32 = 0.01;

/// Best-effort Web Audio synthesizer for engine tones.
///
/// Audio is decoration: a missing or blocked AudioContext never reaches the
/// game, it only shows up in the debug log.
pub struct ToneSynth {
    context: Option<AudioContext>,
}

impl ToneSynth {
    /// Create the audio context. Must happen after a user gesture,
    /// otherwise browsers keep the context suspended.
    pub fn new() -> Self {
        let context = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::debug!("audio not supported: {:?}", e);
                None
            }
        };
        Self { context }
    }

    /// Schedule every tone relative to the context's current time.
    pub fn play(&self, tones: &[Tone]) {
        let Some(ctx) = &self.context else {
            return;
        };
        for tone in tones {
            if let Err(e) = Self::play_tone(ctx, tone) {
                log::debug!("tone {} Hz failed: {:?}", tone.frequency, e);
            }
        }
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
        let oscillator = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;

        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let start = ctx.current_time() + tone.delay as f64;
        let end = start + tone.duration as f64;

        oscillator.set_type(oscillator_type(tone.waveform));
        oscillator.frequency().set_value_at_time(tone.frequency, start)?;

        gain.gain().set_value_at_time(PEAK_GAIN, start)?;
        gain.gain().exponential_ramp_to_value_at_time(FADE_GAIN, end)?;

        oscillator.start_with_when(start)?;
        oscillator.stop_with_when(end)?;
        Ok(())
    }
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self::new()
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}
