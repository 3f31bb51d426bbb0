use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Identifier of an ephemeral entity (balloon, confetti piece, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

/// A sound cue emitted by the game logic.
/// The numeric value is resolved to tones through `Game::sound_cue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

/// Oscillator shape for a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
}

/// A single synthesized note.
/// Times are in seconds, relative to the moment the cue is played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Oscillator frequency in Hz.
    pub frequency: f32,
    /// Length of the gain envelope in seconds.
    pub duration: f32,
    /// Offset from the start of the cue in seconds.
    pub delay: f32,
    #[serde(default)]
    pub waveform: Waveform,
}

impl Tone {
    pub const fn sine(frequency: f32, duration: f32, delay: f32) -> Self {
        Self { frequency, duration, delay, waveform: Waveform::Sine }
    }

    pub const fn triangle(frequency: f32, duration: f32, delay: f32) -> Self {
        Self { frequency, duration, delay, waveform: Waveform::Triangle }
    }

    /// Build a melody: consecutive notes of equal length starting at `start`.
    pub fn melody(notes: &[f32], note_duration: f32, start: f32) -> Vec<Tone> {
        notes
            .iter()
            .enumerate()
            .map(|(i, &f)| Tone::sine(f, note_duration, start + i as f32 * note_duration))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melody_notes_follow_each_other() {
        let tones = Tone::melody(&[523.0, 659.0, 784.0], 0.7, 0.5);
        assert_eq!(tones.len(), 3);
        assert_eq!(tones[0].delay, 0.5);
        assert!((tones[2].delay - 1.9).abs() < 1e-5);
        assert!(tones.iter().all(|t| t.waveform == Waveform::Sine));
    }

    #[test]
    fn game_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
        let ev = GameEvent::new(2.0, 5.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&ev));
        assert_eq!(floats, &[2.0, 5.0, 0.0, 0.0]);
    }
}
