use std::time::Duration;

use crate::api::types::{EntityId, SoundEvent, GameEvent, Tone};
use crate::input::queue::InputQueue;
use crate::systems::rng::Rng;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Viewport width in CSS pixels, used for spawn areas.
    pub world_width: f32,
    /// Viewport height in CSS pixels.
    pub world_height: f32,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Seed for the context RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1200.0,
            world_height: 800.0,
            max_sounds: 32,
            max_events: 32,
            seed: 42,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and arm the first timers.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `ctx.dt` holds the step length.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Serializable snapshot of what the host page should render.
    fn view(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Tones to synthesize for a sound event. Unknown events play nothing.
    fn sound_cue(&self, _sound: SoundEvent) -> &[Tone] {
        &[]
    }

    /// Replace game content (texts, catalogs) from a JSON document.
    /// On error the previous content must stay in place.
    fn load_content(&mut self, _json: &str) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pub rng: Rng,
    /// Length of the current fixed step.
    pub dt: Duration,
    /// Total simulated time since init.
    pub elapsed: Duration,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            rng: Rng::new(config.seed),
            dt: Duration::from_secs_f32(config.fixed_dt),
            elapsed: Duration::ZERO,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be synthesized by the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Advance the simulated clock by one step.
    pub fn advance_clock(&mut self) {
        self.elapsed += self.dt;
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }

    #[test]
    fn clear_frame_data_drops_sounds_and_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_sound(SoundEvent(3));
        ctx.emit_event(GameEvent::new(1.0, 2.0));
        ctx.clear_frame_data();
        assert!(ctx.sounds.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn clock_advances_by_fixed_step() {
        let config = GameConfig { fixed_dt: 0.5, ..GameConfig::default() };
        let mut ctx = EngineContext::from_config(&config);
        ctx.advance_clock();
        ctx.advance_clock();
        assert_eq!(ctx.elapsed, Duration::from_secs(1));
    }
}
