use std::time::Duration;

use party_engine::{
    Game, GameConfig, EngineContext, GameEvent, Tone,
    InputEvent, InputQueue, FixedTimestep, ProtocolLayout,
};
use party_engine::bridge::protocol::HEADER_FLOATS;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g., `birthday-card`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    idle_input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u32,
    header: [f32; HEADER_FLOATS],
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
    /// Game events of the last frame, clamped to capacity.
    event_buffer: Vec<GameEvent>,
    /// Tones resolved from this frame's sound events, waiting for the synth.
    tones: Vec<Tone>,
    view_json: String,
    view_revision: u32,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::from_secs(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            idle_input: InputQueue::new(),
            timestep,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            event_buffer: Vec::with_capacity(config.max_events),
            layout,
            config,
            initialized: false,
            frame: 0,
            header: [0.0; HEADER_FLOATS],
            tones: Vec::new(),
            view_json: String::from("null"),
            view_revision: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = FixedTimestep::from_secs(self.config.fixed_dt);
        self.ctx = EngineContext::from_config(&self.config);
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish_frame();
    }

    /// Replace the game's content from a JSON document.
    /// Returns false (and keeps the old content) when it is rejected.
    pub fn load_content(&mut self, json: &str) -> bool {
        match self.game.load_content(json) {
            Ok(()) => {
                self.refresh_view();
                true
            }
            Err(e) => {
                log::warn!("content rejected: {}", e);
                false
            }
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: fixed-step updates, then pack events, sounds and the view.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(Duration::from_secs_f32(dt.max(0.0)));
        for step in 0..steps {
            self.ctx.dt = self.timestep.dt();
            self.ctx.advance_clock();
            // Input is applied once, on the first step of the frame.
            let input = if step == 0 { &self.input } else { &self.idle_input };
            self.game.update(&mut self.ctx, input);
        }

        // Input that arrived on a zero-step frame waits for the next step.
        if steps > 0 {
            self.input.drain();
        }

        self.publish_frame();
    }

    fn publish_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);

        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "dropping {} game events over capacity {}",
                self.ctx.events.len() - self.layout.max_events,
                self.layout.max_events
            );
        }
        self.event_buffer.clear();
        self.event_buffer
            .extend(self.ctx.events.iter().take(self.layout.max_events).copied());

        // Pack sound events into flat buffer and resolve their tones
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
            self.tones.extend_from_slice(self.game.sound_cue(*sound));
        }

        self.refresh_view();

        self.layout.write_header(
            &mut self.header,
            &self.config,
            self.frame,
            self.sound_buffer.len(),
            self.event_buffer.len(),
            self.view_revision,
        );
    }

    fn refresh_view(&mut self) {
        let json = self.game.view().to_string();
        if json != self.view_json {
            self.view_json = json;
            self.view_revision = self.view_revision.wrapping_add(1);
        }
    }

    /// Take the tones queued since the last call.
    pub fn take_tones(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.tones)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    // ---- Accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.event_buffer
    }

    pub fn view_json(&self) -> &str {
        &self.view_json
    }

    pub fn view_revision(&self) -> u32 {
        self.view_revision
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors (read by the host via wasm_bindgen exports) ----

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use party_engine::SoundEvent;

    /// Counts steps and clicks; emits a sound per click.
    struct Counter {
        steps: u32,
        clicks: u32,
    }

    const BEEP: [Tone; 1] = [Tone::sine(440.0, 0.2, 0.0)];

    impl Game for Counter {
        fn config(&self) -> GameConfig {
            GameConfig { max_events: 2, ..GameConfig::default() }
        }

        fn init(&mut self, _ctx: &mut EngineContext) {}

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.steps += 1;
            for event in input.iter() {
                if let InputEvent::Custom { kind: 1, .. } = event {
                    self.clicks += 1;
                    ctx.emit_sound(SoundEvent(1));
                }
            }
            for _ in 0..3 {
                ctx.emit_event(GameEvent::new(1.0, self.steps as f32));
            }
        }

        fn view(&self) -> serde_json::Value {
            serde_json::json!({ "clicks": self.clicks })
        }

        fn sound_cue(&self, sound: SoundEvent) -> &[Tone] {
            if sound == SoundEvent(1) { &BEEP } else { &[] }
        }
    }

    const CLICK: InputEvent = InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 };

    fn runner() -> GameRunner<Counter> {
        let mut r = GameRunner::new(Counter { steps: 0, clicks: 0 });
        r.init();
        r
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = GameRunner::new(Counter { steps: 0, clicks: 0 });
        r.tick(0.1);
        assert_eq!(r.game().steps, 0);
    }

    #[test]
    fn input_is_seen_once_even_with_many_steps() {
        let mut r = runner();
        r.push_input(CLICK);
        r.tick(0.06); // three steps at 60 Hz
        assert_eq!(r.game().steps, 3);
        assert_eq!(r.game().clicks, 1);
        assert_eq!(r.take_tones(), BEEP.to_vec());
        assert!(r.take_tones().is_empty());
    }

    #[test]
    fn input_survives_a_zero_step_frame() {
        let mut r = runner();
        r.push_input(CLICK);
        r.tick(0.001);
        assert_eq!(r.game().clicks, 0);
        r.tick(0.02);
        assert_eq!(r.game().clicks, 1);
    }

    #[test]
    fn events_are_clamped_and_view_revision_tracks_changes() {
        let mut r = runner();
        let rev = r.view_revision();
        r.tick(1.0 / 60.0 + 0.001);
        assert_eq!(r.game_events_len(), 2);
        assert_eq!(r.view_revision(), rev);

        r.push_input(CLICK);
        r.tick(1.0 / 60.0);
        assert_eq!(r.view_json(), r#"{"clicks":1}"#);
        assert_eq!(r.view_revision(), rev + 1);
    }
}
