use glam::Vec2;
use party_engine::*;

use crate::audio::CueBook;
use crate::content::CardContent;
use crate::experience::Experience;
use crate::minigame::MiniGameStage;
use crate::quiz::AnswerOutcome;
use crate::sequencer::Signal;
use crate::share::{ShareData, ShareOutcome};
use crate::stage::Stage;
use crate::wishes::{WishOutcome, WishRejection};

const WORLD_WIDTH: f32 = 1200.0;
const WORLD_HEIGHT: f32 = 800.0;

// Game event kinds (Rust → host)
pub const EVENT_STAGE: f32 = 1.0;
pub const EVENT_WISH_ACCEPTED: f32 = 2.0;
pub const EVENT_WISH_REJECTED: f32 = 3.0;
pub const EVENT_ANSWER: f32 = 4.0;
pub const EVENT_BALLOON_POPPED: f32 = 5.0;
pub const EVENT_GAMES_STAGE: f32 = 6.0;
pub const EVENT_CONFETTI: f32 = 7.0;
pub const EVENT_RESTART: f32 = 8.0;

// Custom event kinds (host → Rust)
pub const CUSTOM_ENABLE_AUDIO: u32 = 1;
pub const CUSTOM_BLOW_CANDLE: u32 = 2;
pub const CUSTOM_OPEN_ENVELOPE: u32 = 3;
/// a = balloon id, b/c = click point relative to the balloon.
pub const CUSTOM_POP_BALLOON: u32 = 4;
/// a = answer index.
pub const CUSTOM_ANSWER: u32 = 5;
pub const CUSTOM_OPEN_GIFT: u32 = 6;
pub const CUSTOM_GALLERY_NEXT: u32 = 7;
pub const CUSTOM_GALLERY_PREV: u32 = 8;
/// a = thumbnail index.
pub const CUSTOM_GALLERY_SELECT: u32 = 9;
/// a = 1 on, 0 off.
pub const CUSTOM_GALLERY_AUTOPLAY: u32 = 10;
pub const CUSTOM_GALLERY_FAVORITE: u32 = 11;
pub const CUSTOM_GALLERY_CLOSE: u32 = 12;
pub const CUSTOM_REPLAY_GAMES: u32 = 13;
pub const CUSTOM_REPLAY_GALLERY: u32 = 14;
pub const CUSTOM_RESTART: u32 = 15;
pub const CUSTOM_SHARED: u32 = 16;
pub const CUSTOM_COPIED: u32 = 17;
/// a = width, b = height in CSS pixels.
pub const CUSTOM_VIEWPORT: u32 = 18;

// Text input kinds
pub const TEXT_WISH: u32 = 1;

pub struct BirthdayCard {
    experience: Experience,
    cues: CueBook,
    /// Stage as last reported to the host; cues follow it.
    reported_stage: Stage,
    audio: bool,
    games_stage: Option<MiniGameStage>,
}

impl BirthdayCard {
    pub fn new() -> Self {
        Self::with_content(CardContent::default())
    }

    pub fn with_content(content: CardContent) -> Self {
        Self {
            experience: Experience::new(content, 0, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
            cues: CueBook::new(),
            reported_stage: Stage::Balloons,
            audio: false,
            games_stage: None,
        }
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn share_data(&self, url: impl Into<String>) -> ShareData {
        self.experience.share_data(url)
    }

    pub fn current_photo_url(&self) -> Option<&str> {
        self.experience.current_photo_url()
    }

    fn handle_custom(&mut self, ctx: &mut EngineContext, kind: u32, a: f32, b: f32, c: f32) {
        let exp = &mut self.experience;
        match kind {
            CUSTOM_ENABLE_AUDIO => {
                exp.enable_audio();
            }
            CUSTOM_BLOW_CANDLE => {
                exp.blow_candle();
            }
            CUSTOM_OPEN_ENVELOPE => {
                exp.open_envelope();
            }
            CUSTOM_POP_BALLOON => {
                let id = EntityId(a as u32);
                if exp.pop_balloon(id, Vec2::new(b, c)) {
                    ctx.emit_event(GameEvent { kind: EVENT_BALLOON_POPPED, a, b, c });
                }
            }
            CUSTOM_ANSWER => {
                let outcome = exp.answer(a as usize);
                if outcome != AnswerOutcome::Rejected {
                    let correct = if outcome == AnswerOutcome::Correct { 1.0 } else { 0.0 };
                    ctx.emit_event(GameEvent { kind: EVENT_ANSWER, a, b: correct, c: 0.0 });
                }
            }
            CUSTOM_OPEN_GIFT => {
                exp.open_gift();
            }
            CUSTOM_GALLERY_NEXT => exp.gallery_next(),
            CUSTOM_GALLERY_PREV => exp.gallery_prev(),
            CUSTOM_GALLERY_SELECT => {
                exp.gallery_select(a as usize);
            }
            CUSTOM_GALLERY_AUTOPLAY => exp.gallery_autoplay(a != 0.0),
            CUSTOM_GALLERY_FAVORITE => {
                exp.gallery_toggle_favorite();
            }
            CUSTOM_GALLERY_CLOSE => exp.gallery_close(),
            CUSTOM_REPLAY_GAMES => {
                exp.replay_games();
            }
            CUSTOM_REPLAY_GALLERY => {
                exp.replay_gallery();
            }
            CUSTOM_RESTART => exp.restart(),
            CUSTOM_SHARED => exp.share_outcome(ShareOutcome::Shared),
            CUSTOM_COPIED => exp.share_outcome(ShareOutcome::Copied),
            CUSTOM_VIEWPORT => {
                if a > 0.0 && b > 0.0 {
                    exp.set_viewport(Vec2::new(a, b));
                }
            }
            other => log::debug!("unknown custom event {}", other),
        }
    }

    fn handle_text(&mut self, ctx: &mut EngineContext, kind: u32, text: &str) {
        if kind != TEXT_WISH {
            log::debug!("unknown text input {}", kind);
            return;
        }
        match self.experience.submit_wish(text) {
            WishOutcome::Accepted { count } => {
                ctx.emit_event(GameEvent::new(EVENT_WISH_ACCEPTED, count as f32));
            }
            WishOutcome::Rejected(reason) => {
                let code = match reason {
                    WishRejection::Empty => 0.0,
                    WishRejection::Full => 1.0,
                };
                ctx.emit_event(GameEvent::new(EVENT_WISH_REJECTED, code));
            }
        }
    }

    /// Turn sequencer signals into host events and stage cues.
    /// A cue plays on stage entry once audio is on, and for the current
    /// stage at the moment audio is switched on.
    fn report(&mut self, ctx: &mut EngineContext) {
        for signal in self.experience.drain_signals() {
            match signal {
                Signal::StageChanged(stage) => {
                    self.reported_stage = stage;
                    ctx.emit_event(GameEvent::new(EVENT_STAGE, stage.ordinal() as f32));
                    if self.audio {
                        ctx.emit_sound(CueBook::sound(stage));
                    }
                }
                Signal::AudioEnabled => {
                    self.audio = true;
                    ctx.emit_sound(CueBook::sound(self.reported_stage));
                }
                Signal::Confetti(on) => {
                    ctx.emit_event(GameEvent::new(EVENT_CONFETTI, if on { 1.0 } else { 0.0 }));
                }
                Signal::Restarted => ctx.emit_event(GameEvent::new(EVENT_RESTART, 0.0)),
            }
        }

        let games_stage = self.experience.games_stage();
        if games_stage != self.games_stage {
            self.games_stage = games_stage;
            if let Some(stage) = games_stage {
                ctx.emit_event(GameEvent::new(EVENT_GAMES_STAGE, stage as u32 as f32));
            }
        }
    }
}

impl Default for BirthdayCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BirthdayCard {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let content = self.experience.content().clone();
        let viewport = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        self.experience = Experience::new(content, ctx.rng.next_u64(), viewport);
        self.experience.start();
        self.report(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match event {
                InputEvent::Custom { kind, a, b, c } => {
                    self.handle_custom(ctx, *kind, *a, *b, *c)
                }
                InputEvent::Text { kind, text } => self.handle_text(ctx, *kind, text),
            }
        }

        self.experience.tick(ctx.dt);
        self.report(ctx);
    }

    fn view(&self) -> serde_json::Value {
        serde_json::to_value(self.experience.view()).unwrap_or_else(|e| {
            log::warn!("view serialization failed: {}", e);
            serde_json::Value::Null
        })
    }

    fn sound_cue(&self, sound: SoundEvent) -> &[Tone] {
        self.cues.tones(sound)
    }

    fn load_content(&mut self, json: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = CardContent::from_json(json)?;
        content.validate()?;
        log::info!("content loaded for {}", content.recipient);
        self.experience.set_content(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ctx() -> EngineContext {
        let mut ctx = EngineContext::from_config(&BirthdayCard::new().config());
        ctx.dt = Duration::from_millis(50);
        ctx
    }

    fn custom(kind: u32, a: f32) -> InputEvent {
        InputEvent::Custom { kind, a, b: 0.0, c: 0.0 }
    }

    /// Step the game for `ms` with no input, collecting events.
    fn idle(game: &mut BirthdayCard, ctx: &mut EngineContext, ms: u64) -> Vec<GameEvent> {
        let empty = InputQueue::new();
        let mut events = Vec::new();
        for _ in 0..ms / 50 {
            ctx.clear_frame_data();
            game.update(ctx, &empty);
            events.extend(ctx.events.iter().copied());
        }
        events
    }

    fn send(game: &mut BirthdayCard, ctx: &mut EngineContext, event: InputEvent) {
        let mut q = InputQueue::new();
        q.push(event);
        ctx.clear_frame_data();
        game.update(ctx, &q);
    }

    #[test]
    fn init_reports_first_stage_without_sound() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);
        assert_eq!(ctx.events, vec![GameEvent::new(EVENT_STAGE, 0.0)]);
        assert!(ctx.sounds.is_empty());
    }

    #[test]
    fn enabling_audio_plays_current_stage_then_follows_changes() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);

        send(&mut game, &mut ctx, custom(CUSTOM_ENABLE_AUDIO, 0.0));
        assert_eq!(ctx.sounds, vec![CueBook::sound(Stage::Balloons)]);
        assert!(!game.sound_cue(ctx.sounds[0]).is_empty());

        send(&mut game, &mut ctx, custom(CUSTOM_ENABLE_AUDIO, 0.0));
        assert!(ctx.sounds.is_empty());

        let mut heard = Vec::new();
        let empty = InputQueue::new();
        for _ in 0..80 {
            ctx.clear_frame_data();
            game.update(&mut ctx, &empty);
            heard.extend(ctx.sounds.iter().copied());
        }
        assert_eq!(heard, vec![CueBook::sound(Stage::Cake)]);
    }

    #[test]
    fn custom_events_drive_the_card() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);
        idle(&mut game, &mut ctx, 4000);
        assert_eq!(game.experience().stage(), Stage::Cake);

        send(&mut game, &mut ctx, custom(CUSTOM_BLOW_CANDLE, 0.0));
        let events = idle(&mut game, &mut ctx, 1000);
        assert!(events.contains(&GameEvent::new(EVENT_STAGE, Stage::CakeCutting.ordinal() as f32)));
        idle(&mut game, &mut ctx, 2500);
        assert_eq!(game.experience().stage(), Stage::Envelope);

        send(&mut game, &mut ctx, custom(CUSTOM_OPEN_ENVELOPE, 0.0));
        let events = idle(&mut game, &mut ctx, 1200);
        assert!(events.contains(&GameEvent::new(EVENT_CONFETTI, 1.0)));
        let events = idle(&mut game, &mut ctx, 5000);
        assert!(events.contains(&GameEvent::new(EVENT_GAMES_STAGE, 0.0)));
        assert_eq!(game.experience().stage(), Stage::Interactive);
    }

    #[test]
    fn wishes_arrive_as_text_input() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);

        // no mini-game mounted yet
        send(&mut game, &mut ctx, InputEvent::Text { kind: TEXT_WISH, text: "fly".into() });
        assert!(ctx.events.contains(&GameEvent::new(EVENT_WISH_REJECTED, 1.0)));
    }

    #[test]
    fn popping_a_balloon_reports_it_once() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);
        let id = game.experience().balloons().unwrap().balloons().next().unwrap().id;
        let pop = InputEvent::Custom { kind: CUSTOM_POP_BALLOON, a: id.0 as f32, b: 3.0, c: 4.0 };

        send(&mut game, &mut ctx, pop.clone());
        let popped: Vec<_> = ctx.events.iter().filter(|e| e.kind == EVENT_BALLOON_POPPED).collect();
        assert_eq!(popped.len(), 1);
        assert_eq!((popped[0].b, popped[0].c), (3.0, 4.0));

        send(&mut game, &mut ctx, pop);
        assert!(ctx.events.iter().all(|e| e.kind != EVENT_BALLOON_POPPED));
    }

    #[test]
    fn restart_event_resets_stage() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);
        idle(&mut game, &mut ctx, 4000);
        send(&mut game, &mut ctx, custom(CUSTOM_RESTART, 0.0));
        assert!(ctx.events.contains(&GameEvent::new(EVENT_RESTART, 0.0)));
        assert_eq!(game.experience().stage(), Stage::Balloons);
    }

    #[test]
    fn invalid_content_is_rejected_and_old_kept() {
        let mut game = BirthdayCard::new();
        assert!(game.load_content(r#"{ "photos": [] }"#).is_err());
        assert!(game.load_content("not json").is_err());
        assert_eq!(game.experience().content().photos.len(), 6);

        assert!(game.load_content(r#"{ "recipient": "Ada" }"#).is_ok());
        assert_eq!(game.experience().content().recipient, "Ada");
    }

    #[test]
    fn view_is_json_object() {
        let mut game = BirthdayCard::new();
        let mut ctx = ctx();
        game.init(&mut ctx);
        let view = game.view();
        assert_eq!(view["stage"], "balloons");
        assert_eq!(view["progress"][0], true);
    }
}
