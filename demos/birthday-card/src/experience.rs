use std::time::Duration;

use glam::Vec2;
use party_engine::{EntityId, Member, Rng};
use serde::Serialize;

use crate::balloons::{Balloon, BalloonField};
use crate::cake::{Cake, CakeView};
use crate::confetti::{ConfettiBurst, ConfettiPiece};
use crate::content::CardContent;
use crate::envelope::{Envelope, EnvelopeView};
use crate::gallery::{Gallery, GalleryView};
use crate::minigame::{MiniGameSequencer, MiniGameStage, MiniGameView};
use crate::quiz::AnswerOutcome;
use crate::sequencer::{Signal, StageSequencer};
use crate::share::{ShareData, ShareOutcome, SharePanel, ShareView};
use crate::stage::{Stage, INDICATOR};
use crate::wishes::{WishOutcome, WishRejection};

/// The whole card: the stage sequencer plus whichever renderers its state
/// calls for. Renderers are mounted and dropped by `sync`; dropping one
/// drops its timers with it.
pub struct Experience {
    content: CardContent,
    sequencer: StageSequencer,
    rng: Rng,
    viewport: Vec2,
    /// Next balloon id; survives remounts so ids are never reused.
    balloon_ids: EntityId,
    balloons: Option<BalloonField>,
    cake: Option<Cake>,
    envelope: Option<Envelope>,
    games: Option<MiniGameSequencer>,
    gallery: Option<Gallery>,
    confetti: Option<ConfettiBurst>,
    share: Option<SharePanel>,
}

#[derive(Debug, Serialize)]
pub struct ExperienceView<'a> {
    pub recipient: &'a str,
    pub stage: Stage,
    pub progress: [bool; INDICATOR.len()],
    pub audio_enabled: bool,
    pub confetti_visible: bool,
    pub interactive_visible: bool,
    pub gallery_visible: bool,
    pub balloons: Vec<&'a Member<Balloon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cake: Option<CakeView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games: Option<MiniGameView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GalleryView<'a>>,
    pub confetti: &'a [ConfettiPiece],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<ShareView>,
}

impl Experience {
    pub fn new(content: CardContent, seed: u64, viewport: Vec2) -> Self {
        Self {
            content,
            sequencer: StageSequencer::new(),
            rng: Rng::new(seed),
            viewport,
            balloon_ids: EntityId(1),
            balloons: None,
            cake: None,
            envelope: None,
            games: None,
            gallery: None,
            confetti: None,
            share: None,
        }
    }

    pub fn start(&mut self) {
        self.sequencer.start();
        self.sync();
    }

    /// Swap the card content. Renderers already on screen keep what they
    /// were mounted with; the next mount picks up the new content.
    pub fn set_content(&mut self, content: CardContent) {
        self.content = content;
    }

    /// Viewport in CSS pixels, used by the next balloon and confetti batches.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        if let Some(b) = self.balloons.as_mut() {
            b.set_viewport(viewport);
        }
    }

    // ---- user actions ----

    pub fn enable_audio(&mut self) -> bool {
        self.sequencer.enable_audio()
    }

    pub fn blow_candle(&mut self) -> bool {
        self.cake.as_mut().is_some_and(Cake::blow_candle)
    }

    pub fn open_envelope(&mut self) -> bool {
        self.envelope.as_mut().is_some_and(Envelope::open)
    }

    pub fn pop_balloon(&mut self, id: EntityId, at: Vec2) -> bool {
        self.balloons.as_mut().is_some_and(|b| b.pop(id, at))
    }

    pub fn submit_wish(&mut self, text: &str) -> WishOutcome {
        match self.games.as_mut() {
            Some(games) => games.submit_wish(text),
            None => WishOutcome::Rejected(WishRejection::Full),
        }
    }

    pub fn answer(&mut self, index: usize) -> AnswerOutcome {
        self.games
            .as_mut()
            .map_or(AnswerOutcome::Rejected, |g| g.answer(index))
    }

    pub fn open_gift(&mut self) -> bool {
        self.games.as_mut().is_some_and(MiniGameSequencer::open_gift)
    }

    pub fn gallery_next(&mut self) {
        if let Some(g) = self.gallery.as_mut() {
            g.next();
        }
    }

    pub fn gallery_prev(&mut self) {
        if let Some(g) = self.gallery.as_mut() {
            g.prev();
        }
    }

    pub fn gallery_select(&mut self, index: usize) -> bool {
        self.gallery.as_mut().is_some_and(|g| g.select(index))
    }

    pub fn gallery_autoplay(&mut self, on: bool) {
        if let Some(g) = self.gallery.as_mut() {
            g.set_autoplay(on);
        }
    }

    pub fn gallery_toggle_favorite(&mut self) -> Option<bool> {
        self.gallery.as_mut()?.toggle_current_favorite()
    }

    pub fn gallery_close(&mut self) {
        if let Some(g) = self.gallery.as_mut() {
            g.close();
        }
    }

    pub fn replay_games(&mut self) -> bool {
        let replayed = self.sequencer.replay_games();
        self.sync();
        replayed
    }

    pub fn replay_gallery(&mut self) -> bool {
        let replayed = self.sequencer.replay_gallery();
        self.sync();
        replayed
    }

    pub fn restart(&mut self) {
        self.sequencer.restart();
        self.balloons = None;
        self.cake = None;
        self.envelope = None;
        self.games = None;
        self.gallery = None;
        self.confetti = None;
        self.share = None;
        self.sync();
    }

    pub fn share_outcome(&mut self, outcome: ShareOutcome) {
        if let Some(panel) = self.share.as_mut() {
            panel.on_outcome(outcome);
        }
    }

    // ---- time ----

    /// Advance every timer, route renderer completions into the sequencer,
    /// then bring the mounted renderers in line with its state.
    pub fn tick(&mut self, dt: Duration) {
        self.sequencer.tick(dt);
        self.sync();

        if let Some(b) = self.balloons.as_mut() {
            b.tick(dt, &mut self.rng);
            self.balloon_ids = b.next_id();
        }
        if let Some(c) = self.confetti.as_mut() {
            c.tick(dt);
        }
        if let Some(s) = self.share.as_mut() {
            s.tick(dt);
        }
        if self.cake.as_mut().is_some_and(|c| c.tick(dt).is_done()) {
            self.sequencer.on_candle_blown();
        }
        if self.envelope.as_mut().is_some_and(|e| e.tick(dt).is_done()) {
            self.sequencer.on_envelope_opened();
        }
        if self.games.as_mut().is_some_and(|g| g.tick(dt).is_done()) {
            self.sequencer.on_interactive_complete();
        }
        if self.gallery.as_mut().is_some_and(|g| g.tick(dt).is_done()) {
            self.sequencer.on_gallery_complete();
        }

        self.sync();
    }

    /// Mount what the sequencer state asks for, drop what it no longer does.
    fn sync(&mut self) {
        let stage = self.sequencer.stage();
        let interactive = self.sequencer.interactive_visible();
        let gallery = self.sequencer.gallery_visible();
        let overlay = interactive || gallery;

        if interactive {
            self.balloons = None;
        } else if self.balloons.is_none() {
            let field = BalloonField::new(&mut self.rng, self.viewport, self.balloon_ids);
            self.balloon_ids = field.next_id();
            self.balloons = Some(field);
        }

        let cake_stage = matches!(stage, Stage::Cake | Stage::CakeCutting);
        let cutting = stage == Stage::CakeCutting;
        if !cake_stage || overlay {
            self.cake = None;
        } else if let Some(cake) = self.cake.as_mut() {
            cake.set_cutting(cutting);
        } else {
            self.cake = Some(Cake::new(&mut self.rng, cutting));
        }

        let envelope_stage = matches!(stage, Stage::Envelope | Stage::Message);
        let show_message = stage == Stage::Message;
        if !envelope_stage || overlay {
            self.envelope = None;
        } else if let Some(envelope) = self.envelope.as_mut() {
            envelope.set_show_message(show_message);
        } else {
            self.envelope = Some(Envelope::new(self.content.quotes.len(), show_message));
        }

        if !interactive {
            self.games = None;
        } else if self.games.is_none() {
            self.games = Some(MiniGameSequencer::new(&self.content, &mut self.rng));
        }

        if !gallery {
            self.gallery = None;
        } else if self.gallery.is_none() {
            self.gallery = Some(Gallery::new(self.content.photos.clone()));
        }

        if !self.sequencer.confetti_visible() {
            self.confetti = None;
        } else if self.confetti.is_none() {
            self.confetti = Some(ConfettiBurst::new(&mut self.rng, self.viewport));
        }

        if stage != Stage::Complete || overlay {
            self.share = None;
        } else if self.share.is_none() {
            self.share = Some(SharePanel::new());
        }
    }

    // ---- read side ----

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        self.sequencer.drain_signals()
    }

    pub fn sequencer(&self) -> &StageSequencer {
        &self.sequencer
    }

    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    pub fn games_stage(&self) -> Option<MiniGameStage> {
        self.games.as_ref().map(MiniGameSequencer::stage)
    }

    pub fn balloons(&self) -> Option<&BalloonField> {
        self.balloons.as_ref()
    }

    pub fn current_photo_url(&self) -> Option<&str> {
        Some(self.gallery.as_ref()?.current_photo()?.url.as_str())
    }

    pub fn share_data(&self, url: impl Into<String>) -> ShareData {
        ShareData::new(&self.content.share, url)
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn view(&self) -> ExperienceView<'_> {
        let envelope = self.envelope.as_ref();
        ExperienceView {
            recipient: &self.content.recipient,
            stage: self.sequencer.stage(),
            progress: self.sequencer.progress(),
            audio_enabled: self.sequencer.audio_enabled(),
            confetti_visible: self.sequencer.confetti_visible(),
            interactive_visible: self.sequencer.interactive_visible(),
            gallery_visible: self.sequencer.gallery_visible(),
            balloons: self.balloons.iter().flat_map(|b| b.balloons()).collect(),
            cake: self.cake.as_ref().map(Cake::view),
            envelope: envelope.map(Envelope::view),
            quote: envelope
                .filter(|e| e.view().show_message)
                .and_then(|e| self.content.quotes.get(e.quote()))
                .map(String::as_str),
            games: self.games.as_ref().map(MiniGameSequencer::view),
            gallery: self.gallery.as_ref().map(Gallery::view),
            confetti: self.confetti.as_ref().map(ConfettiBurst::pieces).unwrap_or(&[]),
            share: self.share.as_ref().map(SharePanel::view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(50);

    fn run(exp: &mut Experience, total_ms: u64) {
        for _ in 0..total_ms / STEP.as_millis() as u64 {
            exp.tick(STEP);
        }
    }

    fn started() -> Experience {
        let mut exp = Experience::new(CardContent::default(), 42, Vec2::new(1200.0, 800.0));
        exp.start();
        exp
    }

    fn to_interactive() -> Experience {
        let mut exp = started();
        run(&mut exp, 4000);
        assert!(exp.blow_candle());
        run(&mut exp, 1000 + 2500);
        assert!(exp.open_envelope());
        run(&mut exp, 1200 + 5000);
        assert_eq!(exp.stage(), Stage::Interactive);
        exp
    }

    fn finish_games(exp: &mut Experience) {
        for w in ["x", "y", "z"] {
            assert!(exp.submit_wish(w).is_accepted());
        }
        run(exp, 1000);
        for _ in 0..3 {
            assert_eq!(exp.answer(3), AnswerOutcome::Correct);
            run(exp, 1500);
        }
        run(exp, 1000);
        assert!(exp.open_gift());
        run(exp, 2000 + 3000);
    }

    #[test]
    fn balloons_mount_first_and_cake_follows() {
        let mut exp = started();
        assert!(exp.balloons().is_some());
        assert!(exp.view().cake.is_none());
        assert!(!exp.blow_candle());
        run(&mut exp, 4000);
        assert_eq!(exp.stage(), Stage::Cake);
        assert!(exp.view().cake.is_some());
    }

    #[test]
    fn candle_completion_drives_cutting_then_envelope() {
        let mut exp = started();
        run(&mut exp, 4000);
        assert!(exp.blow_candle());
        assert!(!exp.blow_candle());
        run(&mut exp, 950);
        assert_eq!(exp.stage(), Stage::Cake);
        run(&mut exp, 50);
        assert_eq!(exp.stage(), Stage::CakeCutting);
        assert!(exp.view().cake.unwrap().cutting);
        run(&mut exp, 2500);
        assert_eq!(exp.stage(), Stage::Envelope);
        assert!(exp.view().cake.is_none());
        assert!(exp.view().envelope.is_some());
    }

    #[test]
    fn message_shows_quote_and_confetti() {
        let mut exp = started();
        run(&mut exp, 4000);
        exp.blow_candle();
        run(&mut exp, 3500);
        exp.open_envelope();
        run(&mut exp, 1200);
        assert_eq!(exp.stage(), Stage::Message);
        let view = exp.view();
        assert_eq!(view.confetti.len(), 150);
        assert_eq!(view.quote, Some(exp.content().quotes[0].as_str()));
        run(&mut exp, 3000);
        assert_eq!(exp.view().quote, Some(exp.content().quotes[1].as_str()));
    }

    #[test]
    fn interactive_hides_balloons_and_stage_renderers() {
        let exp = to_interactive();
        let view = exp.view();
        assert!(view.balloons.is_empty());
        assert!(view.envelope.is_none());
        assert!(view.confetti.is_empty());
        assert_eq!(exp.games_stage(), Some(MiniGameStage::Wishes));
    }

    #[test]
    fn full_run_reaches_complete_with_share_panel() {
        let mut exp = to_interactive();
        finish_games(&mut exp);
        assert_eq!(exp.stage(), Stage::Gallery);
        assert!(exp.games_stage().is_none());
        assert!(exp.balloons().is_some());
        assert!(exp.current_photo_url().is_some());

        exp.gallery_close();
        run(&mut exp, 50);
        assert_eq!(exp.stage(), Stage::Complete);
        assert!(exp.view().share.is_some());

        exp.share_outcome(ShareOutcome::Copied);
        assert!(exp.view().share.unwrap().copied);
    }

    #[test]
    fn replayed_games_are_fresh_and_lead_to_gallery() {
        let mut exp = to_interactive();
        finish_games(&mut exp);
        exp.gallery_close();
        run(&mut exp, 50);

        assert!(exp.replay_games());
        assert_eq!(exp.stage(), Stage::Complete);
        assert_eq!(exp.games_stage(), Some(MiniGameStage::Wishes));
        assert!(exp.view().share.is_none());
        finish_games(&mut exp);
        assert_eq!(exp.stage(), Stage::Gallery);
    }

    #[test]
    fn restart_drops_renderers_and_stale_timers() {
        let mut exp = started();
        run(&mut exp, 4000);
        exp.blow_candle();
        run(&mut exp, 500);
        exp.restart();
        assert_eq!(exp.stage(), Stage::Balloons);
        assert!(exp.view().cake.is_none());
        // the old flame-out and cutting timers are gone with their owners
        run(&mut exp, 3950);
        assert_eq!(exp.stage(), Stage::Balloons);
        run(&mut exp, 50);
        assert_eq!(exp.stage(), Stage::Cake);
        assert_eq!(exp.view().cake.unwrap().candle, party_engine::TriggerState::Idle);
    }

    #[test]
    fn restart_from_complete_with_replays_pending() {
        let mut exp = to_interactive();
        finish_games(&mut exp);
        exp.gallery_close();
        run(&mut exp, 50);
        assert_eq!(exp.stage(), Stage::Complete);

        assert!(exp.replay_gallery());
        assert!(exp.replay_games());
        for w in ["x", "y", "z"] {
            assert!(exp.submit_wish(w).is_accepted());
        }
        // the move to the quiz is now pending
        run(&mut exp, 500);
        exp.drain_signals();

        exp.restart();
        assert_eq!(exp.stage(), Stage::Balloons);
        assert!(!exp.sequencer().interactive_visible());
        assert!(!exp.sequencer().gallery_visible());
        assert!(exp.games_stage().is_none());
        assert!(exp.view().gallery.is_none());
        assert_eq!(
            exp.drain_signals(),
            vec![Signal::Restarted, Signal::StageChanged(Stage::Balloons)]
        );

        run(&mut exp, 3950);
        assert!(exp.drain_signals().is_empty());
        assert!(exp.games_stage().is_none());
        assert_eq!(exp.stage(), Stage::Balloons);
        run(&mut exp, 50);
        assert_eq!(exp.drain_signals(), vec![Signal::StageChanged(Stage::Cake)]);
    }

    #[test]
    fn new_viewport_reaches_the_mounted_balloons() {
        let mut exp = started();
        exp.set_viewport(Vec2::new(2000.0, 1000.0));
        run(&mut exp, 15000);

        let right: Vec<f32> = exp
            .balloons()
            .unwrap()
            .balloons()
            .filter(|m| m.data.entry == crate::balloons::Entry::Right)
            .map(|m| m.data.left)
            .collect();
        assert!(!right.is_empty());
        assert!(right.iter().all(|&left| left == 2120.0), "{:?}", right);
    }

    #[test]
    fn remounted_balloons_never_reuse_ids() {
        let mut exp = started();
        let old: Vec<EntityId> = exp.balloons().unwrap().balloons().map(|m| m.id).collect();
        let newest = old.iter().map(|id| id.0).max().unwrap();

        exp.restart();
        let field = exp.balloons().unwrap();
        assert!(field.balloons().all(|m| m.id.0 > newest));
        for id in old {
            assert!(!exp.pop_balloon(id, Vec2::ZERO));
        }
    }

    #[test]
    fn popping_needs_a_live_balloon() {
        let mut exp = started();
        let id = exp.balloons().unwrap().balloons().next().unwrap().id;
        assert!(exp.pop_balloon(id, Vec2::new(1.0, 2.0)));
        assert!(!exp.pop_balloon(id, Vec2::new(1.0, 2.0)));
        assert!(!exp.pop_balloon(EntityId(999_999), Vec2::ZERO));
    }

    #[test]
    fn view_serializes() {
        let exp = started();
        let json = serde_json::to_value(exp.view()).unwrap();
        assert_eq!(json["stage"], "balloons");
        assert_eq!(json["recipient"], "Eda Saner");
        assert!(json["balloons"].as_array().unwrap().len() > 12);
        assert_eq!(json["balloons"][0]["phase"], "floating");
        assert!(json.get("cake").is_none());
    }
}
