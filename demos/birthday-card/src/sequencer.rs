use std::time::Duration;

use party_engine::{Epoch, Scheduler};

use crate::stage::{self, Stage, INDICATOR};

/// Balloons dwell before the cake appears.
pub const BALLOONS_DWELL: Duration = Duration::from_millis(4000);
/// Cake-cutting animation before the envelope appears.
pub const CUTTING_DWELL: Duration = Duration::from_millis(2500);
/// Message and confetti before the mini-games open.
pub const MESSAGE_DWELL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTimer {
    ShowCake,
    ShowEnvelope,
    StartGames,
}

/// Notifications for the layer that mounts renderers and plays sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    StageChanged(Stage),
    Confetti(bool),
    AudioEnabled,
    Restarted,
}

/// Owns the top-level stage and overlay flags and the dwell timers between
/// stages. Handlers called in the wrong stage are ignored.
#[derive(Debug)]
pub struct StageSequencer {
    stage: Stage,
    confetti_visible: bool,
    gallery_visible: bool,
    interactive_visible: bool,
    audio_enabled: bool,
    timers: Scheduler<StageTimer>,
    signals: Vec<Signal>,
}

impl StageSequencer {
    pub fn new() -> Self {
        Self {
            stage: Stage::Balloons,
            confetti_visible: false,
            gallery_visible: false,
            interactive_visible: false,
            audio_enabled: false,
            timers: Scheduler::new(),
            signals: Vec::new(),
        }
    }

    /// Enter `Balloons` and arm the cake timer.
    pub fn start(&mut self) {
        self.set_stage(Stage::Balloons);
        self.timers.after(BALLOONS_DWELL, StageTimer::ShowCake);
    }

    pub fn on_candle_blown(&mut self) -> bool {
        if self.stage != Stage::Cake {
            return self.ignored("candle blown");
        }
        self.set_stage(Stage::CakeCutting);
        self.timers.after(CUTTING_DWELL, StageTimer::ShowEnvelope);
        true
    }

    pub fn on_envelope_opened(&mut self) -> bool {
        if self.stage != Stage::Envelope {
            return self.ignored("envelope opened");
        }
        self.set_stage(Stage::Message);
        self.set_confetti(true);
        self.timers.after(MESSAGE_DWELL, StageTimer::StartGames);
        true
    }

    pub fn on_interactive_complete(&mut self) -> bool {
        if !self.interactive_visible {
            return self.ignored("mini-games complete");
        }
        self.interactive_visible = false;
        self.gallery_visible = true;
        self.set_stage(Stage::Gallery);
        true
    }

    pub fn on_gallery_complete(&mut self) -> bool {
        if !self.gallery_visible {
            return self.ignored("gallery complete");
        }
        self.gallery_visible = false;
        self.set_stage(Stage::Complete);
        true
    }

    /// One-way latch. Returns true the first time.
    pub fn enable_audio(&mut self) -> bool {
        if self.audio_enabled {
            return false;
        }
        self.audio_enabled = true;
        self.signals.push(Signal::AudioEnabled);
        log::info!("audio enabled");
        true
    }

    pub fn replay_games(&mut self) -> bool {
        if self.stage != Stage::Complete {
            return self.ignored("replay games");
        }
        self.interactive_visible = true;
        true
    }

    pub fn replay_gallery(&mut self) -> bool {
        if self.stage != Stage::Complete {
            return self.ignored("replay gallery");
        }
        self.gallery_visible = true;
        true
    }

    /// Back to the first stage from anywhere. Every timer armed before this
    /// call is stale and will never fire.
    pub fn restart(&mut self) -> Epoch {
        let epoch = self.timers.invalidate();
        self.interactive_visible = false;
        self.gallery_visible = false;
        self.set_confetti(false);
        self.signals.push(Signal::Restarted);
        self.start();
        log::info!("restarted");
        epoch
    }

    /// Advance the dwell timers and apply whatever came due.
    pub fn tick(&mut self, dt: Duration) {
        for timer in self.timers.advance(dt) {
            match timer {
                StageTimer::ShowCake => self.set_stage(Stage::Cake),
                StageTimer::ShowEnvelope => self.set_stage(Stage::Envelope),
                StageTimer::StartGames => {
                    self.set_confetti(false);
                    self.interactive_visible = true;
                    self.set_stage(Stage::Interactive);
                }
            }
        }
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    fn set_stage(&mut self, stage: Stage) {
        log::info!("stage: {} -> {}", self.stage.name(), stage.name());
        self.stage = stage;
        self.signals.push(Signal::StageChanged(stage));
    }

    fn set_confetti(&mut self, visible: bool) {
        if self.confetti_visible != visible {
            self.confetti_visible = visible;
            self.signals.push(Signal::Confetti(visible));
        }
    }

    fn ignored(&self, what: &str) -> bool {
        log::debug!("{} ignored in stage {}", what, self.stage.name());
        false
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn confetti_visible(&self) -> bool {
        self.confetti_visible
    }

    pub fn gallery_visible(&self) -> bool {
        self.gallery_visible
    }

    pub fn interactive_visible(&self) -> bool {
        self.interactive_visible
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn epoch(&self) -> Epoch {
        self.timers.epoch()
    }

    pub fn progress(&self) -> [bool; INDICATOR.len()] {
        stage::progress(self.stage)
    }
}

impl Default for StageSequencer {
    fn default() -> Self {
        Self::new()
    }
}
