use std::time::Duration;

use party_engine::{Scheduler, TimerId, Trigger, TriggerState};
use serde::Serialize;

use crate::renderer::{Completion, Finish};

/// Flap animation between the click and the completion report.
const FLAP_OPEN: Duration = Duration::from_millis(1200);
const QUOTE_ROTATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvelopeTimer {
    Opened,
    NextQuote,
}

/// Sealed envelope holding the birthday message. Opening is one-shot; while
/// the message is shown the quote line rotates.
pub struct Envelope {
    flap: Trigger,
    show_message: bool,
    quote: usize,
    quote_count: usize,
    rotation: Option<TimerId>,
    timers: Scheduler<EnvelopeTimer>,
    finish: Finish,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeView {
    pub flap: TriggerState,
    pub show_message: bool,
    pub quote: usize,
}

impl Envelope {
    pub fn new(quote_count: usize, show_message: bool) -> Self {
        let mut envelope = Self {
            flap: Trigger::new(),
            show_message: false,
            quote: 0,
            quote_count,
            rotation: None,
            timers: Scheduler::new(),
            finish: Finish::new(),
        };
        envelope.set_show_message(show_message);
        envelope
    }

    /// Returns true only for the click that opened the envelope.
    pub fn open(&mut self) -> bool {
        if !self.flap.fire() {
            return false;
        }
        self.timers.after(FLAP_OPEN, EnvelopeTimer::Opened);
        true
    }

    /// Start or stop the quote rotation.
    pub fn set_show_message(&mut self, show: bool) {
        if show == self.show_message {
            return;
        }
        self.show_message = show;
        if show {
            if self.quote_count > 1 {
                self.rotation = Some(self.timers.every(QUOTE_ROTATION, EnvelopeTimer::NextQuote));
            }
        } else if let Some(id) = self.rotation.take() {
            self.timers.cancel(id);
        }
    }

    pub fn tick(&mut self, dt: Duration) -> Completion {
        let mut completion = Completion::Pending;
        for timer in self.timers.advance(dt) {
            match timer {
                EnvelopeTimer::Opened => {
                    if self.flap.settle() {
                        completion = self.finish.report();
                    }
                }
                EnvelopeTimer::NextQuote => {
                    self.quote = (self.quote + 1) % self.quote_count;
                }
            }
        }
        completion
    }

    pub fn quote(&self) -> usize {
        self.quote
    }

    pub fn view(&self) -> EnvelopeView {
        EnvelopeView {
            flap: self.flap.state(),
            show_message: self.show_message,
            quote: self.quote,
        }
    }
}
