use party_engine::InputEvent;
use wasm_bindgen::prelude::*;

pub mod audio;
pub mod balloons;
pub mod cake;
pub mod confetti;
pub mod content;
pub mod envelope;
pub mod experience;
pub mod gallery;
pub mod game;
pub mod minigame;
pub mod quiz;
pub mod renderer;
pub mod sequencer;
pub mod share;
pub mod stage;
pub mod wishes;

use game::BirthdayCard;
use share::{browser, ShareData, ShareOutcome, ShareTarget};

party_web::export_game!(BirthdayCard, "birthday-card");

// ---- Share panel and gallery actions that need the browser ----

fn share_data() -> ShareData {
    let url = browser::page_url();
    with_runner(|r| r.game().share_data(url))
}

/// Feed a finished share attempt back into the card as a custom event.
fn report_share(outcome: ShareOutcome) {
    let kind = match outcome {
        ShareOutcome::Shared => game::CUSTOM_SHARED,
        ShareOutcome::Copied => game::CUSTOM_COPIED,
        ShareOutcome::Failed => return,
    };
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a: 0.0, b: 0.0, c: 0.0 }));
}

#[wasm_bindgen]
pub fn share_native() {
    browser::share_or_copy(share_data(), report_share);
}

#[wasm_bindgen]
pub fn share_copy() {
    browser::copy(share_data(), report_share);
}

/// `target`: 0 Twitter, 1 Facebook, 2 LinkedIn, 3 WhatsApp, 4 email.
#[wasm_bindgen]
pub fn share_link(target: u32) {
    match ShareTarget::from_code(target) {
        Some(target) => browser::open_link(&share_data(), target),
        None => log::debug!("unknown share target {}", target),
    }
}

#[wasm_bindgen]
pub fn share_instagram() {
    browser::copy_for_instagram(&share_data());
}

/// Open the photo currently shown in the gallery in a new tab.
#[wasm_bindgen]
pub fn gallery_open_photo() {
    let url = with_runner(|r| r.game().current_photo_url().map(str::to_owned));
    if let Some(url) = url {
        browser::open_in_tab(&url);
    }
}
