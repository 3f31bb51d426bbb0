use std::time::Duration;

use party_engine::{Scheduler, TimerId};
use serde::Serialize;

use crate::content::SharePayload;

/// How long the "copied" and "thanks for sharing" banners stay up.
const BANNER: Duration = Duration::from_millis(3000);
const POPUP_FEATURES: &str = "width=600,height=500,scrollbars=yes,resizable=yes";
const INSTAGRAM_HINT: &str = "🎉 Perfect! The birthday message has been copied to your clipboard!\n\n\
Now you can:\n📱 Open Instagram\n✨ Create a new post or story\n📝 Paste the message\n\
💖 Share the special day with the world!";

/// Link-based share destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Twitter,
    Facebook,
    Linkedin,
    Whatsapp,
    Email,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        ShareTarget::Twitter,
        ShareTarget::Facebook,
        ShareTarget::Linkedin,
        ShareTarget::Whatsapp,
        ShareTarget::Email,
    ];

    /// Host-side code of a target (its position in `ALL`).
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Open in a sized popup rather than a plain tab.
    fn popup(self) -> bool {
        matches!(self, ShareTarget::Twitter | ShareTarget::Facebook | ShareTarget::Linkedin)
    }
}

/// Share payload bound to the page URL it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
    pub hashtags: Vec<String>,
}

impl ShareData {
    pub fn new(payload: &SharePayload, url: impl Into<String>) -> Self {
        Self {
            title: payload.title.clone(),
            text: payload.text.clone(),
            url: url.into(),
            hashtags: payload.hashtags.clone(),
        }
    }

    /// `#One #Two`, empty when there are no hashtags.
    pub fn hashtag_line(&self) -> String {
        self.hashtags
            .iter()
            .map(|h| format!("#{}", h))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text placed on the clipboard by the copy button and the share fallback.
    pub fn clipboard_text(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.title, self.text, self.url)
    }

    pub fn instagram_caption(&self) -> String {
        format!("{}\n{}\n{}\n\n{}", self.title, self.text, self.url, self.hashtag_line())
    }

    /// Fully encoded link for a share target.
    pub fn link(&self, target: ShareTarget) -> String {
        let url = urlencoding::encode(&self.url);
        match target {
            ShareTarget::Twitter => {
                let tags = self.hashtag_line();
                let text = if tags.is_empty() {
                    self.text.clone()
                } else {
                    format!("{} {}", self.text, tags)
                };
                format!(
                    "https://twitter.com/intent/tweet?text={}&url={}",
                    urlencoding::encode(&text),
                    url
                )
            }
            ShareTarget::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
                url,
                urlencoding::encode(&self.text)
            ),
            ShareTarget::Linkedin => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}&title={}&summary={}",
                url,
                urlencoding::encode(&self.title),
                urlencoding::encode(&self.text)
            ),
            ShareTarget::Whatsapp => format!(
                "https://wa.me/?text={}",
                urlencoding::encode(&self.clipboard_text())
            ),
            ShareTarget::Email => {
                let body = format!(
                    "{}\n\nCheck out this amazing birthday experience: {}",
                    self.text, self.url
                );
                format!(
                    "mailto:?subject={}&body={}",
                    urlencoding::encode(&self.title),
                    urlencoding::encode(&body)
                )
            }
        }
    }
}

/// How a browser share attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Banner {
    Copied,
    Thanks,
}

/// Share panel state shown on the final screen: two transient banners.
pub struct SharePanel {
    copied: Option<TimerId>,
    thanks: Option<TimerId>,
    timers: Scheduler<Banner>,
}

#[derive(Debug, Serialize)]
pub struct ShareView {
    pub copied: bool,
    pub thanks: bool,
}

impl SharePanel {
    pub fn new() -> Self {
        Self { copied: None, thanks: None, timers: Scheduler::new() }
    }

    /// Show a banner for the outcome. Repeating restarts its countdown.
    pub fn on_outcome(&mut self, outcome: ShareOutcome) {
        let (slot, banner) = match outcome {
            ShareOutcome::Shared => (&mut self.thanks, Banner::Thanks),
            ShareOutcome::Copied => (&mut self.copied, Banner::Copied),
            ShareOutcome::Failed => return,
        };
        if let Some(id) = slot.take() {
            self.timers.cancel(id);
        }
        *slot = Some(self.timers.after(BANNER, banner));
    }

    pub fn tick(&mut self, dt: Duration) {
        for banner in self.timers.advance(dt) {
            match banner {
                Banner::Copied => self.copied = None,
                Banner::Thanks => self.thanks = None,
            }
        }
    }

    pub fn view(&self) -> ShareView {
        ShareView { copied: self.copied.is_some(), thanks: self.thanks.is_some() }
    }
}

impl Default for SharePanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser side of sharing. Every failure is logged and swallowed.
pub mod browser {
    use js_sys::{Function, Object, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys::Window;

    use super::{ShareData, ShareOutcome, ShareTarget, INSTAGRAM_HINT, POPUP_FEATURES};

    fn window() -> Result<Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    /// Current page URL, empty outside a browser.
    pub fn page_url() -> String {
        window()
            .and_then(|w| w.location().href())
            .unwrap_or_default()
    }

    fn navigator_method(object: &str, method: &str) -> Result<(JsValue, Function), JsValue> {
        let navigator = window()?.navigator();
        let target = if object.is_empty() {
            JsValue::from(navigator)
        } else {
            Reflect::get(&navigator, &JsValue::from_str(object))?
        };
        if target.is_undefined() {
            return Err(JsValue::from_str("navigator member missing"));
        }
        let func = Reflect::get(&target, &JsValue::from_str(method))?.dyn_into::<Function>()?;
        Ok((target, func))
    }

    pub fn has_native_share() -> bool {
        navigator_method("", "share").is_ok()
    }

    async fn write_clipboard(text: String) -> Result<(), JsValue> {
        let (clipboard, write) = navigator_method("clipboard", "writeText")?;
        let promise = write.call1(&clipboard, &JsValue::from_str(&text))?.dyn_into::<Promise>()?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    async fn native_share(data: ShareData) -> Result<(), JsValue> {
        let (navigator, share) = navigator_method("", "share")?;
        let payload = Object::new();
        Reflect::set(&payload, &"title".into(), &JsValue::from_str(&data.title))?;
        Reflect::set(&payload, &"text".into(), &JsValue::from_str(&data.text))?;
        Reflect::set(&payload, &"url".into(), &JsValue::from_str(&data.url))?;
        let promise = share.call1(&navigator, &payload)?.dyn_into::<Promise>()?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    /// Copy the clipboard text; reports `Copied` or `Failed`.
    pub fn copy(data: ShareData, done: impl FnOnce(ShareOutcome) + 'static) {
        spawn_local(async move {
            match write_clipboard(data.clipboard_text()).await {
                Ok(()) => done(ShareOutcome::Copied),
                Err(e) => {
                    log::debug!("copy failed: {:?}", e);
                    done(ShareOutcome::Failed);
                }
            }
        });
    }

    /// Native share sheet when the browser has one, copy otherwise.
    pub fn share_or_copy(data: ShareData, done: impl FnOnce(ShareOutcome) + 'static) {
        if !has_native_share() {
            copy(data, done);
            return;
        }
        spawn_local(async move {
            match native_share(data).await {
                Ok(()) => done(ShareOutcome::Shared),
                Err(e) => {
                    log::debug!("share cancelled: {:?}", e);
                    done(ShareOutcome::Failed);
                }
            }
        });
    }

    pub fn open_link(data: &ShareData, target: ShareTarget) {
        let link = data.link(target);
        let result = window().and_then(|w| match target {
            ShareTarget::Email => w.location().set_href(&link),
            _ if target.popup() => w
                .open_with_url_and_target_and_features(&link, "_blank", POPUP_FEATURES)
                .map(|_| ()),
            _ => w.open_with_url_and_target(&link, "_blank").map(|_| ()),
        });
        if let Err(e) = result {
            log::debug!("opening {:?} link failed: {:?}", target, e);
        }
    }

    /// Open a URL (the current photo) in a new tab.
    pub fn open_in_tab(url: &str) {
        if let Err(e) = window().and_then(|w| w.open_with_url_and_target(url, "_blank")) {
            log::debug!("opening {} failed: {:?}", url, e);
        }
    }

    /// Put the Instagram caption on the clipboard and explain what to do next.
    pub fn copy_for_instagram(data: &ShareData) {
        let caption = data.instagram_caption();
        spawn_local(async move {
            if let Err(e) = write_clipboard(caption).await {
                log::debug!("instagram copy failed: {:?}", e);
            }
        });
        if let Err(e) = window().and_then(|w| w.alert_with_message(INSTAGRAM_HINT)) {
            log::debug!("alert failed: {:?}", e);
        }
    }
}
