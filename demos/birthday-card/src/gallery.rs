use std::collections::BTreeSet;
use std::time::Duration;

use party_engine::{Scheduler, TimerId};
use serde::Serialize;

use crate::content::Photo;
use crate::renderer::{Completion, Finish};

const AUTO_ADVANCE: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GalleryTimer {
    Advance,
}

/// Photo carousel with auto-play and session favourites.
///
/// Any manual navigation turns auto-play off; it only comes back through
/// `set_autoplay(true)`. Favourites toggled here live as long as the mount.
pub struct Gallery {
    photos: Vec<Photo>,
    current: usize,
    autoplay: Option<TimerId>,
    favorites: BTreeSet<u32>,
    timers: Scheduler<GalleryTimer>,
    close_requested: bool,
    finish: Finish,
}

#[derive(Debug, Serialize)]
pub struct GalleryView<'a> {
    pub index: usize,
    pub total: usize,
    pub photo: Option<&'a Photo>,
    pub favorite: bool,
    pub autoplay: bool,
    /// Distinct photos shown as favourite.
    pub favorites: usize,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Serialize)]
pub struct Thumbnail {
    pub id: u32,
    pub favorite: bool,
    pub current: bool,
}

impl Gallery {
    pub fn new(photos: Vec<Photo>) -> Self {
        let mut gallery = Self {
            photos,
            current: 0,
            autoplay: None,
            favorites: BTreeSet::new(),
            timers: Scheduler::new(),
            close_requested: false,
            finish: Finish::new(),
        };
        gallery.set_autoplay(true);
        gallery
    }

    pub fn next(&mut self) {
        self.set_autoplay(false);
        self.step_forward();
    }

    pub fn prev(&mut self) {
        self.set_autoplay(false);
        let len = self.photos.len();
        if len > 0 {
            self.current = (self.current + len - 1) % len;
        }
    }

    /// Jump to a thumbnail. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.photos.len() {
            log::debug!("gallery select {} out of range", index);
            return false;
        }
        self.set_autoplay(false);
        self.current = index;
        true
    }

    pub fn set_autoplay(&mut self, on: bool) {
        match (on, self.autoplay) {
            (true, None) => {
                self.autoplay = Some(self.timers.every(AUTO_ADVANCE, GalleryTimer::Advance));
            }
            (false, Some(id)) => {
                self.timers.cancel(id);
                self.autoplay = None;
            }
            _ => {}
        }
    }

    pub fn is_autoplay(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Flip the session favourite flag of a photo. Returns the new flag.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn toggle_current_favorite(&mut self) -> Option<bool> {
        let id = self.current_photo()?.id;
        Some(self.toggle_favorite(id))
    }

    /// Shown as favourite when toggled this session or flagged in the catalog.
    pub fn is_favorite(&self, photo: &Photo) -> bool {
        photo.is_favorite || self.favorites.contains(&photo.id)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.photos.get(self.current)
    }

    /// Ask the gallery to close. Completion is reported on the next tick.
    pub fn close(&mut self) {
        self.close_requested = true;
    }

    pub fn tick(&mut self, dt: Duration) -> Completion {
        for timer in self.timers.advance(dt) {
            match timer {
                GalleryTimer::Advance => self.step_forward(),
            }
        }
        if self.close_requested {
            self.finish.report()
        } else {
            Completion::Pending
        }
    }

    fn step_forward(&mut self) {
        let len = self.photos.len();
        if len > 0 {
            self.current = (self.current + 1) % len;
        }
    }

    pub fn view(&self) -> GalleryView<'_> {
        let thumbnails = self
            .photos
            .iter()
            .enumerate()
            .map(|(i, p)| Thumbnail {
                id: p.id,
                favorite: self.is_favorite(p),
                current: i == self.current,
            })
            .collect::<Vec<_>>();
        GalleryView {
            index: self.current,
            total: self.photos.len(),
            photo: self.current_photo(),
            favorite: self.current_photo().map(|p| self.is_favorite(p)).unwrap_or(false),
            autoplay: self.is_autoplay(),
            favorites: thumbnails.iter().filter(|t| t.favorite).count(),
            thumbnails,
        }
    }
}
