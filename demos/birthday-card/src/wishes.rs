use serde::Serialize;

/// Number of wishes the wish step collects.
pub const WISH_CAP: usize = 3;

/// Why a wish was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishRejection {
    /// Nothing left after trimming whitespace.
    Empty,
    /// The list already holds `WISH_CAP` wishes.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishOutcome {
    /// Stored; `count` is the number of wishes now held.
    Accepted { count: usize },
    Rejected(WishRejection),
}

impl WishOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, WishOutcome::Accepted { .. })
    }
}

/// Wishes entered so far, capped at `WISH_CAP`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct WishList {
    wishes: Vec<String>,
}

impl WishList {
    pub fn new() -> Self {
        Self { wishes: Vec::with_capacity(WISH_CAP) }
    }

    /// Trim and store a wish. Blank input and input past the cap change nothing.
    pub fn submit(&mut self, text: &str) -> WishOutcome {
        if self.is_full() {
            return WishOutcome::Rejected(WishRejection::Full);
        }
        let wish = text.trim();
        if wish.is_empty() {
            return WishOutcome::Rejected(WishRejection::Empty);
        }
        self.wishes.push(wish.to_string());
        WishOutcome::Accepted { count: self.wishes.len() }
    }

    /// Prompt for the next wish, or None once the list is full.
    pub fn prompt<'a>(&self, prompts: &'a [String]) -> Option<&'a str> {
        if self.is_full() {
            return None;
        }
        prompts.get(self.wishes.len()).map(String::as_str)
    }

    pub fn is_full(&self) -> bool {
        self.wishes.len() >= WISH_CAP
    }

    pub fn len(&self) -> usize {
        self.wishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wishes.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.wishes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts() -> Vec<String> {
        ["a?", "b?", "c?", "d?"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_wish_is_rejected_without_change() {
        let mut list = WishList::new();
        assert_eq!(list.submit("   \t"), WishOutcome::Rejected(WishRejection::Empty));
        assert!(list.is_empty());
    }

    #[test]
    fn wishes_are_trimmed_and_counted() {
        let mut list = WishList::new();
        assert_eq!(list.submit("  travel  "), WishOutcome::Accepted { count: 1 });
        assert_eq!(list.as_slice(), ["travel".to_string()]);
    }

    #[test]
    fn cap_rejects_further_input() {
        let mut list = WishList::new();
        for (i, w) in ["one", "two", "three"].iter().enumerate() {
            assert_eq!(list.submit(w), WishOutcome::Accepted { count: i + 1 });
        }
        assert!(list.is_full());
        assert_eq!(list.submit("four"), WishOutcome::Rejected(WishRejection::Full));
        assert_eq!(list.len(), WISH_CAP);
    }

    #[test]
    fn prompt_follows_wish_count() {
        let prompts = prompts();
        let mut list = WishList::new();
        assert_eq!(list.prompt(&prompts), Some("a?"));
        list.submit("x");
        assert_eq!(list.prompt(&prompts), Some("b?"));
        list.submit("y");
        list.submit("z");
        assert_eq!(list.prompt(&prompts), None);
    }
}
