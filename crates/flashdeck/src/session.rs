//! Per-session study state.
//!
//! A [`Session`] lives for one run of the shell. It holds the login fields
//! and a [`Navigator`] over the card list. Nothing here is persisted.

use tracing::debug;

use crate::card::Flashcard;
use crate::error::{Error, Result};

/// Cursor over the card list plus the flip flag.
///
/// The navigator never holds the cards themselves; callers pass the current
/// list (or its length) so the cursor stays valid after cards are added or
/// deleted. The index is always resolved modulo the list length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    current_index: usize,
    is_flipped: bool,
}

impl Navigator {
    /// Create a navigator at the first card, front showing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cursor value.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether the back of the card is showing.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    /// The cursor resolved against a list of `len` cards.
    #[must_use]
    pub fn position(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.current_index % len)
    }

    /// Advance to the next card, wrapping to the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if `len` is 0; state is left unchanged.
    pub fn next(&mut self, len: usize) -> Result<()> {
        let position = self.position(len).ok_or(Error::EmptyStore)?;
        self.current_index = (position + 1) % len;
        self.is_flipped = false;
        debug!("Moved to card {}/{}", self.current_index + 1, len);
        Ok(())
    }

    /// Go back to the previous card, wrapping to the last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if `len` is 0; state is left unchanged.
    pub fn previous(&mut self, len: usize) -> Result<()> {
        let position = self.position(len).ok_or(Error::EmptyStore)?;
        self.current_index = (position + len - 1) % len;
        self.is_flipped = false;
        debug!("Moved to card {}/{}", self.current_index + 1, len);
        Ok(())
    }

    /// Show the other side of the current card.
    pub fn toggle_flip(&mut self) {
        self.is_flipped = !self.is_flipped;
    }

    /// The card under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if `cards` is empty.
    pub fn current_card<'a>(&self, cards: &'a [Flashcard]) -> Result<&'a Flashcard> {
        self.position(cards.len())
            .map(|p| &cards[p])
            .ok_or(Error::EmptyStore)
    }
}

/// Explicit session context.
///
/// Created when the shell starts. Logging out clears the login fields but
/// keeps the navigator where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
    /// Study position and flip state.
    pub navigator: Navigator,
}

impl Session {
    /// Start a logged-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.username.is_some()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Mark `username` as logged in.
    pub fn log_in(&mut self, username: impl Into<String>) {
        let username = username.into();
        debug!("Session started for {}", username);
        self.username = Some(username);
    }

    /// Clear the login fields.
    pub fn log_out(&mut self) {
        if let Some(username) = self.username.take() {
            debug!("Session ended for {}", username);
        }
    }
}
