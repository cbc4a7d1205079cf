//! Application state shared by the shell and the CLI.
//!
//! [`App`] owns both stores and the [`Session`], and exposes the actions
//! the views trigger. Each action runs to completion before returning.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::card::Flashcard;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::{CredentialStore, FlashcardStore, SeedPolicy};

/// Message returned when a card is created.
pub const CARD_ADDED: &str = "Flashcard added!";

/// The stores plus the current session.
#[derive(Debug)]
pub struct App {
    credentials: CredentialStore,
    flashcards: FlashcardStore,
    session: Session,
}

/// Snapshot of where data lives and how much of it there is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Credential file path.
    pub users_file: PathBuf,
    /// Flashcard file path.
    pub flashcards_file: PathBuf,
    /// Number of registered users.
    pub user_count: usize,
    /// Number of cards.
    pub card_count: usize,
    /// Distinct subjects, sorted.
    pub subjects: Vec<String>,
}

impl App {
    /// Open both stores at the paths named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either backing file cannot be created.
    pub fn open(config: &Config) -> Result<Self> {
        let credentials = CredentialStore::open(config.users_path())?;
        let flashcards = FlashcardStore::open(
            config.flashcards_path(),
            SeedPolicy::from(config.flashcards.seed_examples),
        )?;

        Ok(Self {
            credentials,
            flashcards,
            session: Session::new(),
        })
    }

    /// The current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The flashcard collection.
    #[must_use]
    pub fn flashcards(&self) -> &FlashcardStore {
        &self.flashcards
    }

    /// The credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// See [`CredentialStore::signup`].
    pub fn signup(&self, username: &str, password: &str) -> Result<&'static str> {
        self.credentials.signup(username, password)
    }

    /// Verify credentials and start the session on success.
    ///
    /// # Errors
    ///
    /// See [`CredentialStore::login`]; the session is unchanged on failure.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&'static str> {
        let message = self.credentials.login(username, password)?;
        self.session.log_in(username.trim());
        Ok(message)
    }

    /// End the session's login. Study position is kept.
    pub fn logout(&mut self) {
        self.session.log_out();
    }

    /// The card under the study cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if there are no cards.
    pub fn current_card(&self) -> Result<&Flashcard> {
        self.session.navigator.current_card(self.flashcards.cards())
    }

    /// Move to the next card.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if there are no cards.
    pub fn next_card(&mut self) -> Result<()> {
        self.session.navigator.next(self.flashcards.len())
    }

    /// Move to the previous card.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStore`] if there are no cards.
    pub fn previous_card(&mut self) -> Result<()> {
        self.session.navigator.previous(self.flashcards.len())
    }

    /// Flip the current card.
    pub fn flip(&mut self) {
        self.session.navigator.toggle_flip();
    }

    /// Validate and append a new card.
    ///
    /// Front and back must be non-blank; the subject is stored as typed and
    /// may be empty.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if front or back is blank
    /// - [`Error::StorageWrite`] if saving fails
    pub fn create_card(&mut self, subject: &str, front: &str, back: &str) -> Result<&'static str> {
        if front.trim().is_empty() || back.trim().is_empty() {
            return Err(Error::validation("Fill both front and back"));
        }

        self.flashcards.append(Flashcard::new(subject, front, back))?;
        Ok(CARD_ADDED)
    }

    /// Delete a card by id.
    ///
    /// # Errors
    ///
    /// - [`Error::CardNotFound`] if no card has that id
    /// - [`Error::StorageWrite`] if saving fails
    pub fn delete_card(&mut self, id: Uuid) -> Result<Flashcard> {
        let removed = self.flashcards.delete(id)?;
        if let Some(username) = self.session.username() {
            info!("{} deleted card {}", username, removed.id);
        }
        Ok(removed)
    }

    /// Summarize both stores.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            users_file: self.credentials.path().to_path_buf(),
            flashcards_file: self.flashcards.path().to_path_buf(),
            user_count: self.credentials.user_count(),
            card_count: self.flashcards.len(),
            subjects: self
                .flashcards
                .subjects()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
