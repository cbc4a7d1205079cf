//! Ordered flashcard collection backed by a JSON array.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{bootstrap_json, read_json, write_json};
use crate::card::{seed_cards, subject_label, Flashcard};
use crate::error::{Error, Result};

/// What to use when the flashcard file is missing or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Fall back to the built-in example cards.
    #[default]
    Examples,
    /// Fall back to an empty collection.
    Empty,
}

impl SeedPolicy {
    /// The collection this policy falls back to.
    #[must_use]
    pub fn fallback(self) -> Vec<Flashcard> {
        match self {
            Self::Examples => seed_cards(),
            Self::Empty => Vec::new(),
        }
    }
}

impl From<bool> for SeedPolicy {
    fn from(seed_examples: bool) -> Self {
        if seed_examples {
            Self::Examples
        } else {
            Self::Empty
        }
    }
}

/// Cards sharing one subject, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectGroup<'a> {
    /// Display label shared by every entry; blank subjects group under
    /// [`crate::card::DEFAULT_SUBJECT`].
    pub subject: &'a str,
    /// `(position, card)` pairs; positions index into the full list.
    pub entries: Vec<(usize, &'a Flashcard)>,
}

/// File-backed, ordered flashcard collection.
///
/// The in-memory list is authoritative for the session. Every mutation
/// rewrites the whole file; if that write fails the error is returned and
/// memory stays ahead of disk until the next successful write.
#[derive(Debug)]
pub struct FlashcardStore {
    path: PathBuf,
    policy: SeedPolicy,
    cards: Vec<Flashcard>,
}

impl FlashcardStore {
    /// Open the store at `path`.
    ///
    /// If the file doesn't exist it is created with the policy's initial
    /// collection; then the file is loaded. Records written without an `id`
    /// are given one and the file is rewritten so the ids stay stable.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created.
    pub fn open(path: impl AsRef<Path>, policy: SeedPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if bootstrap_json(&path, &policy.fallback())? {
            info!("Created flashcard store at {}", path.display());
        }

        let mut store = Self {
            path,
            policy,
            cards: Vec::new(),
        };
        store.cards = store.load();
        if store.has_records_without_id() {
            match store.persist() {
                Ok(()) => info!("Assigned ids to legacy cards in {}", store.path.display()),
                Err(e) => warn!("{e}; legacy card ids will change on the next load"),
            }
        }
        debug!(
            "Flashcard store opened at {} with {} cards",
            store.path.display(),
            store.cards.len()
        );
        Ok(store)
    }

    /// Get the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file.
    ///
    /// A missing or unparsable file yields the seed policy's fallback.
    #[must_use]
    pub fn load(&self) -> Vec<Flashcard> {
        match read_json(&self.path) {
            Ok(cards) => cards,
            Err(e) => {
                warn!("{e}; using {:?} fallback", self.policy);
                self.policy.fallback()
            }
        }
    }

    /// Check whether the backing file holds records that predate ids.
    fn has_records_without_id(&self) -> bool {
        read_json::<Vec<serde_json::Value>>(&self.path)
            .is_ok_and(|records| records.iter().any(|r| r.get("id").is_none()))
    }

    /// Discard in-memory changes and re-read the backing file.
    pub fn reload(&mut self) {
        self.cards = self.load();
    }

    /// All cards, in persisted order.
    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if there are no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the card at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Flashcard> {
        self.cards.get(position)
    }

    /// Find the current position of the card with `id`.
    #[must_use]
    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Add a card to the end of the list and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if saving fails; the card stays in
    /// memory.
    pub fn append(&mut self, card: Flashcard) -> Result<()> {
        info!("Adding card {} under {:?}", card.id, card.subject);
        self.cards.push(card);
        self.persist()
    }

    /// Remove the card at `position` and save.
    ///
    /// # Errors
    ///
    /// - [`Error::Index`] if `position` is out of bounds
    /// - [`Error::StorageWrite`] if saving fails; the card stays removed
    ///   from memory
    pub fn delete_at(&mut self, position: usize) -> Result<Flashcard> {
        if position >= self.cards.len() {
            return Err(Error::Index {
                position,
                len: self.cards.len(),
            });
        }

        let removed = self.cards.remove(position);
        info!("Deleted card {} at position {}", removed.id, position);
        self.persist()?;
        Ok(removed)
    }

    /// Remove the card with `id` and save.
    ///
    /// # Errors
    ///
    /// - [`Error::CardNotFound`] if no card has that id
    /// - [`Error::StorageWrite`] if saving fails
    pub fn delete(&mut self, id: Uuid) -> Result<Flashcard> {
        let position = self.position_of(id).ok_or(Error::CardNotFound(id))?;
        self.delete_at(position)
    }

    /// Replace the whole collection and save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if saving fails.
    pub fn replace_all(&mut self, cards: Vec<Flashcard>) -> Result<()> {
        self.cards = cards;
        self.persist()
    }

    /// Overwrite the backing file with the in-memory list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the file cannot be written.
    pub fn persist(&self) -> Result<()> {
        write_json(&self.path, &self.cards)
    }

    /// Distinct subject labels, sorted.
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        self.cards
            .iter()
            .map(Flashcard::subject_label)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Group cards by subject, in order of first appearance.
    ///
    /// Grouping and `filter` both match on the subject label, so blank
    /// subjects are reachable as a group of their own.
    #[must_use]
    pub fn grouped_by_subject(&self, filter: Option<&str>) -> Vec<SubjectGroup<'_>> {
        let mut groups: Vec<SubjectGroup<'_>> = Vec::new();

        for (position, card) in self.cards.iter().enumerate() {
            let label = card.subject_label();
            if filter.is_some_and(|f| subject_label(f) != label) {
                continue;
            }
            match groups.iter_mut().find(|g| g.subject == label) {
                Some(group) => group.entries.push((position, card)),
                None => groups.push(SubjectGroup {
                    subject: label,
                    entries: vec![(position, card)],
                }),
            }
        }

        groups
    }
}
