//! Core flashcard types for flashdeck.
//!
//! A [`Flashcard`] is one study item: a subject label plus the text shown on
//! its front and back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label shown, and filtered on, for cards with a blank subject.
pub const DEFAULT_SUBJECT: &str = "General";

/// Display label for a raw subject; blank subjects read as
/// [`DEFAULT_SUBJECT`].
#[must_use]
pub fn subject_label(subject: &str) -> &str {
    if subject.trim().is_empty() {
        DEFAULT_SUBJECT
    } else {
        subject
    }
}

/// A single study item.
///
/// Each card carries a stable `id` assigned at creation. Files written
/// before ids existed still load: a missing `id` is filled in with a fresh
/// one, which the store writes back when it opens the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Stable identifier, used to delete a specific card.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Subject the card is grouped under.
    #[serde(default)]
    pub subject: String,

    /// Prompt shown before flipping.
    pub front: String,

    /// Answer shown after flipping.
    pub back: String,

    /// When the card was created, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Flashcard {
    /// Create a new card with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            front: front.into(),
            back: back.into(),
            created_at: Some(Utc::now()),
        }
    }

    /// Build a card without a creation time, as found in seed data.
    fn seed(subject: &str, front: &str, back: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            front: front.to_string(),
            back: back.to_string(),
            created_at: None,
        }
    }

    /// Subject label for display and grouping.
    #[must_use]
    pub fn subject_label(&self) -> &str {
        subject_label(&self.subject)
    }
}

/// Built-in example cards used when no flashcard file can be read.
#[must_use]
pub fn seed_cards() -> Vec<Flashcard> {
    vec![
        Flashcard::seed(
            "Math",
            "➗ Quadratic Formula",
            concat!(
                "Solution for a quadratic equation $ax^2+bx+c=0$.",
                r"$$x=\\frac{-b\\pm\\sqrt{b^2-4ac}}{2a}$$"
            ),
        ),
        Flashcard::seed(
            "Physics",
            "🔬 Newton's Second Law",
            concat!("Force equals mass times acceleration.", r"$$F=ma$$"),
        ),
        Flashcard::seed(
            "Chemistry",
            "⚛️ Ideal Gas Law",
            concat!("Gas pressure-volume relation.", r"$$PV=nRT$$"),
        ),
    ]
}
