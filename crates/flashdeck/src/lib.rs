//! `flashdeck` - A small study aid for flipping through flashcards
//!
//! This library provides the credential and flashcard stores, the per-session
//! study navigator, and the interactive shell that ties them together.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod shell;
pub mod storage;

pub use app::{App, Status};
pub use card::Flashcard;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use session::{Navigator, Session};
pub use shell::Shell;
pub use storage::{CredentialStore, FlashcardStore, SeedPolicy};
