//! Verse fetch capability boundary.
//!
//! # Responsibility
//! - Define the contract concrete verse providers implement.
//! - Route fetches to the provider registered for a translation.
//!
//! # Invariants
//! - Core never performs network I/O itself; providers live outside this
//!   crate and are injected by the embedding shell.
//! - Fetch failures are typed and carry the translation they concern.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::reference::VerseKey;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod registry;

pub use registry::{FetcherRegistry, FetcherRegistryError};

/// Translation used when the caller does not name one.
pub const DEFAULT_TRANSLATION: &str = "BSB";

/// Failure reported by a verse fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure talking to the upstream source.
    Network { translation: String, detail: String },
    /// Upstream rejected the book/translation combination.
    UnresolvedBook { translation: String, book: String },
    /// No registered fetcher serves the translation.
    NoFetcher { translation: String },
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network {
                translation,
                detail,
            } => write!(f, "verse fetch failed for `{translation}`: {detail}"),
            Self::UnresolvedBook { translation, book } => {
                write!(f, "book `{book}` not available in translation `{translation}`")
            }
            Self::NoFetcher { translation } => {
                write!(f, "no fetcher registered for translation `{translation}`")
            }
        }
    }
}

impl Error for FetchError {}

/// Capability contract for verse text providers.
///
/// Implementations fetch the exact span named by the key and return its
/// plain text. They must be shareable across threads; the registry and the
/// scheduler hold them behind `Arc`.
pub trait VerseFetcher: Send + Sync {
    fn fetch_verse_text(&self, key: &VerseKey<'_>) -> Result<String, FetchError>;
}
