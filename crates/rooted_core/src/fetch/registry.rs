//! In-process fetcher registry keyed by translation id.

use crate::fetch::{FetchError, VerseFetcher};
use crate::model::reference::VerseKey;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Fetcher registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetcherRegistryError {
    InvalidTranslationId(String),
    DuplicateTranslationId(String),
}

impl Display for FetcherRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTranslationId(value) => write!(f, "translation id is invalid: {value}"),
            Self::DuplicateTranslationId(value) => {
                write!(f, "translation id already registered: {value}")
            }
        }
    }
}

impl Error for FetcherRegistryError {}

/// Runtime verse fetcher registry.
///
/// Holds one fetcher per translation id plus an optional default that
/// serves every translation without a dedicated entry. The registry itself
/// implements [`VerseFetcher`] by routing on the key's translation.
#[derive(Default)]
pub struct FetcherRegistry {
    fetchers: BTreeMap<String, Arc<dyn VerseFetcher>>,
    default_fetcher: Option<Arc<dyn VerseFetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one fetcher as dedicated handler for `translation`.
    pub fn register_for_translation(
        &mut self,
        translation: &str,
        fetcher: Arc<dyn VerseFetcher>,
    ) -> Result<(), FetcherRegistryError> {
        let translation_id = translation.trim().to_string();
        if !is_valid_translation_id(&translation_id) {
            return Err(FetcherRegistryError::InvalidTranslationId(translation_id));
        }
        if self.fetchers.contains_key(translation_id.as_str()) {
            return Err(FetcherRegistryError::DuplicateTranslationId(translation_id));
        }

        self.fetchers.insert(translation_id, fetcher);
        Ok(())
    }

    /// Sets the fallback fetcher used for unregistered translations.
    pub fn set_default(&mut self, fetcher: Arc<dyn VerseFetcher>) {
        self.default_fetcher = Some(fetcher);
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// Returns sorted dedicated translation ids.
    pub fn translation_ids(&self) -> Vec<String> {
        self.fetchers.keys().cloned().collect()
    }

    /// Returns the fetcher serving `translation`, dedicated or default.
    pub fn fetcher_for(&self, translation: &str) -> Option<Arc<dyn VerseFetcher>> {
        self.fetchers
            .get(translation.trim())
            .cloned()
            .or_else(|| self.default_fetcher.clone())
    }
}

impl VerseFetcher for FetcherRegistry {
    fn fetch_verse_text(&self, key: &VerseKey<'_>) -> Result<String, FetchError> {
        match self.fetcher_for(key.translation) {
            Some(fetcher) => fetcher.fetch_verse_text(key),
            None => Err(FetchError::NoFetcher {
                translation: key.translation.to_string(),
            }),
        }
    }
}

fn is_valid_translation_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
