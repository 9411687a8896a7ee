//! Verse resolution use-case service.
//!
//! # Responsibility
//! - Resolve detected references to verse text, cache-aside.
//! - Record where each resolution was served from.
//!
//! # Invariants
//! - Cache hits never reach the fetcher.
//! - Fetch failures are surfaced, never cached and never retried here.
//! - Only successfully fetched text is written back to the cache.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::fetch::{FetchError, VerseFetcher, DEFAULT_TRANSLATION};
use crate::model::reference::{VerseKey, VerseReference};
use crate::repo::verse_cache_repo::VerseCacheRepository;
use crate::repo::RepoError;
use crate::service::now_epoch_ms;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Service error for verse resolution.
#[derive(Debug)]
pub enum VerseServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Upstream fetch failure.
    Fetch(FetchError),
}

impl Display for VerseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Fetch(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VerseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Fetch(err) => Some(err),
        }
    }
}

impl From<RepoError> for VerseServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<FetchError> for VerseServiceError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

/// One resolved verse span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVerse {
    /// Plain verse text for the whole requested span.
    pub text: String,
    /// Whether the text came out of the local cache.
    pub from_cache: bool,
}

/// Verse resolution facade over the cache repository and fetch capability.
pub struct VerseService<C: VerseCacheRepository> {
    cache: C,
    fetcher: Arc<dyn VerseFetcher>,
}

impl<C: VerseCacheRepository> VerseService<C> {
    /// Creates a service using the provided cache and fetcher.
    pub fn new(cache: C, fetcher: Arc<dyn VerseFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Resolves one reference in the default translation.
    pub fn resolve_default(
        &self,
        reference: &VerseReference,
    ) -> Result<ResolvedVerse, VerseServiceError> {
        self.resolve(reference, DEFAULT_TRANSLATION)
    }

    /// Resolves one reference in `translation`, cache first.
    ///
    /// Concurrent resolutions of the same key are not coalesced; each misses
    /// independently and the cache upsert is last-writer-wins.
    pub fn resolve(
        &self,
        reference: &VerseReference,
        translation: &str,
    ) -> Result<ResolvedVerse, VerseServiceError> {
        let started_at = Instant::now();
        let key = VerseKey::for_reference(reference, translation);

        if let Some(cached) = self.cache.get(&key)? {
            info!(
                "event=verse_resolve module=service status=ok source=cache translation={} book={} duration_ms={}",
                key.translation,
                key.book_id,
                started_at.elapsed().as_millis()
            );
            return Ok(ResolvedVerse {
                text: cached.text,
                from_cache: true,
            });
        }

        match self.fetcher.fetch_verse_text(&key) {
            Ok(text) => {
                self.cache.put(&key, &text, now_epoch_ms())?;
                info!(
                    "event=verse_resolve module=service status=ok source=fetch translation={} book={} duration_ms={}",
                    key.translation,
                    key.book_id,
                    started_at.elapsed().as_millis()
                );
                Ok(ResolvedVerse {
                    text,
                    from_cache: false,
                })
            }
            Err(err) => {
                error!(
                    "event=verse_resolve module=service status=error source=fetch translation={} book={} duration_ms={} error={}",
                    key.translation,
                    key.book_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}
