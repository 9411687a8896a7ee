//! Core domain logic for Rooted.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod detect;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use detect::{detect_references, segment_text};
pub use fetch::{
    FetchError, FetcherRegistry, FetcherRegistryError, VerseFetcher, DEFAULT_TRANSLATION,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{book_code, book_name};
pub use model::intervals::{IntervalValidationError, ReminderIntervals};
pub use model::note::{NoteDirectory, NoteDirectoryError, NoteId, NoteSummary, StaticNoteDirectory};
pub use model::reference::{TextSegment, VerseKey, VerseReference};
pub use model::reminder::{AccountabilityReminder, ReminderId};
pub use notify::{NotificationPayload, NotificationRequest, Notifier, NotifyError, RegistrationId};
pub use repo::reminder_repo::{ReminderRepository, SqliteReminderRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::verse_cache_repo::{CachedVerse, SqliteVerseCacheRepository, VerseCacheRepository};
pub use repo::{RepoError, RepoResult};
pub use service::reminder_service::{ReminderService, ReminderServiceError, ScheduleOutcome};
pub use service::scheduler_worker::{SchedulerGone, SchedulerHandle, SchedulerSpawnError};
pub use service::verse_service::{ResolvedVerse, VerseService, VerseServiceError};
pub use service::{now_epoch_ms, MS_PER_DAY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
