//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for early-stage UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures surface as `ok = false` envelopes with a diagnostic message.
//! - Reminder cancellation never reaches into OS notification registrations.
//!
//! # See also
//! - docs/architecture/data-model.md

use log::warn;
use rooted_core::db::open_db;
use rooted_core::{
    book_code, core_version as core_version_inner, init_logging as init_logging_inner,
    now_epoch_ms, ping as ping_inner, segment_text, NotificationRequest, NoteSummary,
    Notifier, NotifyError, RegistrationId, ReminderService, SettingsRepository,
    SqliteReminderRepository, SqliteSettingsRepository, SqliteVerseCacheRepository,
    StaticNoteDirectory, TextSegment, VerseCacheRepository, VerseKey, VerseReference,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

const CORE_DB_FILE_NAME: &str = "rooted_core.sqlite3";
static CORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One flattened segment of note text for the shell renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentItem {
    /// `text` or `verse`.
    pub kind: String,
    /// Verbatim slice of the note text.
    pub content: String,
    /// Parsed reference, present only for `verse` segments.
    pub reference: Option<VerseReferenceItem>,
}

/// Flattened verse reference for display and cache lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseReferenceItem {
    /// Canonical display label, e.g. `John 3:16`.
    pub label: String,
    /// Exact matched slice, including comma continuations.
    pub raw: String,
    /// Canonical USFM book code.
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
}

/// Verse cache lookup envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseLookupResponse {
    /// Whether the lookup itself executed.
    pub ok: bool,
    /// Whether a cached text was found.
    pub found: bool,
    /// Cached verse text when found.
    pub text: Option<String>,
    /// When the text was cached (epoch ms), when found.
    pub cached_at_ms: Option<i64>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl VerseLookupResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            found: false,
            text: None,
            cached_at_ms: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CoreActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Accountability interval envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalsResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Normalized interval days, ascending.
    pub days: Vec<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// One notification the shell must register with the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNotification {
    /// Reminder row id carried in the notification payload.
    pub reminder_id: String,
    /// When the notification should fire (epoch ms).
    pub fire_at_ms: i64,
    pub title: String,
    pub body: String,
}

/// Reminder scheduling envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlanResponse {
    /// Whether scheduling succeeded.
    pub ok: bool,
    /// Notifications to hand to the OS notification API, in fire order.
    pub registrations: Vec<PlannedNotification>,
    /// Intervals dropped because their fire time was already past.
    pub skipped_past: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl SchedulePlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            registrations: Vec::new(),
            skipped_past: 0,
            message: message.into(),
        }
    }
}

/// Cancellation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRemindersResponse {
    /// Whether cancellation executed.
    pub ok: bool,
    /// How many live reminders transitioned.
    pub canceled: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// One pending reminder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReminderItem {
    /// Reminder row id in string form.
    pub id: String,
    /// Note the reminder points back to.
    pub note_id: String,
    /// When the reminder fires (epoch ms).
    pub scheduled_for_ms: i64,
    /// Position of this reminder's day within the configured interval set.
    pub reminder_index: u32,
}

/// Pending reminders envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemindersResponse {
    /// Whether the query executed.
    pub ok: bool,
    /// Live future reminders across all notes, soonest first.
    pub items: Vec<PendingReminderItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Trigger transition envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkTriggeredResponse {
    /// Whether the call executed.
    pub ok: bool,
    /// Whether this call performed the `NULL -> timestamp` transition.
    pub transitioned: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Splits note text into plain and verse segments.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics.
/// - Segment contents concatenate back to the input text.
#[flutter_rust_bridge::frb(sync)]
pub fn segment_note_text(text: String) -> Vec<SegmentItem> {
    segment_text(&text).into_iter().map(to_segment_item).collect()
}

/// Looks up one verse span in the local cache.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Accepts USFM codes and human book names (`JHN`, `John`, `1 jn`).
/// - Never panics; `found = false` distinguishes a miss from a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn verse_cache_lookup(
    translation: String,
    book: String,
    chapter: u32,
    verse_start: u32,
    verse_end: u32,
) -> VerseLookupResponse {
    let key = match cache_key_parts(&translation, &book, chapter, verse_start, verse_end) {
        Ok(parts) => parts,
        Err(message) => return VerseLookupResponse::failure(message),
    };

    let result = with_verse_cache(|cache| {
        cache
            .get(&VerseKey {
                translation: &key.translation,
                book_id: key.book_id,
                chapter,
                verse_start,
                verse_end,
            })
            .map_err(|err| format!("verse_cache_lookup failed: {err}"))
    });

    match result {
        Ok(Some(cached)) => VerseLookupResponse {
            ok: true,
            found: true,
            text: Some(cached.text),
            cached_at_ms: Some(cached.cached_at),
            message: "Cache hit.".to_string(),
        },
        Ok(None) => VerseLookupResponse {
            ok: true,
            found: false,
            text: None,
            cached_at_ms: None,
            message: "Cache miss.".to_string(),
        },
        Err(message) => VerseLookupResponse::failure(message),
    }
}

/// Stores one verse text in the local cache.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Overwrites any existing entry for the same five-part key.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn verse_cache_store(
    translation: String,
    book: String,
    chapter: u32,
    verse_start: u32,
    verse_end: u32,
    text: String,
) -> CoreActionResponse {
    let key = match cache_key_parts(&translation, &book, chapter, verse_start, verse_end) {
        Ok(parts) => parts,
        Err(message) => return CoreActionResponse::failure(message),
    };

    let result = with_verse_cache(|cache| {
        cache
            .put(
                &VerseKey {
                    translation: &key.translation,
                    book_id: key.book_id,
                    chapter,
                    verse_start,
                    verse_end,
                },
                &text,
                now_epoch_ms(),
            )
            .map_err(|err| format!("verse_cache_store failed: {err}"))
    });

    match result {
        Ok(()) => CoreActionResponse::success("Verse cached."),
        Err(message) => CoreActionResponse::failure(message),
    }
}

/// Replaces the configured accountability intervals.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Out-of-range days are dropped; an all-invalid set is rejected and the
///   previous value survives.
/// - Never panics; returns the normalized days on success.
#[flutter_rust_bridge::frb(sync)]
pub fn set_accountability_intervals(days: Vec<i64>) -> IntervalsResponse {
    let result = with_settings_repo(|settings| {
        settings
            .set_accountability_intervals(&days)
            .map_err(|err| format!("set_accountability_intervals failed: {err}"))
    });

    match result {
        Ok(intervals) => IntervalsResponse {
            ok: true,
            days: intervals.days().to_vec(),
            message: "Intervals saved.".to_string(),
        },
        Err(message) => IntervalsResponse {
            ok: false,
            days: Vec::new(),
            message,
        },
    }
}

/// Reads the configured accountability intervals.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Falls back to the default interval set when nothing usable is stored.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn get_accountability_intervals() -> IntervalsResponse {
    let result = with_settings_repo(|settings| {
        settings
            .accountability_intervals()
            .map_err(|err| format!("get_accountability_intervals failed: {err}"))
    });

    match result {
        Ok(intervals) => IntervalsResponse {
            ok: true,
            days: intervals.days().to_vec(),
            message: String::new(),
        },
        Err(message) => IntervalsResponse {
            ok: false,
            days: Vec::new(),
            message,
        },
    }
}

/// Plans accountability reminders for one note.
///
/// Persists one reminder row per configured interval day that still lies in
/// the future, then returns the matching notifications for the shell to
/// register with the OS notification API.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `skipped_past` counts interval days whose fire time was already past.
#[flutter_rust_bridge::frb(sync)]
pub fn schedule_reminders_for_note(
    note_id: String,
    title: String,
    created_at_ms: i64,
) -> SchedulePlanResponse {
    let note_id = note_id.trim().to_string();
    if note_id.is_empty() {
        return SchedulePlanResponse::failure("note_id cannot be empty");
    }

    let summary = NoteSummary {
        id: note_id.clone(),
        title: title.trim().to_string(),
        created_at: created_at_ms,
    };

    let result = with_reminder_service(vec![summary], |service, notifier| {
        let outcome = service
            .schedule_for_note(&note_id)
            .map_err(|err| format!("schedule_reminders_for_note failed: {err}"))?;
        Ok((outcome, notifier.take_records()))
    });

    match result {
        Ok((outcome, records)) => {
            let registrations = records
                .into_iter()
                .map(|(fire_at_ms, request)| PlannedNotification {
                    reminder_id: request.payload.reminder_id.to_string(),
                    fire_at_ms,
                    title: request.title,
                    body: request.body,
                })
                .collect::<Vec<_>>();
            let message = format!(
                "Planned {} reminder(s), skipped {}.",
                registrations.len(),
                outcome.skipped_past
            );
            SchedulePlanResponse {
                ok: true,
                registrations,
                skipped_past: outcome.skipped_past,
                message,
            }
        }
        Err(message) => SchedulePlanResponse::failure(message),
    }
}

/// Cancels every live reminder of one note.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Storage-side only; OS registrations stay put and are filtered out when
///   they later fire.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cancel_reminders_for_note(note_id: String) -> CancelRemindersResponse {
    let result = with_reminder_service(Vec::new(), |service, _notifier| {
        service
            .cancel_for_note(note_id.trim())
            .map_err(|err| format!("cancel_reminders_for_note failed: {err}"))
    });

    match result {
        Ok(canceled) => CancelRemindersResponse {
            ok: true,
            canceled: canceled as u32,
            message: format!("Canceled {canceled} reminder(s)."),
        },
        Err(message) => CancelRemindersResponse {
            ok: false,
            canceled: 0,
            message,
        },
    }
}

/// Lists live reminders whose fire time is still ahead.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Ordering is deterministic: fire time, then id.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn pending_reminders() -> PendingRemindersResponse {
    let result = with_reminder_service(Vec::new(), |service, _notifier| {
        service
            .pending_reminders()
            .map_err(|err| format!("pending_reminders failed: {err}"))
    });

    match result {
        Ok(reminders) => PendingRemindersResponse {
            ok: true,
            items: reminders
                .into_iter()
                .map(|reminder| PendingReminderItem {
                    id: reminder.id.to_string(),
                    note_id: reminder.note_id,
                    scheduled_for_ms: reminder.scheduled_for,
                    reminder_index: reminder.reminder_index,
                })
                .collect(),
            message: String::new(),
        },
        Err(message) => PendingRemindersResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

/// Marks one reminder as delivered.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Idempotent: only the first call transitions; repeats and unknown ids
///   report `transitioned = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn mark_reminder_triggered(reminder_id: String) -> MarkTriggeredResponse {
    let id = match Uuid::parse_str(reminder_id.trim()) {
        Ok(id) => id,
        Err(_) => {
            return MarkTriggeredResponse {
                ok: false,
                transitioned: false,
                message: format!("invalid reminder id `{reminder_id}`"),
            };
        }
    };

    let result = with_reminder_service(Vec::new(), |service, _notifier| {
        service
            .mark_triggered(id)
            .map_err(|err| format!("mark_reminder_triggered failed: {err}"))
    });

    match result {
        Ok(transitioned) => MarkTriggeredResponse {
            ok: true,
            transitioned,
            message: String::new(),
        },
        Err(message) => MarkTriggeredResponse {
            ok: false,
            transitioned: false,
            message,
        },
    }
}

/// Notifier that records requests instead of talking to an OS API.
///
/// The shell owns actual OS registration; core runs against this collector
/// and the resulting plan is returned across the boundary.
#[derive(Default)]
struct CollectingNotifier {
    records: Mutex<Vec<(i64, NotificationRequest)>>,
}

impl CollectingNotifier {
    fn take_records(&self) -> Vec<(i64, NotificationRequest)> {
        self.records
            .lock()
            .map(|mut records| std::mem::take(&mut *records))
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn schedule_at(
        &self,
        fire_at_ms: i64,
        request: &NotificationRequest,
    ) -> Result<RegistrationId, NotifyError> {
        let mut records = self.records.lock().map_err(|_| NotifyError::Rejected {
            detail: "notifier state poisoned".to_string(),
        })?;
        records.push((fire_at_ms, request.clone()));
        Ok(format!("plan-{}", records.len()))
    }
}

struct CacheKeyParts {
    translation: String,
    book_id: &'static str,
}

fn cache_key_parts(
    translation: &str,
    book: &str,
    chapter: u32,
    verse_start: u32,
    verse_end: u32,
) -> Result<CacheKeyParts, String> {
    let translation = translation.trim();
    if translation.is_empty() {
        return Err("translation cannot be empty".to_string());
    }
    let Some(book_id) = book_code(book) else {
        return Err(format!("unknown book `{book}`"));
    };
    if chapter == 0 || verse_start == 0 {
        return Err("chapter and verse_start must be >= 1".to_string());
    }
    if verse_end < verse_start {
        return Err(format!(
            "verse_end {verse_end} precedes verse_start {verse_start}"
        ));
    }
    Ok(CacheKeyParts {
        translation: translation.to_string(),
        book_id,
    })
}

fn resolve_core_db_path() -> PathBuf {
    CORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ROOTED_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(CORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_verse_cache<T>(
    f: impl FnOnce(&SqliteVerseCacheRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_core_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!(
            "event=ffi_db_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("core DB open failed: {err}")
    })?;
    let cache = SqliteVerseCacheRepository::try_new(&conn)
        .map_err(|err| format!("verse cache init failed: {err}"))?;
    f(&cache)
}

fn with_settings_repo<T>(
    f: impl FnOnce(&SqliteSettingsRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_core_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!(
            "event=ffi_db_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("core DB open failed: {err}")
    })?;
    let settings = SqliteSettingsRepository::try_new(&conn)
        .map_err(|err| format!("settings repo init failed: {err}"))?;
    f(&settings)
}

fn with_reminder_service<T>(
    notes: Vec<NoteSummary>,
    f: impl FnOnce(
        &ReminderService<SqliteReminderRepository<'_>, SqliteSettingsRepository<'_>>,
        &CollectingNotifier,
    ) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_core_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!(
            "event=ffi_db_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("core DB open failed: {err}")
    })?;
    let reminders = SqliteReminderRepository::try_new(&conn)
        .map_err(|err| format!("reminder repo init failed: {err}"))?;
    let settings = SqliteSettingsRepository::try_new(&conn)
        .map_err(|err| format!("settings repo init failed: {err}"))?;
    let notifier = Arc::new(CollectingNotifier::default());
    let service = ReminderService::new(
        reminders,
        settings,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::new(StaticNoteDirectory::new(notes)),
    );
    f(&service, notifier.as_ref())
}

fn to_segment_item(segment: TextSegment) -> SegmentItem {
    match segment {
        TextSegment::Text { content } => SegmentItem {
            kind: "text".to_string(),
            content,
            reference: None,
        },
        TextSegment::Verse { content, reference } => SegmentItem {
            kind: "verse".to_string(),
            content,
            reference: Some(to_reference_item(reference)),
        },
    }
}

fn to_reference_item(reference: VerseReference) -> VerseReferenceItem {
    VerseReferenceItem {
        label: reference.display_label(),
        raw: reference.raw,
        book_id: reference.book_id.to_string(),
        chapter: reference.chapter,
        verse_start: reference.verse_start,
        verse_end: reference.verse_end,
    }
}
