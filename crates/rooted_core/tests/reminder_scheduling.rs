use rooted_core::db::migrations::latest_version;
use rooted_core::db::open_db_in_memory;
use rooted_core::service::reminder_service::REFLECTION_PROMPTS;
use rooted_core::{
    now_epoch_ms, NotificationPayload, NotificationRequest, Notifier, NoteSummary, NotifyError,
    RegistrationId, ReminderRepository, ReminderService, ReminderServiceError, RepoError,
    SettingsRepository, SqliteReminderRepository, SqliteSettingsRepository, StaticNoteDirectory,
    MS_PER_DAY,
};
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

struct RecordingNotifier {
    registrations: Mutex<Vec<(i64, NotificationRequest)>>,
    fail_calls: Vec<usize>,
    calls: AtomicUsize,
}

impl RecordingNotifier {
    fn accepting() -> Arc<Self> {
        Self::failing_calls(Vec::new())
    }

    fn failing_calls(fail_calls: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            registrations: Mutex::new(Vec::new()),
            fail_calls,
            calls: AtomicUsize::new(0),
        })
    }

    fn recorded(&self) -> Vec<(i64, NotificationRequest)> {
        self.registrations.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn schedule_at(
        &self,
        fire_at_ms: i64,
        request: &NotificationRequest,
    ) -> Result<RegistrationId, NotifyError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls.contains(&call) {
            return Err(NotifyError::Rejected {
                detail: "quota exceeded".to_string(),
            });
        }
        self.registrations
            .lock()
            .unwrap()
            .push((fire_at_ms, request.clone()));
        Ok(format!("reg-{call}"))
    }
}

fn service_for<'c>(
    conn: &'c Connection,
    notifier: Arc<RecordingNotifier>,
    notes: Vec<NoteSummary>,
) -> ReminderService<SqliteReminderRepository<'c>, SqliteSettingsRepository<'c>> {
    let reminders = SqliteReminderRepository::try_new(conn).unwrap();
    let settings = SqliteSettingsRepository::try_new(conn).unwrap();
    ReminderService::new(
        reminders,
        settings,
        notifier,
        Arc::new(StaticNoteDirectory::new(notes)),
    )
}

fn note(id: &str, title: &str, created_at: i64) -> NoteSummary {
    NoteSummary {
        id: id.to_string(),
        title: title.to_string(),
        created_at,
    }
}

#[test]
fn fresh_note_gets_one_reminder_per_interval_day() {
    let conn = open_db_in_memory().unwrap();
    SqliteSettingsRepository::try_new(&conn)
        .unwrap()
        .set_accountability_intervals(&[3, 20])
        .unwrap();

    let notifier = RecordingNotifier::accepting();
    let created_at = now_epoch_ms();
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Fasting", created_at)]);

    let outcome = service.schedule_for_note("n1").unwrap();

    assert_eq!(outcome.scheduled.len(), 2);
    assert_eq!(outcome.skipped_past, 0);
    assert_eq!(outcome.failed_registrations, 0);

    let rows = SqliteReminderRepository::try_new(&conn)
        .unwrap()
        .list_for_note("n1")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].reminder_index, 0);
    assert_eq!(rows[0].scheduled_for, created_at + 3 * MS_PER_DAY);
    assert_eq!(rows[1].reminder_index, 1);
    assert_eq!(rows[1].scheduled_for, created_at + 20 * MS_PER_DAY);

    let recorded = notifier.recorded();
    assert_eq!(recorded.len(), 2);
    for (fire_at, request) in &recorded {
        assert_eq!(request.title, "Time to Reflect: Fasting");
        assert!(REFLECTION_PROMPTS.contains(&request.body.as_str()));
        assert_eq!(request.payload.note_id, "n1");
        assert!(rows.iter().any(|row| row.scheduled_for == *fire_at));
        assert!(rows.iter().any(|row| row.id == request.payload.reminder_id));
    }
}

#[test]
fn past_fire_times_are_skipped_but_keep_their_interval_index() {
    let conn = open_db_in_memory().unwrap();
    SqliteSettingsRepository::try_new(&conn)
        .unwrap()
        .set_accountability_intervals(&[5, 20])
        .unwrap();

    let notifier = RecordingNotifier::accepting();
    let created_at = now_epoch_ms() - 10 * MS_PER_DAY;
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Old note", created_at)]);

    let outcome = service.schedule_for_note("n1").unwrap();

    assert_eq!(outcome.scheduled.len(), 1);
    assert_eq!(outcome.skipped_past, 1);

    let rows = SqliteReminderRepository::try_new(&conn)
        .unwrap()
        .list_for_note("n1")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reminder_index, 1);
    assert_eq!(notifier.recorded().len(), 1);
}

#[test]
fn note_older_than_every_interval_schedules_nothing() {
    let conn = open_db_in_memory().unwrap();

    let notifier = RecordingNotifier::accepting();
    let created_at = now_epoch_ms() - 10 * MS_PER_DAY;
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Stale", created_at)]);

    let outcome = service.schedule_for_note("n1").unwrap();

    assert!(outcome.scheduled.is_empty());
    assert_eq!(outcome.skipped_past, 1);
    assert!(notifier.recorded().is_empty());
    assert!(SqliteReminderRepository::try_new(&conn)
        .unwrap()
        .list_for_note("n1")
        .unwrap()
        .is_empty());
}

#[test]
fn scheduling_unknown_note_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn, RecordingNotifier::accepting(), Vec::new());

    let err = service.schedule_for_note("ghost").unwrap_err();
    assert!(matches!(err, ReminderServiceError::NoteNotFound(id) if id == "ghost"));
}

#[test]
fn failed_registration_skips_only_its_own_row() {
    let conn = open_db_in_memory().unwrap();
    SqliteSettingsRepository::try_new(&conn)
        .unwrap()
        .set_accountability_intervals(&[3, 20])
        .unwrap();

    let notifier = RecordingNotifier::failing_calls(vec![0]);
    let created_at = now_epoch_ms();
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Partial", created_at)]);

    let outcome = service.schedule_for_note("n1").unwrap();

    assert_eq!(outcome.scheduled.len(), 1);
    assert_eq!(outcome.failed_registrations, 1);

    // Only the registered reminder was persisted.
    let rows = SqliteReminderRepository::try_new(&conn)
        .unwrap()
        .list_for_note("n1")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reminder_index, 1);
    assert_eq!(rows[0].scheduled_for, created_at + 20 * MS_PER_DAY);
}

#[test]
fn cancel_marks_only_that_notes_reminders() {
    let conn = open_db_in_memory().unwrap();
    let notifier = RecordingNotifier::accepting();
    let created_at = now_epoch_ms();
    let service = service_for(
        &conn,
        notifier.clone(),
        vec![note("n1", "First", created_at), note("n2", "Second", created_at)],
    );

    service.schedule_for_note("n1").unwrap();
    service.schedule_for_note("n2").unwrap();

    let canceled = service.cancel_for_note("n1").unwrap();
    assert_eq!(canceled, 1);

    let repo = SqliteReminderRepository::try_new(&conn).unwrap();
    let n1_rows = repo.list_for_note("n1").unwrap();
    let n2_rows = repo.list_for_note("n2").unwrap();
    assert!(n1_rows.iter().all(|row| row.triggered_at.is_some()));
    assert!(n2_rows.iter().all(|row| row.triggered_at.is_none()));
}

#[test]
fn cancel_leaves_os_registrations_alive() {
    let conn = open_db_in_memory().unwrap();
    let notifier = RecordingNotifier::accepting();
    let created_at = now_epoch_ms();
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Keep", created_at)]);

    service.schedule_for_note("n1").unwrap();
    let before = notifier.recorded();

    service.cancel_for_note("n1").unwrap();

    // Cancellation is storage-side only; the shell registrations stay put and
    // delivery is filtered out when the notification later fires.
    assert_eq!(notifier.recorded(), before);
    assert!(service.pending_reminders().unwrap().is_empty());
}

#[test]
fn cancel_with_no_live_reminders_returns_zero() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn, RecordingNotifier::accepting(), Vec::new());

    assert_eq!(service.cancel_for_note("n1").unwrap(), 0);
}

#[test]
fn pending_orders_by_fire_time_across_notes() {
    let conn = open_db_in_memory().unwrap();
    SqliteSettingsRepository::try_new(&conn)
        .unwrap()
        .set_accountability_intervals(&[3, 20])
        .unwrap();

    let notifier = RecordingNotifier::accepting();
    let now = now_epoch_ms();
    let service = service_for(
        &conn,
        notifier,
        vec![note("n1", "First", now), note("n2", "Second", now + 1_000)],
    );

    service.schedule_for_note("n1").unwrap();
    service.schedule_for_note("n2").unwrap();

    let pending = service.pending_reminders().unwrap();
    assert_eq!(pending.len(), 4);
    for window in pending.windows(2) {
        assert!(window[0].scheduled_for <= window[1].scheduled_for);
    }
}

#[test]
fn mark_triggered_is_idempotent_and_keeps_first_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let notifier = RecordingNotifier::accepting();
    let service = service_for(&conn, notifier, vec![note("n1", "Once", now_epoch_ms())]);

    let outcome = service.schedule_for_note("n1").unwrap();
    let reminder_id = outcome.scheduled[0].id;

    assert!(service.mark_triggered(reminder_id).unwrap());
    let repo = SqliteReminderRepository::try_new(&conn).unwrap();
    let first = repo.list_for_note("n1").unwrap()[0].triggered_at;
    assert!(first.is_some());

    assert!(!service.mark_triggered(reminder_id).unwrap());
    let second = repo.list_for_note("n1").unwrap()[0].triggered_at;
    assert_eq!(second, first);
}

#[test]
fn mark_triggered_for_unknown_reminder_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn, RecordingNotifier::accepting(), Vec::new());

    assert!(!service.mark_triggered(Uuid::new_v4()).unwrap());
}

#[test]
fn handle_delivery_marks_the_reminder_and_returns_its_note() {
    let conn = open_db_in_memory().unwrap();
    let notifier = RecordingNotifier::accepting();
    let service = service_for(&conn, notifier.clone(), vec![note("n1", "Open me", now_epoch_ms())]);

    service.schedule_for_note("n1").unwrap();
    let (_, request) = notifier.recorded().remove(0);

    let note_id = service.handle_delivery(&request.payload).unwrap();
    assert_eq!(note_id, "n1");

    let payload = NotificationPayload {
        note_id: "n1".to_string(),
        reminder_id: request.payload.reminder_id,
    };
    // Re-delivery of the same notification resolves to the note again.
    assert_eq!(service.handle_delivery(&payload).unwrap(), "n1");
    assert!(service.pending_reminders().unwrap().is_empty());
}

#[test]
fn repository_rejects_connection_missing_trigger_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE accountability_reminders (
            id TEXT PRIMARY KEY NOT NULL,
            note_id TEXT NOT NULL,
            scheduled_for INTEGER NOT NULL,
            reminder_index INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteReminderRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "accountability_reminders",
            column: "triggered_at"
        })
    ));
}
