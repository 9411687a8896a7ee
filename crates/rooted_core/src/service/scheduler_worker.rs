//! Background reminder scheduling worker.
//!
//! # Responsibility
//! - Run scheduling jobs off the caller's thread, fire-and-forget.
//! - Own a dedicated SQLite connection for the worker's lifetime.
//!
//! # Invariants
//! - Jobs are processed in dispatch order; `shutdown` drains everything
//!   already dispatched before the worker exits.
//! - Terminal job failures are logged, never silently dropped.
//! - Cancellation is not routed through the worker; it stays synchronous on
//!   [`ReminderService`].
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::{open_db, DbError};
use crate::model::note::{NoteDirectory, NoteId};
use crate::notify::Notifier;
use crate::repo::reminder_repo::SqliteReminderRepository;
use crate::repo::settings_repo::SqliteSettingsRepository;
use crate::repo::RepoError;
use crate::service::reminder_service::ReminderService;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Failure starting the scheduler worker.
#[derive(Debug)]
pub enum SchedulerSpawnError {
    /// The worker's database connection could not be opened.
    Db(DbError),
    /// The worker thread could not be spawned.
    Thread(std::io::Error),
}

impl Display for SchedulerSpawnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Thread(err) => write!(f, "scheduler thread spawn failed: {err}"),
        }
    }
}

impl Error for SchedulerSpawnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Thread(err) => Some(err),
        }
    }
}

impl From<DbError> for SchedulerSpawnError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Dispatch failure: the worker has already exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerGone;

impl Display for SchedulerGone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reminder scheduler worker is not running")
    }
}

impl Error for SchedulerGone {}

enum WorkerCommand {
    Schedule { note_id: NoteId },
    Shutdown,
}

/// Handle over the dedicated scheduling thread.
///
/// Dropping the handle shuts the worker down after draining dispatched
/// jobs, same as calling [`SchedulerHandle::shutdown`] explicitly.
pub struct SchedulerHandle {
    sender: Sender<WorkerCommand>,
    worker: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Opens the worker's own connection and starts its thread.
    ///
    /// Fails fast: a database that cannot be opened or migrated is reported
    /// here, not from inside the worker.
    pub fn spawn(
        db_path: impl AsRef<Path>,
        notifier: Arc<dyn Notifier>,
        notes: Arc<dyn NoteDirectory>,
    ) -> Result<Self, SchedulerSpawnError> {
        let conn = open_db(db_path)?;
        let (sender, receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("reminder-scheduler".into())
            .spawn(move || run_worker(conn, receiver, notifier, notes))
            .map_err(SchedulerSpawnError::Thread)?;

        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Queues a scheduling job for one note, fire-and-forget.
    ///
    /// Only fails when the worker is gone; job-level failures are logged by
    /// the worker instead of reported here.
    pub fn dispatch_schedule_for_note(
        &self,
        note_id: impl Into<NoteId>,
    ) -> Result<(), SchedulerGone> {
        self.sender
            .send(WorkerCommand::Schedule {
                note_id: note_id.into(),
            })
            .map_err(|_| SchedulerGone)
    }

    /// Drains every dispatched job, stops the worker and joins it.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        let _ = self.sender.send(WorkerCommand::Shutdown);
        if worker.join().is_err() {
            error!("event=scheduler_worker module=scheduler status=error error_code=worker_panicked");
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    conn: Connection,
    receiver: Receiver<WorkerCommand>,
    notifier: Arc<dyn Notifier>,
    notes: Arc<dyn NoteDirectory>,
) {
    info!("event=scheduler_worker module=scheduler status=start");

    while let Ok(command) = receiver.recv() {
        match command {
            WorkerCommand::Schedule { note_id } => {
                run_schedule_job(&conn, &note_id, &notifier, &notes);
            }
            WorkerCommand::Shutdown => break,
        }
    }

    info!("event=scheduler_worker module=scheduler status=stop");
}

fn run_schedule_job(
    conn: &Connection,
    note_id: &str,
    notifier: &Arc<dyn Notifier>,
    notes: &Arc<dyn NoteDirectory>,
) {
    let service = match build_service(conn, notifier, notes) {
        Ok(service) => service,
        Err(err) => {
            error!(
                "event=reminder_schedule module=scheduler status=error note_id={note_id} error={err}"
            );
            return;
        }
    };

    match service.schedule_for_note(note_id) {
        Ok(outcome) => {
            info!(
                "event=reminder_schedule module=scheduler status=ok note_id={note_id} scheduled={} skipped_past={} failed={}",
                outcome.scheduled.len(),
                outcome.skipped_past,
                outcome.failed_registrations
            );
        }
        Err(err) => {
            error!(
                "event=reminder_schedule module=scheduler status=error note_id={note_id} error={err}"
            );
        }
    }
}

fn build_service<'conn>(
    conn: &'conn Connection,
    notifier: &Arc<dyn Notifier>,
    notes: &Arc<dyn NoteDirectory>,
) -> Result<
    ReminderService<SqliteReminderRepository<'conn>, SqliteSettingsRepository<'conn>>,
    RepoError,
> {
    let reminders = SqliteReminderRepository::try_new(conn)?;
    let settings = SqliteSettingsRepository::try_new(conn)?;
    Ok(ReminderService::new(
        reminders,
        settings,
        Arc::clone(notifier),
        Arc::clone(notes),
    ))
}
