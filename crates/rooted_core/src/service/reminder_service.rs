//! Accountability reminder use-case service.
//!
//! # Responsibility
//! - Schedule reminders for a note from the configured interval set.
//! - Own the cancel/pending/trigger lifecycle over reminder storage.
//!
//! # Invariants
//! - A reminder row is persisted only after its notification registered
//!   successfully; one failed registration never aborts its siblings.
//! - Reminders whose fire time is not strictly in the future are skipped.
//! - Cancellation is soft: storage rows are stamped, OS registrations are
//!   left untouched.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::note::{NoteDirectory, NoteDirectoryError, NoteId};
use crate::model::reminder::{AccountabilityReminder, ReminderId};
use crate::notify::{NotificationPayload, NotificationRequest, Notifier};
use crate::repo::reminder_repo::ReminderRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::RepoError;
use crate::service::{now_epoch_ms, MS_PER_DAY};
use log::{info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Reflection prompts used as notification bodies, picked at random.
pub const REFLECTION_PROMPTS: [&str; 6] = [
    "What do you plan to change concerning what you have learnt?",
    "How are you going to improve in this area of your life following what you have learnt?",
    "What specific action will you take based on this note?",
    "How has this learning impacted your perspective?",
    "What steps will you take to apply this learning?",
    "How will you grow in this area of your life?",
];

/// Service error for reminder use-cases.
#[derive(Debug)]
pub enum ReminderServiceError {
    /// The target note does not exist in the note directory.
    NoteNotFound(NoteId),
    /// The note directory could not be consulted.
    NoteDirectory(NoteDirectoryError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ReminderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(note_id) => write!(f, "note not found: {note_id}"),
            Self::NoteDirectory(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReminderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteNotFound(_) => None,
            Self::NoteDirectory(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<NoteDirectoryError> for ReminderServiceError {
    fn from(value: NoteDirectoryError) -> Self {
        Self::NoteDirectory(value)
    }
}

impl From<RepoError> for ReminderServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// What one scheduling pass did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleOutcome {
    /// Rows persisted by this pass, in interval order.
    pub scheduled: Vec<AccountabilityReminder>,
    /// Intervals whose fire time was already in the past.
    pub skipped_past: u32,
    /// Intervals whose notification registration failed.
    pub failed_registrations: u32,
}

/// Reminder service facade over storage, settings and the notifier.
pub struct ReminderService<R: ReminderRepository, S: SettingsRepository> {
    reminders: R,
    settings: S,
    notifier: Arc<dyn Notifier>,
    notes: Arc<dyn NoteDirectory>,
}

impl<R: ReminderRepository, S: SettingsRepository> ReminderService<R, S> {
    /// Creates a service using the provided repositories and capabilities.
    pub fn new(
        reminders: R,
        settings: S,
        notifier: Arc<dyn Notifier>,
        notes: Arc<dyn NoteDirectory>,
    ) -> Self {
        Self {
            reminders,
            settings,
            notifier,
            notes,
        }
    }

    /// Schedules reminders for one note from the configured intervals.
    ///
    /// Each interval keeps its position in the set as `reminder_index`, so
    /// skipped past intervals still consume their index. Rows are persisted
    /// one by one, each only after its notification registered.
    pub fn schedule_for_note(
        &self,
        note_id: &str,
    ) -> Result<ScheduleOutcome, ReminderServiceError> {
        let summary = self
            .notes
            .note_summary(note_id)?
            .ok_or_else(|| ReminderServiceError::NoteNotFound(note_id.to_string()))?;

        let intervals = self.settings.accountability_intervals()?;
        let now = now_epoch_ms();
        let mut outcome = ScheduleOutcome::default();

        for (index, day) in intervals.days().iter().enumerate() {
            let scheduled_for = summary.created_at + day * MS_PER_DAY;
            if scheduled_for <= now {
                outcome.skipped_past += 1;
                continue;
            }

            let reminder_id: ReminderId = Uuid::new_v4();
            let request = NotificationRequest {
                title: format!("Time to Reflect: {}", summary.title),
                body: pick_prompt(),
                payload: NotificationPayload {
                    note_id: summary.id.clone(),
                    reminder_id,
                },
            };

            match self.notifier.schedule_at(scheduled_for, &request) {
                Ok(registration_id) => {
                    let reminder = AccountabilityReminder {
                        id: reminder_id,
                        note_id: summary.id.clone(),
                        scheduled_for,
                        reminder_index: index as u32,
                        created_at: now,
                        triggered_at: None,
                    };
                    self.reminders.insert(&reminder)?;
                    info!(
                        "event=reminder_schedule module=service status=ok note_id={} reminder_index={index} registration_id={registration_id}",
                        summary.id
                    );
                    outcome.scheduled.push(reminder);
                }
                Err(err) => {
                    warn!(
                        "event=reminder_schedule module=service status=registration_failed note_id={} reminder_index={index} error={err}",
                        summary.id
                    );
                    outcome.failed_registrations += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Soft-cancels every live reminder of one note.
    ///
    /// Returns how many rows transitioned. OS-side registrations are left
    /// in place; delivered notifications for cancelled reminders are
    /// resolved by the triggered stamp, not by withdrawal.
    pub fn cancel_for_note(&self, note_id: &str) -> Result<usize, ReminderServiceError> {
        let cancelled = self
            .reminders
            .cancel_all_for_note(note_id, now_epoch_ms())?;
        info!("event=reminder_cancel module=service status=ok note_id={note_id} count={cancelled}");
        Ok(cancelled)
    }

    /// Live reminders still ahead of now, in firing order.
    pub fn pending_reminders(&self) -> Result<Vec<AccountabilityReminder>, ReminderServiceError> {
        let pending = self.reminders.pending(now_epoch_ms())?;
        Ok(pending)
    }

    /// Stamps one reminder triggered. Idempotent; repeated calls and
    /// unknown ids return `false` without error.
    pub fn mark_triggered(&self, reminder_id: ReminderId) -> Result<bool, ReminderServiceError> {
        let transitioned = self.reminders.mark_triggered(reminder_id, now_epoch_ms())?;
        Ok(transitioned)
    }

    /// Handles a delivered/tapped notification.
    ///
    /// Marks the reminder triggered and returns the note id the shell
    /// should navigate to.
    pub fn handle_delivery(
        &self,
        payload: &NotificationPayload,
    ) -> Result<NoteId, ReminderServiceError> {
        self.mark_triggered(payload.reminder_id)?;
        Ok(payload.note_id.clone())
    }
}

fn pick_prompt() -> String {
    let index = rand::thread_rng().gen_range(0..REFLECTION_PROMPTS.len());
    REFLECTION_PROMPTS[index].to_string()
}
