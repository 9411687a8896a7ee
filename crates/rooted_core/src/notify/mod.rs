//! Notification capability boundary.
//!
//! # Responsibility
//! - Define the contract the embedding shell implements over its OS
//!   notification API.
//! - Define the payload that rides along with each notification.
//!
//! # Invariants
//! - Core never talks to an OS notification service itself.
//! - The registration id returned by the shell is logged for diagnosis but
//!   not persisted; cancellation is soft and happens in core storage only.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::note::NoteId;
use crate::model::reminder::ReminderId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque handle the shell's notification API returned for one scheduling.
pub type RegistrationId = String;

/// Data carried inside a notification, returned to core on delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Note the reminder points back to.
    pub note_id: NoteId,
    /// Reminder row this notification belongs to.
    pub reminder_id: ReminderId,
}

/// One notification to be scheduled with the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
}

/// Failure reported by the shell when scheduling a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The user has not granted notification permission.
    PermissionDenied,
    /// The platform rejected this particular request.
    Rejected { detail: String },
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission denied"),
            Self::Rejected { detail } => write!(f, "notification rejected: {detail}"),
        }
    }
}

impl Error for NotifyError {}

/// Capability contract over the shell's notification scheduling API.
pub trait Notifier: Send + Sync {
    /// Registers one notification to fire at `fire_at_ms` (epoch ms).
    fn schedule_at(
        &self,
        fire_at_ms: i64,
        request: &NotificationRequest,
    ) -> Result<RegistrationId, NotifyError>;
}
