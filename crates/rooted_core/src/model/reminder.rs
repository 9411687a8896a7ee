//! Accountability reminder domain model.
//!
//! # Responsibility
//! - Define the persisted reminder row shape.
//! - Provide lifecycle helpers for the triggered/live distinction.
//!
//! # Invariants
//! - `id` is stable and never reused for another reminder.
//! - `triggered_at` transitions from `NULL` to a timestamp at most once;
//!   rows are never deleted by core.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::note::NoteId;
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier for one scheduled reminder.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ReminderId = Uuid;

/// One scheduled accountability reminder for a note.
///
/// All timestamps are unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountabilityReminder {
    /// Stable reminder id, also carried in the notification payload.
    pub id: ReminderId,
    /// Note this reminder points back to.
    pub note_id: NoteId,
    /// When the reminder should fire.
    pub scheduled_for: i64,
    /// Position of the producing interval in the configured set.
    pub reminder_index: u32,
    /// When the row was created.
    pub created_at: i64,
    /// Set on delivery or cancellation; `None` while the reminder is live.
    pub triggered_at: Option<i64>,
}

impl AccountabilityReminder {
    /// Whether this reminder is still awaiting delivery.
    pub fn is_live(&self) -> bool {
        self.triggered_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::AccountabilityReminder;
    use uuid::Uuid;

    #[test]
    fn live_state_follows_triggered_at() {
        let mut reminder = AccountabilityReminder {
            id: Uuid::new_v4(),
            note_id: "note-1".to_string(),
            scheduled_for: 1_000,
            reminder_index: 0,
            created_at: 500,
            triggered_at: None,
        };
        assert!(reminder.is_live());

        reminder.triggered_at = Some(2_000);
        assert!(!reminder.is_live());
    }
}
