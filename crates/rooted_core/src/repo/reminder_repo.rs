//! Reminder repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist scheduled reminders and their triggered transitions.
//! - Keep the cancel/pending/trigger SQL inside the persistence boundary.
//!
//! # Invariants
//! - Rows are append-only; lifecycle changes only ever set `triggered_at`.
//! - `mark_triggered` transitions `NULL` to a timestamp at most once; the
//!   SQL guard makes repeated calls no-ops.
//! - `pending` ordering is deterministic: `scheduled_for ASC, id ASC`.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::reminder::{AccountabilityReminder, ReminderId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const REMINDER_SELECT_SQL: &str = "SELECT
    id,
    note_id,
    scheduled_for,
    reminder_index,
    created_at,
    triggered_at
FROM accountability_reminders";

/// Repository interface for accountability reminders.
pub trait ReminderRepository {
    /// Persists one reminder row.
    fn insert(&self, reminder: &AccountabilityReminder) -> RepoResult<()>;
    /// Stamps `triggered_at = now_ms` on every live reminder of one note.
    /// Returns how many rows transitioned.
    fn cancel_all_for_note(&self, note_id: &str, now_ms: i64) -> RepoResult<usize>;
    /// Live reminders whose fire time is still ahead of `now_ms`.
    fn pending(&self, now_ms: i64) -> RepoResult<Vec<AccountabilityReminder>>;
    /// Stamps `triggered_at` once; returns whether this call did it.
    fn mark_triggered(&self, id: ReminderId, now_ms: i64) -> RepoResult<bool>;
    /// All reminders of one note, live or not, in schedule order.
    fn list_for_note(&self, note_id: &str) -> RepoResult<Vec<AccountabilityReminder>>;
}

/// SQLite-backed reminder repository.
pub struct SqliteReminderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReminderRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "accountability_reminders",
            &[
                "id",
                "note_id",
                "scheduled_for",
                "reminder_index",
                "created_at",
                "triggered_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ReminderRepository for SqliteReminderRepository<'_> {
    fn insert(&self, reminder: &AccountabilityReminder) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO accountability_reminders (
                id,
                note_id,
                scheduled_for,
                reminder_index,
                created_at,
                triggered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                reminder.id.to_string(),
                reminder.note_id.as_str(),
                reminder.scheduled_for,
                reminder.reminder_index,
                reminder.created_at,
                reminder.triggered_at,
            ],
        )?;
        Ok(())
    }

    fn cancel_all_for_note(&self, note_id: &str, now_ms: i64) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE accountability_reminders
             SET triggered_at = ?2
             WHERE note_id = ?1
               AND triggered_at IS NULL;",
            params![note_id, now_ms],
        )?;
        Ok(changed)
    }

    fn pending(&self, now_ms: i64) -> RepoResult<Vec<AccountabilityReminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REMINDER_SELECT_SQL}
             WHERE triggered_at IS NULL
               AND scheduled_for > ?1
             ORDER BY scheduled_for ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([now_ms])?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(parse_reminder_row(row)?);
        }
        Ok(reminders)
    }

    fn mark_triggered(&self, id: ReminderId, now_ms: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE accountability_reminders
             SET triggered_at = ?2
             WHERE id = ?1
               AND triggered_at IS NULL;",
            params![id.to_string(), now_ms],
        )?;
        Ok(changed == 1)
    }

    fn list_for_note(&self, note_id: &str) -> RepoResult<Vec<AccountabilityReminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REMINDER_SELECT_SQL}
             WHERE note_id = ?1
             ORDER BY scheduled_for ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([note_id])?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(parse_reminder_row(row)?);
        }
        Ok(reminders)
    }
}

fn parse_reminder_row(row: &Row<'_>) -> RepoResult<AccountabilityReminder> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in accountability_reminders.id"
        ))
    })?;

    Ok(AccountabilityReminder {
        id,
        note_id: row.get("note_id")?,
        scheduled_for: row.get("scheduled_for")?,
        reminder_index: row.get("reminder_index")?,
        created_at: row.get("created_at")?,
        triggered_at: row.get("triggered_at")?,
    })
}
