//! Settings repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the accountability interval set as one JSON blob.
//! - Fall back to the default set whenever the stored value is unusable.
//!
//! # Invariants
//! - Reads never fail because of a missing or corrupt value; corruption is
//!   logged at `warn` and the default set is returned.
//! - Writes persist only normalized sets; an empty normalization result is
//!   rejected before any SQL runs.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::intervals::ReminderIntervals;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

/// Settings key holding the interval JSON blob.
pub const ACCOUNTABILITY_INTERVALS_KEY: &str = "accountability_intervals";

/// Repository interface for core settings.
pub trait SettingsRepository {
    /// Returns the configured interval set, or the default on any read
    /// problem (missing row, bad JSON, nothing valid in the stored list).
    fn accountability_intervals(&self) -> RepoResult<ReminderIntervals>;
    /// Normalizes and persists `days`, returning the stored set.
    fn set_accountability_intervals(&self, days: &[i64]) -> RepoResult<ReminderIntervals>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "settings", &["key", "value"])?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn accountability_intervals(&self) -> RepoResult<ReminderIntervals> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                [ACCOUNTABILITY_INTERVALS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = stored else {
            return Ok(ReminderIntervals::default());
        };

        match parse_stored_intervals(&raw) {
            Some(set) => Ok(set),
            None => {
                warn!(
                    "event=settings_read module=repo status=fallback key={ACCOUNTABILITY_INTERVALS_KEY} reason=unusable_value"
                );
                Ok(ReminderIntervals::default())
            }
        }
    }

    fn set_accountability_intervals(&self, days: &[i64]) -> RepoResult<ReminderIntervals> {
        let set = ReminderIntervals::normalize(days)?;
        let blob = serde_json::to_string(set.days()).map_err(|err| {
            RepoError::InvalidData(format!("interval serialization failed: {err}"))
        })?;

        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
            params![ACCOUNTABILITY_INTERVALS_KEY, blob],
        )?;

        Ok(set)
    }
}

fn parse_stored_intervals(raw: &str) -> Option<ReminderIntervals> {
    let days: Vec<i64> = serde_json::from_str(raw).ok()?;
    ReminderIntervals::normalize(&days).ok()
}
