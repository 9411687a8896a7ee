//! Verse cache repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide point lookup and wholesale upsert over cached verse text.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - The five key columns form the composite primary key; `put` replaces the
//!   whole row for its key, never part of it.
//! - Rows are never expired or evicted by core.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::reference::VerseKey;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Cached verse read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVerse {
    /// Verse text exactly as it was stored.
    pub text: String,
    /// When the row was written, epoch milliseconds.
    pub cached_at: i64,
}

/// Repository interface for the verse text cache.
pub trait VerseCacheRepository {
    /// Point lookup for one exact key. Never scans.
    fn get(&self, key: &VerseKey<'_>) -> RepoResult<Option<CachedVerse>>;
    /// Inserts or wholesale-replaces the row for `key`. Last writer wins.
    fn put(&self, key: &VerseKey<'_>, text: &str, cached_at: i64) -> RepoResult<()>;
}

/// SQLite-backed verse cache repository.
pub struct SqliteVerseCacheRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVerseCacheRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "verse_cache",
            &[
                "translation",
                "book_id",
                "chapter",
                "verse_start",
                "verse_end",
                "text",
                "cached_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl VerseCacheRepository for SqliteVerseCacheRepository<'_> {
    fn get(&self, key: &VerseKey<'_>) -> RepoResult<Option<CachedVerse>> {
        let row = self
            .conn
            .query_row(
                "SELECT text, cached_at
                 FROM verse_cache
                 WHERE translation = ?1
                   AND book_id = ?2
                   AND chapter = ?3
                   AND verse_start = ?4
                   AND verse_end = ?5;",
                params![
                    key.translation,
                    key.book_id,
                    key.chapter,
                    key.verse_start,
                    key.verse_end,
                ],
                |row| {
                    Ok(CachedVerse {
                        text: row.get(0)?,
                        cached_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn put(&self, key: &VerseKey<'_>, text: &str, cached_at: i64) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO verse_cache (
                translation,
                book_id,
                chapter,
                verse_start,
                verse_end,
                text,
                cached_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                key.translation,
                key.book_id,
                key.chapter,
                key.verse_start,
                key.verse_end,
                text,
                cached_at,
            ],
        )?;
        Ok(())
    }
}
