// src/store.rs
//
// Persistent set of delivered fingerprints, backed by a single SQLite file.
// Records are insert-only; nothing prunes them. One process writes at a time.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const CREATE_SEEN_SQL: &str = "
    CREATE TABLE IF NOT EXISTS seen (
        fingerprint TEXT PRIMARY KEY,
        url TEXT,
        title TEXT,
        first_seen_utc TEXT
    )
";

pub struct SeenStore {
    conn: Connection,
}

impl SeenStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Ensure the current layout exists. An existing `seen` table without a
    /// `fingerprint` column is the predecessor URL-keyed layout and is
    /// migrated in place, one-way. Safe to call repeatedly.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        if self.has_url_keyed_layout()? {
            self.migrate_from_url_layout()?;
        }
        self.conn.execute(CREATE_SEEN_SQL, [])?;
        Ok(())
    }

    pub fn is_seen(&self, fingerprint: &str) -> Result<bool, StoreError> {
        let hit = self
            .conn
            .query_row(
                "SELECT 1 FROM seen WHERE fingerprint = ?1",
                [fingerprint],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    /// Insert-or-ignore: marking an already-seen fingerprint is a no-op, not
    /// an error, so two sources racing to the gate cannot fail the run.
    pub fn mark_seen(&self, fingerprint: &str, url: &str, title: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO seen (fingerprint, url, title, first_seen_utc)
             VALUES (?1, ?2, ?3, ?4)",
            params![fingerprint, url, title, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn first_seen_utc(&self, fingerprint: &str) -> Result<Option<String>, StoreError> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT first_seen_utc FROM seen WHERE fingerprint = ?1",
                [fingerprint],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn has_url_keyed_layout(&self) -> Result<bool, StoreError> {
        let table_exists = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'seen'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if !table_exists {
            return Ok(false);
        }

        let mut stmt = self.conn.prepare("PRAGMA table_info(seen)")?;
        let mut has_fingerprint = false;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        for name in names {
            if name? == "fingerprint" {
                has_fingerprint = true;
            }
        }
        Ok(!has_fingerprint)
    }

    /// One-shot migration from `seen(url PRIMARY KEY, first_seen_utc)`.
    /// Fingerprints are computed from the stored URL with an empty title;
    /// `first_seen_utc` is preserved. Runs inside one transaction.
    fn migrate_from_url_layout(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("ALTER TABLE seen RENAME TO seen_url_layout", [])?;
        tx.execute(CREATE_SEEN_SQL, [])?;

        let mut migrated = 0usize;
        {
            let mut read = tx.prepare("SELECT url, first_seen_utc FROM seen_url_layout")?;
            let mut write = tx.prepare(
                "INSERT OR IGNORE INTO seen (fingerprint, url, title, first_seen_utc)
                 VALUES (?1, ?2, '', ?3)",
            )?;
            let rows = read.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                ))
            })?;
            for row in rows {
                let (url, first_seen) = row?;
                let fp = crate::fingerprint::fingerprint(&url, "");
                migrated += write.execute(params![fp, url, first_seen])?;
            }
        }

        tx.execute("DROP TABLE seen_url_layout", [])?;
        tx.commit()?;
        tracing::info!(migrated, "seen store migrated from url-keyed layout");
        Ok(())
    }
}
