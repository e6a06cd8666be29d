//! Shared crawl budget: the hard ceiling on pages fetched
//!
//! The budget is a single counter in the shared SQLite database, the one
//! piece of mutable state every worker sees. Mutations run inside immediate
//! transactions, so only one process can move the counter at a time and the
//! ceiling can never be overshot in the reservation step itself.
//!
//! A slot is reserved optimistically *before* the fetch (the fetch is slow
//! and must happen outside the lock) and refunded with `release` if the fetch
//! fails. The lock is held only for the increment or decrement, never across
//! a network call.

use crate::queue::open_database;
use crate::Result;
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS budget (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    claimed INTEGER NOT NULL
);

INSERT OR IGNORE INTO budget (id, claimed) VALUES (1, 0);
"#;

/// Handle on the shared crawl budget
///
/// Like the task queue, each worker opens its own handle; the counter itself
/// lives in the database file and is valid across process boundaries.
pub struct CrawlBudget {
    conn: Connection,
    max_pages: u64,
}

impl CrawlBudget {
    /// Opens (creating if needed) the budget stored in the database at `path`
    pub fn open(path: &Path, max_pages: u64) -> Result<Self> {
        let conn = open_database(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn, max_pages })
    }

    /// Tries to reserve one page slot
    ///
    /// Returns the reserved ordinal (1-based page sequence number, unique and
    /// monotonically non-decreasing in reservation order), or `None` when the
    /// budget is exhausted, in which case the counter is not touched.
    pub fn try_reserve(&mut self) -> Result<Option<u64>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let claimed: i64 =
            tx.query_row("SELECT claimed FROM budget WHERE id = 1", [], |row| {
                row.get(0)
            })?;

        if claimed as u64 >= self.max_pages {
            return Ok(None);
        }

        let ordinal = claimed as u64 + 1;
        tx.execute(
            "UPDATE budget SET claimed = claimed + 1 WHERE id = 1",
            params![],
        )?;
        tx.commit()?;

        Ok(Some(ordinal))
    }

    /// Returns a reserved slot to the pool
    ///
    /// Called when a reservation was made but the corresponding fetch failed.
    /// The counter never goes below zero.
    pub fn release(&mut self) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE budget SET claimed = claimed - 1 WHERE id = 1 AND claimed > 0",
            params![],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Current counter value: pages successfully reserved so far
    pub fn claimed(&self) -> Result<u64> {
        let claimed: i64 =
            self.conn
                .query_row("SELECT claimed FROM budget WHERE id = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(claimed as u64)
    }

    /// The configured ceiling
    pub fn max_pages(&self) -> u64 {
        self.max_pages
    }
}
