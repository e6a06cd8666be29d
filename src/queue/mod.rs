//! Durable task queue shared by every worker
//!
//! The queue is a named SQLite table on disk, so tasks survive process
//! restarts and any number of worker processes can consume from the same
//! file. Delivery is at-least-once with manual acknowledgment:
//!
//! - `enqueue` durably appends a URL to the tail
//! - `dequeue_blocking` claims exactly one task for this consumer, marking it
//!   in-flight without removing it
//! - `ack` permanently removes a claimed task
//!
//! A claimed task that is never acknowledged (its consumer died mid-fetch)
//! becomes eligible for redelivery once its lease expires, so consumers must
//! tolerate reprocessing. Each consumer claims at most one task at a time,
//! which keeps slow workers from hoarding unacknowledged work.

use crate::config::QueueConfig;
use crate::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

/// SQL schema for the task queue
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'pending',
    claimed_by TEXT,
    claimed_at INTEGER,
    enqueued_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_state ON tasks(state);
"#;

/// One claimed task, held by a consumer until acknowledged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Queue row id; ids are assigned in enqueue order (FIFO)
    pub id: i64,

    /// The task payload: one absolute URL
    pub url: String,
}

/// Handle on the shared task queue
///
/// Each worker opens its own `TaskQueue` (its own database connection), so
/// nothing in-process is shared between consumers.
pub struct TaskQueue {
    conn: Connection,
    consumer: String,
    lease: Duration,
    poll: Duration,
}

impl TaskQueue {
    /// Opens (creating if needed) the queue stored at `config.db_path`
    ///
    /// # Arguments
    ///
    /// * `config` - Queue configuration (database path, lease, poll interval)
    /// * `consumer` - Identifier recorded on claimed tasks, for diagnostics
    pub fn open(config: &QueueConfig, consumer: &str) -> Result<Self> {
        let conn = open_database(Path::new(&config.db_path))?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn,
            consumer: consumer.to_string(),
            lease: Duration::from_millis(config.lease_ms),
            poll: Duration::from_millis(config.poll_ms),
        })
    }

    /// Durably appends a task to the tail of the queue
    pub fn enqueue(&self, url: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO tasks (url, state, enqueued_at) VALUES (?1, 'pending', ?2)",
            params![url, now],
        )?;
        Ok(())
    }

    /// Delivers exactly one pending task to this consumer, blocking while the
    /// queue is empty but other tasks are still in flight
    ///
    /// Returns `None` only when no task is pending AND none is in flight: at
    /// that point the frontier is drained and can no longer grow, so the
    /// consumer should stop. An in-flight task elsewhere may still republish
    /// links, so the consumer keeps polling in that case.
    pub async fn dequeue_blocking(&mut self) -> Result<Option<Delivery>> {
        loop {
            if let Some(delivery) = self.try_claim()? {
                tracing::trace!(
                    consumer = %self.consumer,
                    task = delivery.id,
                    url = %delivery.url,
                    "claimed task"
                );
                return Ok(Some(delivery));
            }

            if self.is_drained()? {
                tracing::debug!(consumer = %self.consumer, "queue drained, no tasks in flight");
                return Ok(None);
            }

            tokio::time::sleep(self.poll).await;
        }
    }

    /// Permanently removes a claimed task
    ///
    /// Acknowledgment happens exactly once per delivery, on every processing
    /// path; a task that is never acked is redelivered after its lease
    /// expires.
    pub fn ack(&self, delivery: &Delivery) -> Result<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![delivery.id])?;
        Ok(())
    }

    /// Number of tasks waiting to be claimed (redeliverable tasks included)
    pub fn pending_count(&self) -> Result<u64> {
        let cutoff = self.lease_cutoff();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE state = 'pending' OR (state = 'inflight' AND claimed_at <= ?1)",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Number of tasks currently claimed and within their lease
    pub fn inflight_count(&self) -> Result<u64> {
        let cutoff = self.lease_cutoff();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE state = 'inflight' AND claimed_at > ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Claims the oldest claimable task, if any
    ///
    /// Claimable means pending, or in-flight with an expired lease. The
    /// select-and-mark runs in one immediate transaction, which is the
    /// cross-process mutual exclusion that guarantees a task is delivered to
    /// exactly one consumer at a time.
    fn try_claim(&mut self) -> Result<Option<Delivery>> {
        let now = Utc::now().timestamp_millis();
        let cutoff = now - self.lease.as_millis() as i64;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, url FROM tasks
                 WHERE state = 'pending' OR (state = 'inflight' AND claimed_at <= ?1)
                 ORDER BY id
                 LIMIT 1",
                params![cutoff],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let claimed = match candidate {
            Some((id, url)) => {
                tx.execute(
                    "UPDATE tasks SET state = 'inflight', claimed_by = ?1, claimed_at = ?2
                     WHERE id = ?3",
                    params![self.consumer, now, id],
                )?;
                Some(Delivery { id, url })
            }
            None => None,
        };

        tx.commit()?;
        Ok(claimed)
    }

    /// True when the queue holds no rows at all: nothing pending, nothing in
    /// flight, and therefore nothing left that could republish links
    fn is_drained(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    fn lease_cutoff(&self) -> i64 {
        Utc::now().timestamp_millis() - self.lease.as_millis() as i64
    }
}

/// Opens a SQLite database configured for concurrent multi-process access
pub(crate) fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    // WAL lets readers and the single writer proceed concurrently; the busy
    // timeout makes writers queue behind each other instead of erroring.
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> QueueConfig {
        QueueConfig {
            db_path: dir
                .path()
                .join("queue.db")
                .to_string_lossy()
                .into_owned(),
            lease_ms: 200,
            poll_ms: 10,
        }
    }

    fn open_consumer(config: &QueueConfig, name: &str) -> TaskQueue {
        TaskQueue::open(config, name).unwrap()
    }

    #[test]
    fn test_enqueue_then_claim_fifo_order() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut queue = open_consumer(&config, "c1");

        queue.enqueue("https://example.com/a").unwrap();
        queue.enqueue("https://example.com/b").unwrap();
        queue.enqueue("https://example.com/c").unwrap();

        let first = queue.try_claim().unwrap().unwrap();
        assert_eq!(first.url, "https://example.com/a");
        queue.ack(&first).unwrap();

        let second = queue.try_claim().unwrap().unwrap();
        assert_eq!(second.url, "https://example.com/b");
    }

    #[test]
    fn test_claimed_task_is_invisible_to_other_consumers() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut c1 = open_consumer(&config, "c1");
        let mut c2 = open_consumer(&config, "c2");

        c1.enqueue("https://example.com/only").unwrap();

        let claimed = c1.try_claim().unwrap();
        assert!(claimed.is_some());

        // Still within the lease, so the other consumer sees nothing.
        assert!(c2.try_claim().unwrap().is_none());
        assert_eq!(c2.pending_count().unwrap(), 0);
        assert_eq!(c2.inflight_count().unwrap(), 1);
    }

    #[test]
    fn test_ack_removes_task_permanently() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut queue = open_consumer(&config, "c1");

        queue.enqueue("https://example.com/").unwrap();
        let delivery = queue.try_claim().unwrap().unwrap();
        queue.ack(&delivery).unwrap();

        assert!(queue.is_drained().unwrap());
        assert!(queue.try_claim().unwrap().is_none());
    }

    #[test]
    fn test_unacked_task_redelivered_after_lease_expiry() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut c1 = open_consumer(&config, "c1");
        let mut c2 = open_consumer(&config, "c2");

        c1.enqueue("https://example.com/crashy").unwrap();
        let first = c1.try_claim().unwrap().unwrap();

        // c1 "crashes" without acking; after the lease the task is claimable
        // again by anyone.
        std::thread::sleep(Duration::from_millis(250));

        let redelivered = c2.try_claim().unwrap().unwrap();
        assert_eq!(redelivered.id, first.id);
        assert_eq!(redelivered.url, "https://example.com/crashy");
    }

    #[test]
    fn test_two_consumers_claim_distinct_tasks() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut c1 = open_consumer(&config, "c1");
        let mut c2 = open_consumer(&config, "c2");

        c1.enqueue("https://example.com/a").unwrap();
        c1.enqueue("https://example.com/b").unwrap();

        let first = c1.try_claim().unwrap().unwrap();
        let second = c2.try_claim().unwrap().unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(first.url, second.url);
    }

    #[test]
    fn test_queue_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        {
            let queue = open_consumer(&config, "c1");
            queue.enqueue("https://example.com/persisted").unwrap();
        }

        let mut reopened = open_consumer(&config, "c2");
        let delivery = reopened.try_claim().unwrap().unwrap();
        assert_eq!(delivery.url, "https://example.com/persisted");
    }

    #[tokio::test]
    async fn test_dequeue_blocking_returns_none_when_drained() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut queue = open_consumer(&config, "c1");

        assert!(queue.dequeue_blocking().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dequeue_blocking_waits_for_inflight_republish() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mut c1 = open_consumer(&config, "c1");
        let mut c2 = open_consumer(&config, "c2");

        c1.enqueue("https://example.com/seed").unwrap();
        let seed = c1.try_claim().unwrap().unwrap();

        // c2 must keep waiting while the seed is in flight, then receive the
        // link c1 discovers before acking.
        let (waited, _) = tokio::join!(c2.dequeue_blocking(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            c1.enqueue("https://example.com/discovered").unwrap();
            c1.ack(&seed).unwrap();
        });

        let delivery = waited.unwrap().unwrap();
        assert_eq!(delivery.url, "https://example.com/discovered");
    }
}
