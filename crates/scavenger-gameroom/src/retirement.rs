//! DB_WARN: the retirement sink's background worker.
//!
//! Retired players arrive here off the strand (see [`crate::coordinator`])
//! so a slow or failing database never blocks the simulation. A failed
//! insert is retried with bounded exponential backoff; once the cap is
//! exhausted the record is dropped and logged at error severity, exactly
//! as spec §7's `DB_WARN` policy requires.
use std::sync::Arc;
use std::time::Duration;

use scavenger_pg::ConnectionPool;
use scavenger_records::RetiredPlayer;
use tokio::sync::mpsc::UnboundedReceiver;

const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Runs until `rx` is closed and drained — the coordinator closes its
/// sender on shutdown and awaits this task to implement "drain in-flight
/// retirement inserts" (spec §5).
pub async fn run(pool: Arc<ConnectionPool>, mut rx: UnboundedReceiver<RetiredPlayer>) {
    while let Some(record) = rx.recv().await {
        insert_with_retry(&pool, record).await;
    }
}

async fn insert_with_retry(pool: &Arc<ConnectionPool>, record: RetiredPlayer) {
    let mut backoff = INITIAL_BACKOFF;
    for attempt in 1..=MAX_ATTEMPTS {
        let conn = pool.acquire().await;
        match scavenger_records::add_record(&conn, &record).await {
            Ok(()) => return,
            Err(e) => {
                log::warn!(
                    "DB_WARN: retirement insert for {} failed (attempt {attempt}/{MAX_ATTEMPTS}): {e}",
                    record.name
                );
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
    log::error!(
        "DB_WARN: dropping retirement record for {} after {MAX_ATTEMPTS} failed attempts",
        record.name
    );
}
