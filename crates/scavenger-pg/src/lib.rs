//! PostgreSQL connectivity for the retirement sink.
//!
//! ## Connectivity
//!
//! - [`db()`] — single shared connection, for the common case
//! - [`ConnectionPool`] — a fixed-size pool of connections, used when the
//!   retirement sink needs to issue inserts without blocking reads of the
//!   leaderboard (or vice versa)
//!
//! ## Schema
//!
//! - [`Schema`] — table metadata and DDL generation
mod schema;

pub use schema::*;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::Semaphore;
use tokio_postgres::Client;
use tokio_postgres::NoTls;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table holding retired players' final scores.
#[rustfmt::skip]
pub const RETIRED_PLAYERS: &str = "retired_players";

/// Establishes a single database connection from the `GAME_DB_URL`
/// environment variable.
///
/// # Panics
///
/// Panics if `GAME_DB_URL` is not set or the connection fails — this is a
/// FATAL_IO condition at startup, not something the caller can recover
/// from.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let url = std::env::var("GAME_DB_URL").expect("GAME_DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(&url, NoTls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// A fixed-size pool of PostgreSQL connections.
///
/// Grounded on the original server's `ConnectionPool`: a condvar-guarded
/// vector of connections that borrowers block on when the pool is
/// exhausted. Here the condvar becomes a [`tokio::sync::Semaphore`]: each
/// permit corresponds to exactly one free connection, so `acquire` never
/// busy-waits and never oversubscribes the pool.
pub struct ConnectionPool {
    clients: Mutex<Vec<Arc<Client>>>,
    semaphore: Arc<Semaphore>,
}

impl ConnectionPool {
    pub async fn connect(url: &str, capacity: usize) -> Result<Arc<Self>, PgErr> {
        let mut clients = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let (client, connection) = tokio_postgres::connect(url, NoTls).await?;
            tokio::spawn(connection);
            clients.push(Arc::new(client));
        }
        Ok(Arc::new(Self {
            clients: Mutex::new(clients),
            semaphore: Arc::new(Semaphore::new(capacity)),
        }))
    }

    /// Borrows a connection, waiting if every connection is currently
    /// checked out. The connection is returned to the pool when the
    /// guard drops.
    pub async fn acquire(self: &Arc<Self>) -> ConnectionGuard {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("connection pool semaphore never closes");
        let client = self
            .clients
            .lock()
            .await
            .pop()
            .expect("a free permit guarantees a free connection");
        ConnectionGuard {
            client: Some(client),
            pool: self.clone(),
            _permit: permit,
        }
    }
}

/// A borrowed connection. Returns itself to the pool on drop.
pub struct ConnectionGuard {
    client: Option<Arc<Client>>,
    pool: Arc<ConnectionPool>,
    _permit: OwnedSemaphorePermit,
}

impl std::ops::Deref for ConnectionGuard {
    type Target = Client;
    fn deref(&self) -> &Client {
        self.client.as_ref().expect("client taken only on drop")
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            let pool = self.pool.clone();
            tokio::spawn(async move {
                pool.clients.lock().await.push(client);
            });
        }
    }
}
