//! Retirement record persistence.
//!
//! A player retires exactly once, but the coordinator may legitimately
//! attempt to record the same retirement twice (e.g. a write retried
//! after a dropped connection) — the database row gets a fresh UUID per
//! *event*, not per player, so a retry just adds a harmless duplicate
//! rather than colliding on a player-keyed primary key.
use const_format::concatcp;
use scavenger_core::ID;
use scavenger_pg::PgErr;
use scavenger_pg::RETIRED_PLAYERS;
use scavenger_pg::Schema;
use serde::Serialize;
use tokio_postgres::Client;

/// A retired player's final standing.
#[derive(Debug, Clone, Serialize)]
pub struct RetiredPlayer {
    pub id: ID<RetiredPlayer>,
    pub name: String,
    pub score: i64,
    pub play_time: std::time::Duration,
}

impl RetiredPlayer {
    /// A fresh id per retirement event — never derived from the player id.
    pub fn new(name: String, score: i64, play_time: std::time::Duration) -> Self {
        Self { id: ID::default(), name, score, play_time }
    }
}

impl Schema for RetiredPlayer {
    fn name() -> &'static str {
        RETIRED_PLAYERS
    }
    fn creates() -> &'static str {
        concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            RETIRED_PLAYERS,
            " (id UUID PRIMARY KEY, name VARCHAR(100) NOT NULL, score INTEGER NOT NULL, playtime DOUBLE PRECISION NOT NULL)"
        )
    }
    fn indices() -> &'static str {
        concatcp!(
            "CREATE INDEX IF NOT EXISTS retired_players_score_idx ON ",
            RETIRED_PLAYERS,
            " (score DESC, playtime ASC, name ASC)"
        )
    }
}

/// Creates the table and its leaderboard index if they don't exist yet.
pub async fn ensure_schema(client: &Client) -> Result<(), PgErr> {
    client.batch_execute(RetiredPlayer::creates()).await?;
    client.batch_execute(RetiredPlayer::indices()).await?;
    Ok(())
}

/// Inserts one retirement event. DB_WARN: callers should log and continue
/// on failure — a dropped retirement insert is not fatal to the server.
pub async fn add_record(client: &Client, record: &RetiredPlayer) -> Result<(), PgErr> {
    client
        .execute(
            concatcp!("INSERT INTO ", RETIRED_PLAYERS, " (id, name, score, playtime) VALUES ($1, $2, $3, $4)"),
            &[
                &record.id.inner(),
                &record.name,
                &(record.score as i32),
                &record.play_time.as_secs_f64(),
            ],
        )
        .await?;
    Ok(())
}

/// Returns up to `max_items` (default 100) leaderboard rows starting at
/// `start` (default 0), ordered by score desc, play time asc, name asc —
/// the same ordering the original leaderboard query uses.
pub async fn get_records(
    client: &Client,
    start: Option<i64>,
    max_items: Option<i64>,
) -> Result<Vec<RetiredPlayer>, PgErr> {
    let start = start.unwrap_or(0);
    let max_items = max_items.unwrap_or(100).min(100);
    let rows = client
        .query(
            concatcp!(
                "SELECT id, name, score, playtime FROM ",
                RETIRED_PLAYERS,
                " ORDER BY score DESC, playtime ASC, name ASC LIMIT $1 OFFSET $2"
            ),
            &[&max_items, &start],
        )
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| RetiredPlayer {
            id: row.get::<_, uuid::Uuid>(0).into(),
            name: row.get(1),
            score: row.get::<_, i32>(2) as i64,
            play_time: std::time::Duration::from_secs_f64(row.get(3)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_record_gets_a_fresh_id() {
        let a = RetiredPlayer::new("alice".into(), 10, std::time::Duration::from_secs(30));
        let b = RetiredPlayer::new("alice".into(), 10, std::time::Duration::from_secs(30));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn creates_ddl_names_the_table() {
        assert!(RetiredPlayer::creates().contains("retired_players"));
    }

    #[test]
    fn indices_orders_by_score_desc_then_playtime_then_name() {
        let ddl = RetiredPlayer::indices();
        assert!(ddl.contains("score DESC"));
        assert!(ddl.contains("playtime ASC"));
        assert!(ddl.contains("name ASC"));
    }
}
