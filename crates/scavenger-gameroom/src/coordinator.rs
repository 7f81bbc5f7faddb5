//! The single-writer executor (the "strand", spec §4.7/§5): one Tokio
//! task owns the whole [`Engine`], fed by an unbounded MPSC channel of
//! [`Command`]s. Every HTTP handler and the periodic tick timer enqueue a
//! command and await its reply through a paired oneshot channel — FIFO
//! delivery on the channel gives the strict ordering spec §5 requires
//! between ticks and player commands.
//!
//! Grounded directly on the teacher's `Room`/`Engine` single-ownership
//! loop (one task, `mpsc`-fed, no internal locking) generalized from "one
//! room per poker hand" to "one coordinator per server process".
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use scavenger_players::PlayerId;
use scavenger_players::Token;
use scavenger_records::RetiredPlayer;
use scavenger_world::Direction;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::engine::Engine;
use crate::engine::parse_move;
use crate::errors::ActionError;
use crate::errors::JoinError;
use crate::errors::TickError;
use crate::errors::UnknownToken;
use crate::retirement;
use crate::views::MapDetail;
use crate::views::MapSummary;
use crate::views::PlayerSummary;
use crate::views::StateView;

/// Immutable settings the coordinator is constructed with — the
/// translated CLI/env surface from spec §6.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Zero means "manual tick only" (test mode): no timer task is
    /// spawned and `/api/v1/game/tick` stays enabled.
    pub tick_period: Duration,
    pub state_file: Option<PathBuf>,
    pub save_state_period: Duration,
    pub randomize_spawn: bool,
}

enum Command {
    ListMaps { reply: oneshot::Sender<Vec<MapSummary>> },
    MapDetail { map_id: String, reply: oneshot::Sender<Option<MapDetail>> },
    Join { name: String, map_id: String, reply: oneshot::Sender<Result<(Token, PlayerId), JoinError>> },
    PlayersOnMap { token: Token, reply: oneshot::Sender<Result<Vec<PlayerSummary>, UnknownToken>> },
    State { token: Token, reply: oneshot::Sender<Result<StateView, UnknownToken>> },
    Action { token: Token, direction: Direction, reply: oneshot::Sender<Result<(), UnknownToken>> },
    Tick { elapsed: Duration, reply: oneshot::Sender<()> },
    Shutdown { reply: oneshot::Sender<()> },
}

/// A cheap, cloneable reference to the strand. Every clone shares the
/// same underlying channel, so ordering is preserved no matter how many
/// HTTP worker threads hold a handle.
#[derive(Clone)]
pub struct Coordinator {
    commands: mpsc::UnboundedSender<Command>,
    /// Whether `/api/v1/game/tick` should be rejected with 405 — fixed at
    /// startup, so this doesn't need a round trip through the strand.
    auto_tick: bool,
}

/// Join handles for the background tasks the coordinator spawns, kept by
/// `main` so it can wait for orderly shutdown.
pub struct CoordinatorTasks {
    pub strand: JoinHandle<()>,
    pub ticker: Option<JoinHandle<()>>,
    pub retirement: JoinHandle<()>,
}

impl Coordinator {
    /// Spawns the strand task (and, unless `tick_period` is zero, the
    /// periodic tick timer) and returns a handle plus their join handles.
    pub fn spawn(
        settings: Settings,
        engine: Engine,
        pool: Arc<scavenger_pg::ConnectionPool>,
    ) -> (Self, CoordinatorTasks) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (retired_tx, retired_rx) = mpsc::unbounded_channel();

        let retirement = tokio::spawn(retirement::run(pool, retired_rx));

        let auto_tick = !settings.tick_period.is_zero();
        let strand = tokio::spawn(run_strand(settings.clone(), engine, commands_rx, retired_tx));

        let ticker = auto_tick.then(|| {
            let tx = commands_tx.clone();
            let period = settings.tick_period;
            tokio::spawn(run_ticker(tx, period))
        });

        (Self { commands: commands_tx, auto_tick }, CoordinatorTasks { strand, ticker, retirement })
    }

    /// `/api/v1/game/tick` is enabled only when the server has no
    /// automatic tick schedule (spec §6: 405 otherwise).
    pub fn manual_tick_enabled(&self) -> bool {
        !self.auto_tick
    }

    pub async fn list_maps(&self) -> Vec<MapSummary> {
        self.call(|reply| Command::ListMaps { reply }).await
    }

    pub async fn map_detail(&self, map_id: String) -> Option<MapDetail> {
        self.call(|reply| Command::MapDetail { map_id, reply }).await
    }

    pub async fn join(&self, name: String, map_id: String) -> Result<(Token, PlayerId), JoinError> {
        self.call(|reply| Command::Join { name, map_id, reply }).await
    }

    pub async fn players_on_map(&self, token: Token) -> Result<Vec<PlayerSummary>, UnknownToken> {
        self.call(|reply| Command::PlayersOnMap { token, reply }).await
    }

    pub async fn state(&self, token: Token) -> Result<StateView, UnknownToken> {
        self.call(|reply| Command::State { token, reply }).await
    }

    pub async fn action(&self, token: Token, raw_move: &str) -> Result<(), ActionOutcome> {
        let direction = parse_move(raw_move).map_err(ActionOutcome::Invalid)?;
        self.call(|reply| Command::Action { token, direction, reply })
            .await
            .map_err(ActionOutcome::Unknown)
    }

    /// Posts an explicit tick. Rejected by the caller (`scavenger-api`)
    /// unless [`Self::manual_tick_enabled`] is true.
    pub async fn tick(&self, delta_ms: i64) -> Result<(), TickError> {
        if delta_ms <= 0 {
            return Err(TickError::NonPositiveDelta);
        }
        if !self.manual_tick_enabled() {
            return Err(TickError::AutomaticTickEnabled);
        }
        self.call(|reply| Command::Tick { elapsed: Duration::from_millis(delta_ms as u64), reply }).await;
        Ok(())
    }

    /// Runs one final snapshot on the strand and signals it to stop.
    /// Callers should then await [`CoordinatorTasks::strand`] and
    /// [`CoordinatorTasks::retirement`] to finish draining.
    pub async fn shutdown(&self) {
        self.call(|reply| Command::Shutdown { reply }).await;
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> T {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .expect("strand task outlives every Coordinator handle");
        rx.await.expect("strand task never drops a reply sender without answering")
    }
}

/// Outcome of a player action: either the move string wasn't one of the
/// five wire values, or the token isn't bound to a live player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Invalid(ActionError),
    Unknown(UnknownToken),
}

async fn run_ticker(commands: mpsc::UnboundedSender<Command>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let (reply, rx) = oneshot::channel();
        if commands.send(Command::Tick { elapsed: period, reply }).is_err() {
            return;
        }
        let _ = rx.await;
    }
}

async fn run_strand(
    settings: Settings,
    mut engine: Engine,
    mut commands: mpsc::UnboundedReceiver<Command>,
    retired_tx: mpsc::UnboundedSender<RetiredPlayer>,
) {
    let mut save_schedule = scavenger_storage::SaveSchedule::default();

    while let Some(command) = commands.recv().await {
        match command {
            Command::ListMaps { reply } => {
                let _ = reply.send(engine.list_maps());
            }
            Command::MapDetail { map_id, reply } => {
                let _ = reply.send(engine.map_detail(&map_id));
            }
            Command::Join { name, map_id, reply } => {
                let _ = reply.send(engine.join(name, &map_id));
            }
            Command::PlayersOnMap { token, reply } => {
                let _ = reply.send(engine.players_on_map(&token));
            }
            Command::State { token, reply } => {
                let _ = reply.send(engine.state(&token));
            }
            Command::Action { token, direction, reply } => {
                let _ = reply.send(engine.apply_move(&token, direction));
            }
            Command::Tick { elapsed, reply } => {
                for retired in engine.tick(elapsed) {
                    if retired_tx.send(retired).is_err() {
                        log::error!("retirement worker is gone; dropping a retirement record");
                    }
                }
                if save_schedule.tick(elapsed, settings.save_state_period) {
                    save_snapshot(&settings, &engine);
                }
                let _ = reply.send(());
            }
            Command::Shutdown { reply } => {
                save_snapshot(&settings, &engine);
                let _ = reply.send(());
                break;
            }
        }
    }
}

/// STORAGE_WARN: a failed snapshot write is logged, not propagated — the
/// server keeps running on in-memory state (spec §7).
fn save_snapshot(settings: &Settings, engine: &Engine) {
    let Some(path) = &settings.state_file else { return };
    let snapshot = engine.capture();
    if let Err(e) = scavenger_storage::write_atomic(path, &snapshot) {
        log::warn!("STORAGE_WARN: failed to write snapshot to {}: {e}", path.display());
    }
}
