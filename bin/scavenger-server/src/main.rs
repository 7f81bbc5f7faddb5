//! Scavenger game server binary.
//!
//! Loads the map catalog, connects to Postgres, restores any prior
//! snapshot, and serves the JSON API until interrupted.
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use scavenger_gameroom::Coordinator;
use scavenger_gameroom::Engine;
use scavenger_gameroom::Settings;

/// Scavenger game server.
#[derive(Parser, Debug)]
#[command(name = "scavenger-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON world/config file.
    #[arg(long, default_value = "config.json")]
    config_file: PathBuf,

    /// Directory of static assets to serve alongside the API.
    #[arg(long)]
    www_root: Option<PathBuf>,

    /// Automatic tick period in milliseconds. Omit to run the server in
    /// manual-tick mode, where `/api/v1/game/tick` is enabled instead.
    #[arg(long)]
    tick_period: Option<u64>,

    /// Path to the snapshot file. Omit to disable persistence entirely.
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// How often (in milliseconds) to write the snapshot. Defaults to
    /// every tick when a state file is configured.
    #[arg(long, default_value_t = 0)]
    save_state_period: u64,

    /// Spawn new players at a random point on the road network instead
    /// of the map's fixed initial point.
    #[arg(long)]
    randomize_spawn_points: bool,
}

const RETIREMENT_POOL_CAPACITY: usize = 4;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    scavenger_core::log();

    let loaded = match scavenger_config::load(&args.config_file) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(root) = &args.www_root {
        if !root.is_dir() {
            log::error!("CONFIG_ERROR: www-root {} is not a reachable directory", root.display());
            return ExitCode::FAILURE;
        }
    }

    let db_url = match std::env::var("GAME_DB_URL") {
        Ok(url) => url,
        Err(_) => {
            log::error!("FATAL_IO: GAME_DB_URL must be set");
            return ExitCode::FAILURE;
        }
    };
    let pool = match scavenger_pg::ConnectionPool::connect(&db_url, RETIREMENT_POOL_CAPACITY).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("FATAL_IO: failed to connect to database: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = scavenger_records::ensure_schema(&pool.acquire().await).await {
        log::error!("FATAL_IO: failed to prepare retirement schema: {e}");
        return ExitCode::FAILURE;
    }

    let mut engine = Engine::new(loaded.world, loaded.loot_generators, args.randomize_spawn_points);
    if let Some(path) = &args.state_file {
        if path.exists() {
            match scavenger_storage::read(path) {
                Ok(snapshot) => engine.restore(snapshot),
                Err(e) => log::warn!("STORAGE_WARN: failed to read snapshot {}: {e}", path.display()),
            }
        }
    }

    let settings = Settings {
        tick_period: args.tick_period.map(Duration::from_millis).unwrap_or(Duration::ZERO),
        state_file: args.state_file,
        save_state_period: Duration::from_millis(args.save_state_period),
        randomize_spawn: args.randomize_spawn_points,
    };
    let (coordinator, tasks): (Coordinator, _) = Coordinator::spawn(settings, engine, pool.clone());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let server = match scavenger_api::run(&bind_addr, coordinator.clone(), pool, args.www_root) {
        Ok(server) => server,
        Err(e) => {
            log::error!("FATAL_IO: failed to bind {bind_addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        _ = scavenger_core::shutdown_signal() => {
            log::info!("shutdown requested, draining connections");
            handle.stop(true).await;
            let _ = server_task.await;
        }
        res = server_task => {
            if let Ok(Err(e)) = res {
                log::error!("server exited with an error: {e}");
            }
        }
    }

    coordinator.shutdown().await;
    let _ = tasks.strand.await;
    if let Some(ticker) = tasks.ticker {
        ticker.abort();
    }
    let _ = tasks.retirement.await;

    ExitCode::SUCCESS
}
