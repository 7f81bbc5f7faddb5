//! HTTP/JSON API surface (spec §6) over a [`scavenger_gameroom::Coordinator`].
//!
//! Every handler is a thin adapter: extract and validate the request,
//! forward to the coordinator, translate the result to a DTO. No
//! handler touches simulation state directly.
mod auth;
mod dto;
mod errors;
mod handlers;
mod routes;

pub use errors::ApiError;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use scavenger_gameroom::Coordinator;
use scavenger_pg::ConnectionPool;
use std::path::PathBuf;
use std::sync::Arc;

/// Binds the HTTP server and hands back the running [`actix_web::dev::Server`]
/// without awaiting it, so the caller can drive shutdown alongside its own
/// signal handling (`server.handle().stop(true)` then await the returned
/// server to let in-flight requests finish).
///
/// `www_root` is accepted for CLI-contract completeness only — static-file
/// serving is out of scope for this core, so the path is never read.
pub fn run(
    bind_addr: &str,
    coordinator: Coordinator,
    pool: Arc<ConnectionPool>,
    www_root: Option<PathBuf>,
) -> std::io::Result<actix_web::dev::Server> {
    if let Some(root) = &www_root {
        log::debug!("www-root {} accepted but not served (out of scope)", root.display());
    }
    let coordinator = web::Data::new(coordinator);
    let pool = web::Data::new(pool);
    log::info!("starting scavenger api on {bind_addr}");
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(coordinator.clone())
            .app_data(pool.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run();
    Ok(server)
}
