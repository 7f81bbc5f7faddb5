//! Route table for spec §6, wired so a method mismatch responds 405 with
//! both the required `Allow` header and the standard `{"code","message"}`
//! error body (actix's built-in 405 has the header but a plain-text body,
//! so each resource gets an explicit `default_service` instead).
use actix_web::HttpResponse;
use actix_web::web;

use crate::handlers;

fn method_not_allowed(allow: &'static str) -> HttpResponse {
    HttpResponse::MethodNotAllowed().insert_header(("Allow", allow)).json(serde_json::json!({
        "code": "methodNotAllowed",
        "message": format!("method not allowed, expected one of: {allow}"),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/maps")
            .route(web::get().to(handlers::list_maps))
            .route(web::head().to(handlers::list_maps))
            .default_service(web::to(|| async { method_not_allowed("GET, HEAD") })),
    )
    .service(
        web::resource("/api/v1/maps/{id}")
            .route(web::get().to(handlers::get_map))
            .route(web::head().to(handlers::get_map))
            .default_service(web::to(|| async { method_not_allowed("GET, HEAD") })),
    )
    .service(
        web::resource("/api/v1/game/join")
            .route(web::post().to(handlers::join))
            .default_service(web::to(|| async { method_not_allowed("POST") })),
    )
    .service(
        web::resource("/api/v1/game/players")
            .route(web::get().to(handlers::players))
            .route(web::head().to(handlers::players))
            .default_service(web::to(|| async { method_not_allowed("GET, HEAD") })),
    )
    .service(
        web::resource("/api/v1/game/state")
            .route(web::get().to(handlers::state))
            .route(web::head().to(handlers::state))
            .default_service(web::to(|| async { method_not_allowed("GET, HEAD") })),
    )
    .service(
        web::resource("/api/v1/game/player/action")
            .route(web::post().to(handlers::action))
            .default_service(web::to(|| async { method_not_allowed("POST") })),
    )
    .service(
        web::resource("/api/v1/game/tick")
            .route(web::post().to(handlers::tick))
            .default_service(web::to(|| async { method_not_allowed("POST") })),
    )
    .service(
        web::resource("/api/v1/game/records")
            .route(web::get().to(handlers::records))
            .default_service(web::to(|| async { method_not_allowed("GET") })),
    );
}
