//! One thin handler per route in spec §6: validate input, enqueue on the
//! coordinator, serialize the result. No handler touches simulation state
//! directly — that's `scavenger-gameroom::Coordinator`'s job.
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::ResponseError;
use actix_web::web;
use scavenger_pg::ConnectionPool;
use std::sync::Arc;

use crate::auth::Bearer;
use crate::dto::ActionRequest;
use crate::dto::JoinRequest;
use crate::dto::JoinResponseDto;
use crate::dto::MapDetailDto;
use crate::dto::MapSummaryDto;
use crate::dto::RecordDto;
use crate::dto::RecordsQuery;
use crate::dto::StateDto;
use crate::dto::TickRequest;
use crate::dto::players_dto;
use crate::errors::ApiError;

pub async fn list_maps(coordinator: web::Data<scavenger_gameroom::Coordinator>) -> impl Responder {
    let maps: Vec<MapSummaryDto> = coordinator.list_maps().await.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(maps)
}

pub async fn get_map(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let detail = coordinator.map_detail(path.into_inner()).await.ok_or(ApiError::MapNotFound)?;
    Ok(HttpResponse::Ok().json(MapDetailDto::from(detail)))
}

pub async fn join(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    body: web::Json<JoinRequest>,
) -> Result<impl Responder, ApiError> {
    if body.user_name.trim().is_empty() {
        return Err(ApiError::InvalidName);
    }
    let (token, player_id) = coordinator.join(body.user_name.clone(), body.map_id.clone()).await?;
    Ok(HttpResponse::Ok().json(JoinResponseDto {
        auth_token: token.as_str().to_string(),
        player_id,
    }))
}

pub async fn players(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    Bearer(token): Bearer,
) -> Result<impl Responder, ApiError> {
    let list = coordinator.players_on_map(token).await?;
    Ok(HttpResponse::Ok().json(players_dto(list)))
}

pub async fn state(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    Bearer(token): Bearer,
) -> Result<impl Responder, ApiError> {
    let view = coordinator.state(token).await?;
    Ok(HttpResponse::Ok().json(StateDto::from(view)))
}

pub async fn action(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    Bearer(token): Bearer,
    body: web::Json<ActionRequest>,
) -> Result<impl Responder, ApiError> {
    coordinator
        .action(token, &body.direction)
        .await
        .map_err(|outcome| match outcome {
            scavenger_gameroom::ActionOutcome::Invalid(_) => ApiError::InvalidArgument,
            scavenger_gameroom::ActionOutcome::Unknown(_) => ApiError::UnknownToken,
        })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

pub async fn tick(
    coordinator: web::Data<scavenger_gameroom::Coordinator>,
    body: web::Json<TickRequest>,
) -> HttpResponse {
    match coordinator.tick(body.time_delta).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({})),
        Err(scavenger_gameroom::TickError::NonPositiveDelta) => ApiError::InvalidArgument.error_response(),
        Err(scavenger_gameroom::TickError::AutomaticTickEnabled) => HttpResponse::MethodNotAllowed()
            .insert_header(("Allow", "POST"))
            .json(serde_json::json!({
                "code": "methodNotAllowed",
                "message": "server runs its own tick schedule; manual ticks are disabled",
            })),
    }
}

pub async fn records(
    pool: web::Data<Arc<ConnectionPool>>,
    query: web::Query<RecordsQuery>,
) -> Result<impl Responder, ApiError> {
    let conn = pool.acquire().await;
    let max_items = query.max_items.map(|n| n.min(100));
    let records = scavenger_records::get_records(&conn, query.start, max_items)
        .await
        .map_err(|e| {
            log::error!("failed to read retirement records: {e}");
            ApiError::Internal
        })?;
    let dtos: Vec<RecordDto> = records.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(dtos))
}
