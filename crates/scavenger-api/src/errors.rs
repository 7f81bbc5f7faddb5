//! The one JSON error shape every route uses: `{"code","message"}`
//! (spec §6/§7). Each variant knows its own status code; `ResponseError`
//! is the only place that knowledge lives.
use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    InvalidArgument,
    InvalidName,
    MapNotFound,
    InvalidToken,
    UnknownToken,
    Internal,
}

impl ApiError {
    fn code(self) -> &'static str {
        match self {
            ApiError::InvalidArgument => "invalidArgument",
            ApiError::InvalidName => "invalidName",
            ApiError::MapNotFound => "mapNotFound",
            ApiError::InvalidToken => "invalidToken",
            ApiError::UnknownToken => "unknownToken",
            ApiError::Internal => "internalError",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ApiError::InvalidArgument => "invalid argument",
            ApiError::InvalidName => "player name must not be empty",
            ApiError::MapNotFound => "map not found",
            ApiError::InvalidToken => "authorization header is missing or malformed",
            ApiError::UnknownToken => "player token is not recognized",
            ApiError::Internal => "internal server error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument | ApiError::InvalidName => StatusCode::BAD_REQUEST,
            ApiError::MapNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidToken | ApiError::UnknownToken => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorBody { code: self.code(), message: self.message() })
    }
}

impl From<scavenger_gameroom::JoinError> for ApiError {
    fn from(e: scavenger_gameroom::JoinError) -> Self {
        match e {
            scavenger_gameroom::JoinError::InvalidName => ApiError::InvalidName,
            scavenger_gameroom::JoinError::MapNotFound => ApiError::MapNotFound,
        }
    }
}

impl From<scavenger_gameroom::UnknownToken> for ApiError {
    fn from(_: scavenger_gameroom::UnknownToken) -> Self {
        ApiError::UnknownToken
    }
}
