//! Bearer-token extraction (spec §6: `Authorization: Bearer <32-hex>`).
//!
//! Grounded on the teacher's `rbp_auth::Auth` `FromRequest` extractor,
//! simplified from JWT verification down to "is this syntactically a
//! token at all" — actually resolving it to a player is the coordinator's
//! job ([`scavenger_gameroom::Coordinator::state`] and friends already
//! return `UnknownToken` for a well-formed-but-unregistered one).
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use scavenger_players::Token;
use std::future::Ready;
use std::future::ready;

use crate::errors::ApiError;

pub struct Bearer(pub Token);

impl FromRequest for Bearer {
    type Error = ApiError;
    type Future = Ready<Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req).map(Bearer))
    }
}

fn extract(req: &HttpRequest) -> Result<Token, ApiError> {
    let header = req.headers().get("Authorization").ok_or(ApiError::InvalidToken)?;
    let header = header.to_str().map_err(|_| ApiError::InvalidToken)?;
    let raw = header.strip_prefix("Bearer ").ok_or(ApiError::InvalidToken)?;
    Token::parse(raw).map_err(|_| ApiError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_header_is_invalid_token() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract(&req), Err(ApiError::InvalidToken));
    }

    #[test]
    fn malformed_scheme_is_invalid_token() {
        let req = TestRequest::default().insert_header(("Authorization", "Basic abc")).to_http_request();
        assert_eq!(extract(&req), Err(ApiError::InvalidToken));
    }

    #[test]
    fn well_formed_bearer_token_is_accepted() {
        let token = "a".repeat(32);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        assert_eq!(extract(&req).unwrap().as_str(), token);
    }
}
