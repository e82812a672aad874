use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

const MAX_MATCH_ID_LEN: usize = 64;

/// `{match_id}` path segment, restricted to `[A-Za-z0-9_-]`.
///
/// Existence is checked by the scoring service against the registry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_MATCH_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::bad_request(
                ErrorCode::InvalidMatchId,
                format!("Invalid match id: {raw:?}"),
            ));
        }
        Ok(MatchId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for MatchId {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("match_id")
            .ok_or_else(|| AppError::bad_request(ErrorCode::InvalidMatchId, "Missing match_id parameter"))
            .and_then(MatchId::parse);
        std::future::ready(result)
    }
}
