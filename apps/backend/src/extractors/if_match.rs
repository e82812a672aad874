use actix_web::dev::Payload;
use actix_web::http::header::IF_MATCH;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::http::etag::parse_match_version_from_etag;

/// Version named by an optional `If-Match` header.
///
/// `None` when the header is absent or `*`; the command then applies to
/// whatever version is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedVersion(pub Option<u64>);

impl FromRequest for ExpectedVersion {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<ExpectedVersion, AppError> {
    let Some(value) = req.headers().get(IF_MATCH) else {
        return Ok(ExpectedVersion(None));
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidHeader, "If-Match is not valid ASCII"))?
        .trim();
    if value == "*" {
        return Ok(ExpectedVersion(None));
    }
    parse_match_version_from_etag(value).map(|v| ExpectedVersion(Some(v)))
}
