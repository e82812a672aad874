use actix_web::http::StatusCode;
use actix_web::ResponseError;

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

fn mapped(err: DomainError) -> (ErrorCode, StatusCode) {
    let app: AppError = err.into();
    (app.code(), app.status())
}

#[test]
fn scoring_errors_map_to_distinct_statuses() {
    assert_eq!(
        mapped(DomainError::invalid_state("Innings has already ended")),
        (ErrorCode::InvalidStateTransition, StatusCode::CONFLICT)
    );
    assert_eq!(
        mapped(DomainError::validation(ValidationKind::ConsecutiveOver, "x")),
        (ErrorCode::ConsecutiveOver, StatusCode::UNPROCESSABLE_ENTITY)
    );
    assert_eq!(
        mapped(DomainError::validation(ValidationKind::InvalidRules, "x")),
        (ErrorCode::InvalidRules, StatusCode::UNPROCESSABLE_ENTITY)
    );
    assert_eq!(
        mapped(DomainError::not_authorized("not the owner")),
        (ErrorCode::NotAuthorized, StatusCode::FORBIDDEN)
    );
}

#[test]
fn infra_errors_map_to_server_statuses() {
    assert_eq!(
        mapped(DomainError::persistence("store offline")),
        (ErrorCode::PersistenceFailure, StatusCode::SERVICE_UNAVAILABLE)
    );
    assert_eq!(
        mapped(DomainError::corrupt("bad doc")),
        (ErrorCode::DataCorruption, StatusCode::INTERNAL_SERVER_ERROR)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::Other("x".into()), "x")),
        (ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR)
    );
}

#[test]
fn lookup_and_conflict_errors() {
    assert_eq!(
        mapped(DomainError::not_found(NotFoundKind::Match, "m1")),
        (ErrorCode::MatchNotFound, StatusCode::NOT_FOUND)
    );
    assert_eq!(
        mapped(DomainError::conflict(ConflictKind::OptimisticLock, "stale")),
        (ErrorCode::OptimisticLock, StatusCode::CONFLICT)
    );
}

#[test]
fn retry_and_auth_headers_follow_status() {
    let resp = AppError::from(DomainError::persistence("down")).error_response();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp.headers().contains_key("retry-after"));
    assert!(!resp.headers().contains_key("www-authenticate"));

    let resp = AppError::unauthorized_missing_bearer().error_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("www-authenticate").unwrap(), "Bearer");
    assert!(!resp.headers().contains_key("retry-after"));

    let resp =
        AppError::from(DomainError::validation(ValidationKind::InvalidRuns, "7 runs")).error_response();
    assert!(!resp.headers().contains_key("retry-after"));
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
}

#[test]
fn titles_are_humanized_codes() {
    assert_eq!(
        AppError::humanize_code("BATTER_SELECTION_PENDING"),
        "Batter Selection Pending"
    );
}
