#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;

pub use crease_test_support::problem_details::{assert_problem_details, ProblemBody};

// Logging is auto-installed for every test binary that declares `mod common;`.
#[ctor::ctor]
fn init_logging() {
    crease_test_support::logging::init();
}

/// Problem-details assertion plus the `Retry-After`/`WWW-Authenticate`
/// headers some statuses carry.
pub async fn assert_problem_with_headers(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemBody {
    let retry_after = resp.headers().get("retry-after").cloned();
    let www_authenticate = resp.headers().get("www-authenticate").cloned();

    let problem = assert_problem_details(resp, expected_code, expected_status).await;

    if expected_status == StatusCode::SERVICE_UNAVAILABLE {
        assert!(retry_after.is_some(), "503 should carry Retry-After");
    }
    if expected_status == StatusCode::UNAUTHORIZED {
        assert_eq!(
            www_authenticate.as_ref().and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }
    problem
}
