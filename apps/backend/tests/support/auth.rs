//! Token helpers for tests.

use std::time::{Duration, SystemTime};

use crease::auth::jwt::{mint_access_token, mint_access_token_with_ttl};
use crease::state::security_config::SecurityConfig;

pub fn mint_test_token(sub: &str, sec: &SecurityConfig) -> String {
    mint_access_token(sub, SystemTime::now(), sec).expect("should mint token successfully")
}

/// Full `Authorization` header value.
pub fn bearer_header(sub: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, sec))
}

/// A token that expired an hour ago.
pub fn mint_expired_token(sub: &str, sec: &SecurityConfig) -> String {
    let issued = SystemTime::now() - Duration::from_secs(7200);
    mint_access_token_with_ttl(sub, issued, 3600, sec).expect("should mint expired token")
}
