use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the scoring console and overlay pages.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma separated, read once into
/// `ServerConfig`); entries that are empty, `null` or not http(s) are dropped.
/// With nothing usable configured only localhost dev origins are allowed.
pub fn cors_middleware(configured: &[String]) -> Cors {
    let mut origins: Vec<&str> = configured
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();
    if origins.is_empty() {
        origins = vec!["http://localhost:3000", "http://127.0.0.1:3000"];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_MATCH,
            header::IF_NONE_MATCH,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::ETAG,
            header::RETRY_AFTER,
        ])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
