use actix_web::web;

pub mod health;
pub mod matches;
pub mod realtime;

/// Register every route. `main.rs` and the integration tests share this so
/// both exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/matches").configure(matches::configure_routes));
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
