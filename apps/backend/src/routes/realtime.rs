use actix_web::web;

use crate::ws::session;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/{match_id}", web::get().to(session::upgrade));
}
