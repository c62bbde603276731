use crate::connection::ws_index;
use crate::handlers::admin::configure_admin_handlers;
use crate::handlers::blueprints::configure_blueprint_handlers;
use crate::handlers::points::configure_point_handlers;
use actix_web::web;

mod admin;
mod blueprints;
pub mod points;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/").route(web::get().to(ws_index)));

    configure_point_handlers(cfg);
    configure_blueprint_handlers(cfg);
    configure_admin_handlers(cfg);
}
