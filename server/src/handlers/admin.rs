use crate::server_state::ServerState;
use actix_web::{error, web, HttpResponse, Result};
use askama::Template;
use system::Channel;

pub fn configure_admin_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").service(
            web::resource("/")
                .name("admin_sessions")
                .route(web::get().to(admin_sessions)),
        ),
    );
}

struct SessionRow {
    author: String,
    name: String,
    buffered: usize,
    polygons_emitted: u64,
    idle_secs: u64,
    point_subscribers: usize,
    polygon_subscribers: usize,
}

#[derive(Template)]
#[template(path = "admin-sessions.html")]
pub struct AdminSessionsTemplate {
    threshold: usize,
    sessions: Vec<SessionRow>,
}

impl AdminSessionsTemplate {
    fn from_state(state: &ServerState) -> Self {
        let sessions = state
            .engine
            .sessions()
            .into_iter()
            .map(|stats| SessionRow {
                author: stats.key.author().to_owned(),
                name: stats.key.name().to_owned(),
                buffered: stats.buffered,
                polygons_emitted: stats.polygons_emitted,
                idle_secs: stats.idle_for.as_secs(),
                point_subscribers: state.hub.subscriber_count(&Channel::point(stats.key.clone())),
                polygon_subscribers: state.hub.subscriber_count(&Channel::polygon(stats.key)),
            })
            .collect();
        Self {
            threshold: state.engine.config().threshold.get(),
            sessions,
        }
    }
}

pub async fn admin_sessions(state: web::Data<ServerState>) -> Result<HttpResponse> {
    let body = AdminSessionsTemplate::from_state(&state)
        .render()
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body))
}
