use crate::error::ApiError;
use crate::server_state::ServerState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use system::{Point, Polygon, Reception, SessionKey};

pub fn configure_point_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/app/newpoint/{author}/{name}").route(web::post().to(publish)));
}

#[derive(Deserialize)]
pub struct DrawingPath {
    author: String,
    name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PublishResponse {
    pub buffered: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub polygon: Option<Polygon>,
}

impl From<Reception> for PublishResponse {
    fn from(reception: Reception) -> Self {
        match reception {
            Reception::Accumulating { buffered } => Self {
                buffered,
                polygon: None,
            },
            Reception::Completed(polygon) => Self {
                buffered: 0,
                polygon: Some(polygon),
            },
        }
    }
}

/// Same as a websocket `send` frame, for clients that only speak HTTP.
async fn publish(
    state: web::Data<ServerState>,
    path: web::Path<DrawingPath>,
    point: web::Json<Point>,
) -> Result<HttpResponse, ApiError> {
    let path = path.into_inner();
    let key = SessionKey::new(path.author, path.name);
    let reception = state.engine.receive(&key, point.into_inner())?;
    Ok(HttpResponse::Accepted().json(PublishResponse::from(reception)))
}
