use crate::error::ApiError;
use crate::server_state::ServerState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use system::{Blueprint, SessionKey};

pub fn configure_blueprint_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blueprints")
            .service(
                web::resource("")
                    .route(web::get().to(list_all))
                    .route(web::post().to(create)),
            )
            .service(web::resource("/{author}").route(web::get().to(list_by_author)))
            .service(
                web::resource("/{author}/{name}")
                    .route(web::get().to(show))
                    .route(web::put().to(update))
                    .route(web::delete().to(delete)),
            ),
    );
}

#[derive(Deserialize)]
pub struct BlueprintPath {
    author: String,
    name: String,
}

impl BlueprintPath {
    fn key(&self) -> SessionKey {
        SessionKey::new(self.author.clone(), self.name.clone())
    }
}

async fn list_all(state: web::Data<ServerState>) -> Result<HttpResponse, ApiError> {
    let blueprints = state.blueprints.list_all()?;
    Ok(HttpResponse::Ok().json(blueprints))
}

async fn list_by_author(
    state: web::Data<ServerState>,
    author: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let blueprints = state.blueprints.list_by_author(&author)?;
    Ok(HttpResponse::Ok().json(blueprints))
}

async fn show(
    state: web::Data<ServerState>,
    path: web::Path<BlueprintPath>,
) -> Result<HttpResponse, ApiError> {
    let blueprint = state.blueprints.get(&path.key())?;
    Ok(HttpResponse::Ok().json(blueprint))
}

async fn create(
    state: web::Data<ServerState>,
    blueprint: web::Json<Blueprint>,
) -> Result<HttpResponse, ApiError> {
    let blueprint = state.blueprints.create(blueprint.into_inner())?;
    log::info!("Registered blueprint {}", blueprint.key());
    Ok(HttpResponse::Ok().json(blueprint))
}

async fn update(
    state: web::Data<ServerState>,
    path: web::Path<BlueprintPath>,
    blueprint: web::Json<Blueprint>,
) -> Result<HttpResponse, ApiError> {
    let blueprint = state.blueprints.update(&path.key(), blueprint.into_inner())?;
    Ok(HttpResponse::Ok().json(blueprint))
}

async fn delete(
    state: web::Data<ServerState>,
    path: web::Path<BlueprintPath>,
) -> Result<HttpResponse, ApiError> {
    let key = path.key();
    state.blueprints.delete(&key)?;
    Ok(HttpResponse::Ok().body(format!("Blueprint deleted: {}", key)))
}
