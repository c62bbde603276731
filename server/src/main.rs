use actix_web::{web, App, HttpServer};
use clap::Parser;

use server::config::Config;
use server::handlers::root;
use server::server_state::{spawn_idle_sweeper, ServerState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::parse();
    let bind = config.bind.clone();
    log::info!(
        "Listening on {} (polygon threshold {}, idle ttl {:?})",
        bind,
        config.polygon_threshold,
        config.idle_session_ttl_secs
    );

    let state = web::Data::new(ServerState::in_memory(config));
    spawn_idle_sweeper(state.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(state.config.cors())
            .app_data(state.clone())
            .configure(root)
    })
    .bind(bind)?
    .run()
    .await
}
