use std::{io, sync::Arc};

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::mongo::MongoStore;
use trip_planner_api::{routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = MongoStore::connect(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|e| {
            error!("Failed to initialise MongoDB: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;
    info!("Using database {}", config.database_name);

    let host = config.host.clone();
    let port = config.port;
    let cors_origin = config.cors_origin.clone();
    let state = web::Data::new(AppState::new(config, Arc::new(store)));

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors_policy(&cors_origin))
            .wrap(Logger::default())
            .configure(routes::configure(state.clone()))
    })
    .bind((host, port))?
    .run()
    .await
}
