pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod models;
pub mod preprocess;
pub mod storage;

use actix_web::web;

/// Registers the service's routes. Expects `web::Data<handlers::AppState>` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/upload").route(web::post().to(handlers::upload)))
        .service(web::resource("/health").route(web::get().to(handlers::health)));
}
