use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use xray_classifier::classifier::Classifier;
use xray_classifier::config::Config;
use xray_classifier::handlers::AppState;
use xray_classifier::model::OnnxModel;
use xray_classifier::storage::UploadDir;

fn startup_error(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    error!("{}", e);
    io::Error::new(io::ErrorKind::Other, e)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;
    let uploads = UploadDir::create(&config.upload_dir)?;
    let model = OnnxModel::load(&config.model_path).map_err(startup_error)?;

    let state = web::Data::new(AppState {
        classifier: Classifier::new(Arc::new(model)),
        uploads,
        max_upload_bytes: config.max_upload_bytes,
    });

    info!(
        "Server running at http://{}:{} (uploads in {})",
        config.host,
        config.port,
        config.upload_dir.display()
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(xray_classifier::routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
