use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;

use crate::classifier::Classifier;
use crate::error::AppError;
use crate::models::{HealthResponse, PredictionResponse};
use crate::storage::UploadDir;

/// Multipart field that carries the image.
pub const FILE_FIELD: &str = "file";

/// Everything a request needs, built once in `main` and shared by all workers.
pub struct AppState {
    pub classifier: Classifier,
    pub uploads: UploadDir,
    pub max_upload_bytes: usize,
}

fn malformed(e: impl std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("Malformed multipart body: {}", e))
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if data.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge { limit });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

pub async fn upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut saved = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;
        let disposition = field.content_disposition();
        // A part without a filename parameter is a plain form value, not a file.
        let filename = match (disposition.get_name(), disposition.get_filename()) {
            (Some(FILE_FIELD), Some(filename)) => filename.to_owned(),
            _ => continue,
        };
        if filename.is_empty() {
            return Err(AppError::InvalidInput("No selected file".into()));
        }

        let data = read_field(&mut field, state.max_upload_bytes).await?;
        saved = Some(state.uploads.save(&filename, data).await?);
        break;
    }

    let path = saved.ok_or_else(|| AppError::InvalidInput("No file part".into()))?;
    info!("Stored upload at {}", path.display());

    let classifier = state.classifier.clone();
    let predicted_labels = web::block(move || classifier.classify_file(&path)).await??;

    Ok(HttpResponse::Ok().json(PredictionResponse { predicted_labels }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "OK" })
}
