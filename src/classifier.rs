use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use ndarray::Array4;

use crate::error::AppError;
use crate::models::{PredictedLabels, CLASS_NAMES};
use crate::preprocess;

/// A loaded model: maps one preprocessed image batch to per-class probabilities.
pub trait Predictor: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, AppError>;
}

/// Turns image files into labelled percentages using a shared [`Predictor`].
#[derive(Clone)]
pub struct Classifier {
    predictor: Arc<dyn Predictor>,
    labels: &'static [&'static str],
}

impl Classifier {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            labels: &CLASS_NAMES,
        }
    }

    pub fn classify_file(&self, path: &Path) -> Result<PredictedLabels, AppError> {
        debug!("Classifying {}", path.display());
        let bytes = fs::read(path)?;
        self.classify_bytes(&bytes)
    }

    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<PredictedLabels, AppError> {
        let image = preprocess::decode_rgb(bytes)?;
        let input = preprocess::to_input_tensor(&image);

        let scores = self.predictor.predict(input)?;
        if scores.len() != self.labels.len() {
            return Err(AppError::InferenceFailure(format!(
                "model returned {} scores for {} labels",
                scores.len(),
                self.labels.len()
            )));
        }

        Ok(PredictedLabels::from_scores(self.labels, &scores))
    }
}
