use std::fmt::Display;
use std::path::Path;

use log::info;
use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::classifier::Predictor;
use crate::error::AppError;
use crate::preprocess::INPUT_SIZE;

/// The exported X-ray model, optimized once and shared by every request.
pub struct OnnxModel {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
}

fn unavailable<E: Display>(path: &Path) -> impl Fn(E) -> AppError + '_ {
    move |e| AppError::ModelUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn inference_failure<E: Display>(e: E) -> AppError {
    AppError::InferenceFailure(e.to_string())
}

impl OnnxModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let side = INPUT_SIZE as usize;

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(unavailable(path))?
            .with_input_fact(0, f32::fact([1, side, side, 3]).into())
            .map_err(unavailable(path))?
            .into_optimized()
            .map_err(unavailable(path))?
            .into_runnable()
            .map_err(unavailable(path))?;

        info!("Loaded model from {}", path.display());
        Ok(Self { plan })
    }
}

impl Predictor for OnnxModel {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, AppError> {
        let shape = input.shape().to_vec();
        let tensor = tract_ndarray::Array::from_shape_vec(shape, input.into_raw_vec())
            .map_err(inference_failure)?
            .into_tensor();

        let result = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(inference_failure)?;
        let output = result
            .first()
            .ok_or_else(|| inference_failure("model produced no outputs"))?;

        // Batch of one: the whole output is the single row of class scores.
        let scores = output.to_array_view::<f32>().map_err(inference_failure)?;
        Ok(scores.iter().copied().collect())
    }
}
