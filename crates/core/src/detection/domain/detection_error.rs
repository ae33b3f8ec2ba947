use thiserror::Error;

/// A single model call failed. Distinct from "found nothing", which is an
/// empty result.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),
    #[error("unexpected model output: {0}")]
    Output(String),
    #[error("model session lock poisoned")]
    Poisoned,
    #[error("{0}")]
    Other(String),
}
