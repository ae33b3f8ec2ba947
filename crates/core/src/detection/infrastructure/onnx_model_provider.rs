use std::sync::Arc;

use crate::detection::domain::face_model::FaceModel;
use crate::detection::domain::hand_model::HandModel;
use crate::detection::domain::model_provider::{
    load_concurrently, ModelLoadError, ModelProvider, ModelSession,
};
use crate::detection::infrastructure::{onnx_face_detector, onnx_hand_landmarker};
use crate::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use crate::detection::infrastructure::onnx_hand_landmarker::OnnxHandLandmarker;
use crate::shared::constants::{FACE_MODEL_NAME, HAND_MODEL_NAME};
use crate::shared::model_resolver::{ModelResolver, ProgressFn};

/// Download progress: `(model_name, bytes_downloaded, total_bytes)`.
pub type DownloadProgress = fn(&str, u64, u64);

/// Loads the ONNX face and hand models, resolving files through a
/// [`ModelResolver`]. Both files are resolved and loaded in parallel.
///
/// A model is only downloaded when a URL has been configured for it.
pub struct OnnxModelProvider {
    resolver: ModelResolver,
    face_url: Option<String>,
    hand_url: Option<String>,
    face_confidence: f64,
    hand_confidence: f64,
    progress: Option<DownloadProgress>,
}

impl OnnxModelProvider {
    pub fn new(resolver: ModelResolver) -> Self {
        Self {
            resolver,
            face_url: None,
            hand_url: None,
            face_confidence: onnx_face_detector::DEFAULT_CONFIDENCE,
            hand_confidence: onnx_hand_landmarker::DEFAULT_CONFIDENCE,
            progress: None,
        }
    }

    pub fn with_face_model_url(mut self, url: impl Into<String>) -> Self {
        self.face_url = Some(url.into());
        self
    }

    pub fn with_hand_model_url(mut self, url: impl Into<String>) -> Self {
        self.hand_url = Some(url.into());
        self
    }

    pub fn with_face_confidence(mut self, confidence: f64) -> Self {
        self.face_confidence = confidence;
        self
    }

    pub fn with_hand_confidence(mut self, confidence: f64) -> Self {
        self.hand_confidence = confidence;
        self
    }

    pub fn with_download_progress(mut self, progress: DownloadProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    fn progress_for(&self, name: &'static str) -> Option<ProgressFn> {
        self.progress
            .map(|report| Box::new(move |done, total| report(name, done, total)) as ProgressFn)
    }
}

impl ModelProvider for OnnxModelProvider {
    fn acquire(&self) -> Result<ModelSession, ModelLoadError> {
        let resolver = &self.resolver;
        load_concurrently(
            || {
                let path = resolver.resolve(
                    FACE_MODEL_NAME,
                    self.face_url.as_deref(),
                    self.progress_for(FACE_MODEL_NAME),
                )?;
                let model = OnnxFaceDetector::new(&path, self.face_confidence)?;
                Ok(Arc::new(model) as Arc<dyn FaceModel>)
            },
            || {
                let path = resolver.resolve(
                    HAND_MODEL_NAME,
                    self.hand_url.as_deref(),
                    self.progress_for(HAND_MODEL_NAME),
                )?;
                let model = OnnxHandLandmarker::new(&path, self.hand_confidence)?;
                Ok(Arc::new(model) as Arc<dyn HandModel>)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn provider_with_bundled(files: &[&str]) -> (TempDir, OnnxModelProvider) {
        let tmp = TempDir::new().unwrap();
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        for name in files {
            fs::write(bundled.join(name), b"not an onnx graph").unwrap();
        }
        let resolver = ModelResolver::new(tmp.path().join("cache"), Some(bundled));
        (tmp, OnnxModelProvider::new(resolver))
    }

    #[test]
    fn test_corrupt_models_fail_acquisition() {
        let (_tmp, provider) = provider_with_bundled(&[FACE_MODEL_NAME, HAND_MODEL_NAME]);
        let err = provider.acquire().err().unwrap();
        assert!(matches!(
            err,
            ModelLoadError::Face(_) | ModelLoadError::Hand(_)
        ));
    }

    #[test]
    fn test_missing_models_without_urls_fail_acquisition() {
        let (_tmp, provider) = provider_with_bundled(&[HAND_MODEL_NAME]);
        match provider.acquire() {
            Err(ModelLoadError::Face(e)) => {
                assert!(e.to_string().contains(FACE_MODEL_NAME));
                assert!(e.to_string().contains("no download URL"));
            }
            Err(e) => panic!("expected face load error, got {e}"),
            Ok(_) => panic!("expected acquisition to fail"),
        }
    }

    #[test]
    fn test_builder_sets_model_urls() {
        let (_tmp, provider) = provider_with_bundled(&[]);
        assert!(provider.face_url.is_none());
        let provider = provider
            .with_face_model_url("https://models.example.com/face.onnx")
            .with_hand_model_url(String::from("https://models.example.com/hand.onnx"));
        assert_eq!(
            provider.face_url.as_deref(),
            Some("https://models.example.com/face.onnx")
        );
        assert_eq!(
            provider.hand_url.as_deref(),
            Some("https://models.example.com/hand.onnx")
        );
    }

    #[test]
    fn test_builder_overrides_confidences() {
        let (_tmp, provider) = provider_with_bundled(&[]);
        let provider = provider.with_face_confidence(0.8).with_hand_confidence(0.3);
        assert_eq!(provider.face_confidence, 0.8);
        assert_eq!(provider.hand_confidence, 0.3);
        assert!(provider.progress_for(FACE_MODEL_NAME).is_none());
    }

    #[test]
    fn test_download_progress_is_tagged_with_model_name() {
        fn report(name: &str, _done: u64, _total: u64) {
            assert_eq!(name, HAND_MODEL_NAME);
        }
        let (_tmp, provider) = provider_with_bundled(&[]);
        let provider = provider.with_download_progress(report);
        let progress = provider.progress_for(HAND_MODEL_NAME).unwrap();
        progress(10, 100);
    }
}
