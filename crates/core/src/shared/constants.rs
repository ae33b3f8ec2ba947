//! Model files are located by name in the cache or a bundled directory.
//! Neither model has a default download URL; one can be configured per model.

pub const FACE_MODEL_NAME: &str = "blazeface_short_range.onnx";

pub const HAND_MODEL_NAME: &str = "hand_landmark_full.onnx";

/// Directory name under the platform cache dir where models are stored.
pub const APP_CACHE_NAME: &str = "HandCue";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
