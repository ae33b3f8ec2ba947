use std::path::Path;

use crate::shared::frame::Frame;

/// Persists a single frame, e.g. an overlay snapshot. The format follows the
/// file extension.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
