use crate::detection::domain::detection_error::DetectionError;
use crate::shared::bounding_region::BoundingRegion;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Handles are shared read-only by every frame's sampler call, so detection
/// takes `&self` and implementations must be `Sync`. Results are ordered by
/// the model's preference; callers that track a single signer use the first.
pub trait FaceModel: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<BoundingRegion>, DetectionError>;
}
