use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::hand_landmarks::HandLandmarks;
use crate::shared::frame::Frame;

/// Domain interface for hand-pose estimation.
pub trait HandModel: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<HandLandmarks>, DetectionError>;
}
