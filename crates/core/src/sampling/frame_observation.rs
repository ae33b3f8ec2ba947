use crate::detection::domain::hand_landmarks::HandLandmarks;
use crate::shared::bounding_region::BoundingRegion;

/// What both models saw in one frame. Built fresh per frame, never retained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameObservation {
    /// Index of the sampled frame, `None` when there was no frame.
    pub frame_index: Option<usize>,
    pub face: Option<BoundingRegion>,
    pub hand: Option<HandLandmarks>,
}

impl FrameObservation {
    pub fn empty(frame_index: Option<usize>) -> Self {
        Self {
            frame_index,
            face: None,
            hand: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.face.is_none() && self.hand.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.face.is_some() && self.hand.is_some()
    }
}
