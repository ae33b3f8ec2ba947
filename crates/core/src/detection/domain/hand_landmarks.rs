//! 21-point hand skeleton in the MediaPipe index order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::bounding_region::Point;

pub const HAND_LANDMARK_COUNT: usize = 21;

/// Anatomical landmark indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("expected 21 hand landmarks, got {0}")]
pub struct LandmarkCountError(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Point; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Point; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Point]) -> Result<Self, LandmarkCountError> {
        let points: [Point; HAND_LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkCountError(points.len()))?;
        Ok(Self { points })
    }

    pub fn get(&self, landmark: HandLandmark) -> Point {
        self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Point; HAND_LANDMARK_COUNT] {
        &self.points
    }

    /// Mean y coordinate of the given landmarks, `None` if the set is empty.
    pub fn mean_y(&self, landmarks: &[HandLandmark]) -> Option<f64> {
        if landmarks.is_empty() {
            return None;
        }
        let sum: f64 = landmarks.iter().map(|&lm| self.get(lm).y).sum();
        Some(sum / landmarks.len() as f64)
    }
}
