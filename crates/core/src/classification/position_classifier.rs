use crate::classification::classifier_config::ClassifierConfig;
use crate::classification::zone::Zone;
use crate::classification::zone_thresholds::ZoneThresholds;
use crate::detection::domain::hand_landmarks::{HandLandmark, HandLandmarks};
use crate::shared::bounding_region::BoundingRegion;

/// Maps a face box and a hand skeleton to a [`Zone`].
///
/// Pure and deterministic. `None` means indeterminate: a missing input, a
/// face box with no height, or a coordinate that is not a number.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionClassifier {
    thresholds: ZoneThresholds,
    anchor: Vec<HandLandmark>,
}

impl PositionClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            thresholds: config.boundaries,
            anchor: config.anchor,
        }
    }

    pub fn thresholds(&self) -> &ZoneThresholds {
        &self.thresholds
    }

    /// Hand height as a fraction of face height, measured from the face top.
    pub fn relative_y(&self, face: &BoundingRegion, hand: &HandLandmarks) -> Option<f64> {
        if face.is_degenerate() {
            return None;
        }
        let hand_y = hand.mean_y(&self.anchor)?;
        Some((hand_y - face.top()) / face.height())
    }

    pub fn classify(
        &self,
        face: Option<&BoundingRegion>,
        hand: Option<&HandLandmarks>,
    ) -> Option<Zone> {
        let (face, hand) = face.zip(hand)?;
        let relative_y = self.relative_y(face, hand)?;
        let zone = self.thresholds.zone_for(relative_y);
        log::trace!(
            "face top={:.1} height={:.1} relative_y={relative_y:.3} -> {zone:?}",
            face.top(),
            face.height()
        );
        zone
    }
}

impl Default for PositionClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Classifies with the default thresholds and anchor.
pub fn classify(face: Option<&BoundingRegion>, hand: Option<&HandLandmarks>) -> Option<Zone> {
    PositionClassifier::default().classify(face, hand)
}
