//! Ordered boundary table mapping a face-relative coordinate to a zone.
//!
//! Boundary `i` is the exclusive upper bound of zone `i + 1`; anything at or
//! past the last boundary is [`Zone::Throat`]. The defaults are empirical and
//! exposed for tuning rather than derived.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classification::zone::Zone;

pub const BOUNDARY_COUNT: usize = 4;

pub const DEFAULT_BOUNDARIES: [f64; BOUNDARY_COUNT] = [0.2, 0.4, 0.6, 0.9];

#[derive(Error, Debug, PartialEq)]
pub enum ThresholdError {
    #[error("zone boundary {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },
    #[error("zone boundaries must be strictly ascending, boundary {index} ({value}) is not")]
    NotAscending { index: usize, value: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; BOUNDARY_COUNT]", into = "[f64; BOUNDARY_COUNT]")]
pub struct ZoneThresholds {
    boundaries: [f64; BOUNDARY_COUNT],
}

/// A guide row between two adjacent zones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneBoundary {
    pub fraction: f64,
    pub above: Zone,
    pub below: Zone,
}

impl ZoneBoundary {
    /// Short name such as `"1|2"`.
    pub fn name(&self) -> String {
        format!("{}|{}", self.above, self.below)
    }
}

impl ZoneThresholds {
    pub fn new(boundaries: [f64; BOUNDARY_COUNT]) -> Result<Self, ThresholdError> {
        for (index, &value) in boundaries.iter().enumerate() {
            if !value.is_finite() {
                return Err(ThresholdError::NonFinite { index, value });
            }
            if index > 0 && value <= boundaries[index - 1] {
                return Err(ThresholdError::NotAscending { index, value });
            }
        }
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[f64; BOUNDARY_COUNT] {
        &self.boundaries
    }

    /// `(upper_bound, zone)` rows in ascending order.
    pub fn table(&self) -> impl Iterator<Item = (f64, Zone)> + '_ {
        self.boundaries.iter().copied().zip(Zone::ALL)
    }

    /// First row whose upper bound exceeds `relative_y`, else the last zone.
    /// NaN has no zone.
    pub fn zone_for(&self, relative_y: f64) -> Option<Zone> {
        if relative_y.is_nan() {
            return None;
        }
        let zone = self
            .table()
            .find(|&(upper, _)| relative_y < upper)
            .map(|(_, zone)| zone)
            .unwrap_or(Zone::Throat);
        Some(zone)
    }

    pub fn guides(&self) -> impl Iterator<Item = ZoneBoundary> + '_ {
        (0..BOUNDARY_COUNT).map(move |i| ZoneBoundary {
            fraction: self.boundaries[i],
            above: Zone::ALL[i],
            below: Zone::ALL[i + 1],
        })
    }
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            boundaries: DEFAULT_BOUNDARIES,
        }
    }
}

impl TryFrom<[f64; BOUNDARY_COUNT]> for ZoneThresholds {
    type Error = ThresholdError;

    fn try_from(boundaries: [f64; BOUNDARY_COUNT]) -> Result<Self, Self::Error> {
        Self::new(boundaries)
    }
}

impl From<ZoneThresholds> for [f64; BOUNDARY_COUNT] {
    fn from(thresholds: ZoneThresholds) -> Self {
        thresholds.boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::far_above(-0.5, Zone::SubEye)]
    #[case::top_edge(0.0, Zone::SubEye)]
    #[case::just_below_first(0.199_999, Zone::SubEye)]
    #[case::first_boundary(0.2, Zone::Side)]
    #[case::second_boundary(0.4, Zone::Mouth)]
    #[case::third_boundary(0.6, Zone::Chin)]
    #[case::just_below_last(0.899_999, Zone::Chin)]
    #[case::last_boundary(0.9, Zone::Throat)]
    #[case::bottom_edge(1.0, Zone::Throat)]
    #[case::far_below(3.0, Zone::Throat)]
    fn test_default_table_half_open(#[case] relative_y: f64, #[case] expected: Zone) {
        assert_eq!(
            ZoneThresholds::default().zone_for(relative_y),
            Some(expected)
        );
    }

    #[test]
    fn test_infinities_land_in_edge_zones() {
        let t = ZoneThresholds::default();
        assert_eq!(t.zone_for(f64::NEG_INFINITY), Some(Zone::SubEye));
        assert_eq!(t.zone_for(f64::INFINITY), Some(Zone::Throat));
    }

    #[test]
    fn test_nan_has_no_zone() {
        assert_eq!(ZoneThresholds::default().zone_for(f64::NAN), None);
    }

    #[test]
    fn test_custom_boundaries_shift_zones() {
        let t = ZoneThresholds::new([0.1, 0.3, 0.5, 0.7]).unwrap();
        assert_eq!(t.zone_for(0.25), Some(Zone::Side));
        assert_eq!(t.zone_for(0.75), Some(Zone::Throat));
    }

    #[rstest]
    #[case::equal([0.2, 0.2, 0.6, 0.9], 1)]
    #[case::descending([0.2, 0.4, 0.3, 0.9], 2)]
    fn test_rejects_non_ascending(#[case] b: [f64; BOUNDARY_COUNT], #[case] bad_index: usize) {
        match ZoneThresholds::new(b) {
            Err(ThresholdError::NotAscending { index, .. }) => assert_eq!(index, bad_index),
            other => panic!("expected NotAscending, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = ZoneThresholds::new([0.2, f64::NAN, 0.6, 0.9]);
        assert!(matches!(
            result,
            Err(ThresholdError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_guides_name_adjacent_zones() {
        let names: Vec<String> = ZoneThresholds::default()
            .guides()
            .map(|g| g.name())
            .collect();
        assert_eq!(names, ["1|2", "2|3", "3|4", "4|5"]);
    }

    #[test]
    fn test_serde_uses_plain_array() {
        let t: ZoneThresholds = serde_json::from_str("[0.1, 0.3, 0.5, 0.8]").unwrap();
        assert_eq!(t.boundaries(), &[0.1, 0.3, 0.5, 0.8]);
        assert_eq!(
            serde_json::to_string(&ZoneThresholds::default()).unwrap(),
            "[0.2,0.4,0.6,0.9]"
        );
    }

    #[test]
    fn test_serde_rejects_invalid_array() {
        assert!(serde_json::from_str::<ZoneThresholds>("[0.5, 0.4, 0.6, 0.9]").is_err());
    }

    #[test]
    fn test_serde_array_length_matches_boundary_count() {
        let json = serde_json::to_value(ZoneThresholds::default()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(BOUNDARY_COUNT));
        assert!(serde_json::from_str::<ZoneThresholds>("[0.2, 0.4, 0.6]").is_err());
        assert!(serde_json::from_str::<ZoneThresholds>("[0.2, 0.4, 0.6, 0.9, 0.95]").is_err());
    }
}
