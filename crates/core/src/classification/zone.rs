use std::fmt;

use serde::Serialize;

/// Hand position relative to the face, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum Zone {
    SubEye = 1,
    Side = 2,
    Mouth = 3,
    Chin = 4,
    Throat = 5,
}

impl Zone {
    /// All zones in ascending vertical order.
    pub const ALL: [Zone; 5] = [
        Zone::SubEye,
        Zone::Side,
        Zone::Mouth,
        Zone::Chin,
        Zone::Throat,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Zone> {
        Zone::ALL.into_iter().find(|z| z.number() == n)
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::SubEye => "sub-eye",
            Zone::Side => "side",
            Zone::Mouth => "mouth",
            Zone::Chin => "chin",
            Zone::Throat => "throat",
        }
    }
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> u8 {
        zone.number()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Zone::SubEye, 1, "sub-eye")]
    #[case(Zone::Side, 2, "side")]
    #[case(Zone::Mouth, 3, "mouth")]
    #[case(Zone::Chin, 4, "chin")]
    #[case(Zone::Throat, 5, "throat")]
    fn test_numbering_and_labels(#[case] zone: Zone, #[case] n: u8, #[case] label: &str) {
        assert_eq!(zone.number(), n);
        assert_eq!(zone.label(), label);
        assert_eq!(Zone::from_number(n), Some(zone));
        assert_eq!(zone.to_string(), n.to_string());
    }

    #[test]
    fn test_from_number_out_of_range() {
        assert_eq!(Zone::from_number(0), None);
        assert_eq!(Zone::from_number(6), None);
    }

    #[test]
    fn test_all_is_ascending() {
        assert!(Zone::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Zone::Chin).unwrap(), "4");
    }
}
