use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use crate::crossing::ZeroSidePolicy;
use crate::error::Error;
use crate::geometry::{Tripwire, Zone};

pub const NAMES: [&str; 8] = [
    "person",
    "bicycle",
    "car",
    "motorbike",
    "aeroplane",
    "bus",
    "train",
    "truck",
];

/// Static monitor settings, fixed for the lifetime of a `LaneBarrier`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// `[start, end]` of the tripwire, each `[x, y]`
    pub tripwire: [[f32; 2]; 2],
    /// `[top_left, bottom_right]` of the zone, each `[x, y]`
    pub zone: [[f32; 2]; 2],
    pub target_class: String,
    /// label table of the detector, index is the class id
    pub class_names: Vec<String>,
    pub zero_side_policy: ZeroSidePolicy,
    /// Drop tracks not observed for this many seconds. Never dropped when unset.
    pub max_idle_seconds: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tripwire: [[117.0, 328.0], [26.0, 475.0]],
            zone: [[190.0, 4.0], [634.0, 473.0]],
            target_class: String::from("truck"),
            class_names: NAMES.iter().map(|s| s.to_string()).collect(),
            zero_side_policy: ZeroSidePolicy::Reset,
            max_idle_seconds: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;

        Self::from_json(&contents)
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let wire = self.tripwire();
        if wire.is_degenerate() {
            return Err(Error::DegenerateTripwire(wire.start.x, wire.start.y));
        }

        let zone = self.zone();
        if !zone.is_valid() {
            return Err(Error::InvalidZone(
                zone.left(),
                zone.top(),
                zone.right(),
                zone.bottom(),
            ));
        }

        self.target_class_id()?;

        Ok(())
    }

    #[inline]
    pub fn tripwire(&self) -> Tripwire<f32> {
        let [a, b] = self.tripwire;

        Tripwire::new(na::Point2::new(a[0], a[1]), na::Point2::new(b[0], b[1]))
    }

    #[inline]
    pub fn zone(&self) -> Zone<f32> {
        let [tl, br] = self.zone;

        Zone::new(na::Point2::new(tl[0], tl[1]), na::Point2::new(br[0], br[1]))
    }

    pub fn target_class_id(&self) -> Result<i32, Error> {
        self.class_names
            .iter()
            .position(|name| *name == self.target_class)
            .map(|idx| idx as i32)
            .ok_or_else(|| Error::UnknownClass(self.target_class.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_targets_trucks() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.target_class_id().unwrap(), 7);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = Config::from_json(r#"{"target_class": "bus"}"#).unwrap();

        assert_eq!(config.target_class_id().unwrap(), 5);
        assert_eq!(config.zone, Config::default().zone);
        assert_eq!(config.zero_side_policy, ZeroSidePolicy::Reset);
    }

    #[test]
    fn parses_policy_and_idle_timeout() {
        let config = Config::from_json(
            r#"{"zero_side_policy": "hold_last_nonzero", "max_idle_seconds": 2.5}"#,
        )
        .unwrap();

        assert_eq!(config.zero_side_policy, ZeroSidePolicy::HoldLastNonzero);
        assert_eq!(config.max_idle_seconds, Some(2.5));
    }

    #[test]
    fn rejects_degenerate_tripwire() {
        let res = Config::from_json(r#"{"tripwire": [[5, 5], [5, 5]]}"#);

        assert!(matches!(res, Err(Error::DegenerateTripwire(..))));
    }

    #[test]
    fn rejects_inverted_zone() {
        let res = Config::from_json(r#"{"zone": [[634, 4], [190, 473]]}"#);

        assert!(matches!(res, Err(Error::InvalidZone(..))));
    }

    #[test]
    fn rejects_unknown_class() {
        let res = Config::from_json(r#"{"target_class": "tanker"}"#);

        assert!(matches!(res, Err(Error::UnknownClass(name)) if name == "tanker"));
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(Config::from_json("{"), Err(Error::JsonError(_))));
    }
}
