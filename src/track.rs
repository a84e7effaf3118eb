use serde_derive::{Deserialize, Serialize};

/// Zone membership of a track as last evaluated.
///
/// Stays `Unknown` until the track has crossed the tripwire, membership is
/// not evaluated before that.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Residency {
    #[default]
    Unknown,
    Inside,
    Outside,
}

impl Residency {
    #[inline]
    pub fn from_containment(inside: bool) -> Self {
        if inside {
            Residency::Inside
        } else {
            Residency::Outside
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub track_id: u32,
    // never goes back to false
    pub crossed: bool,
    pub residency: Residency,
    // side value of the latest observation, none before the first one
    pub previous_side: Option<f32>,
    // value the next side is compared against
    pub baseline: Option<f32>,
    pub first_seen: f32,
    pub last_seen: f32,
    pub observations: u32,
}

impl TrackRecord {
    pub fn new(track_id: u32, ts_sec: f32) -> Self {
        Self {
            track_id,
            crossed: false,
            residency: Residency::Unknown,
            previous_side: None,
            baseline: None,
            first_seen: ts_sec,
            last_seen: ts_sec,
            observations: 0,
        }
    }

    #[inline]
    pub fn inside(&self) -> bool {
        self.residency == Residency::Inside
    }

    #[inline]
    pub fn idle_for(&self, ts_sec: f32) -> f32 {
        ts_sec - self.last_seen
    }
}
