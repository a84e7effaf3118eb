use serde_derive::{Deserialize, Serialize};

use crate::track::TrackRecord;

/// What a side value of exactly zero (point on the line) does to the
/// comparison baseline of the next observation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroSidePolicy {
    /// Zero becomes the new baseline, so the following frame cannot report a
    /// crossing against it.
    #[default]
    Reset,
    /// Zero is skipped and the next value is compared with the last nonzero one.
    HoldLastNonzero,
}

/// Crossing decision for one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub crossed_now: bool,
    pub baseline: Option<f32>,
}

/// Sign change test between two consecutive side values of one track.
///
/// Only a strictly negative product counts, a zero on either side never does.
/// There is no prior value on first sight, and no crossing either.
#[inline]
pub fn detect(previous_side: Option<f32>, current_side: f32, already_crossed: bool) -> bool {
    match previous_side {
        None => false,
        Some(prev) => !already_crossed && current_side * prev < 0.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrossingDetector {
    policy: ZeroSidePolicy,
}

impl CrossingDetector {
    pub fn new(policy: ZeroSidePolicy) -> Self {
        Self { policy }
    }

    pub fn evaluate(&self, record: &TrackRecord, side: f32) -> Crossing {
        let crossed_now = detect(record.baseline, side, record.crossed);

        let baseline = match self.policy {
            ZeroSidePolicy::Reset => Some(side),
            ZeroSidePolicy::HoldLastNonzero if side == 0.0 => record.baseline,
            ZeroSidePolicy::HoldLastNonzero => Some(side),
        };

        Crossing {
            crossed_now,
            baseline,
        }
    }
}
