use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::ops::BitOr;

use crate::geometry::Zone;
use crate::track::Residency;

/// Per-track verdict handed to renderers (red box / green box).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Flagged,
    Clear,
}

/// Frame-level status: active while any crossed track sits in the zone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    #[default]
    Idle,
    Active,
}

impl FrameStatus {
    #[inline]
    pub fn as_u8(&self) -> u8 {
        match self {
            FrameStatus::Idle => 0,
            FrameStatus::Active => 1,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        *self == FrameStatus::Active
    }

    pub fn aggregate<I: IntoIterator<Item = Classification>>(items: I) -> Self {
        items
            .into_iter()
            .map(FrameStatus::from)
            .fold(FrameStatus::Idle, BitOr::bitor)
    }
}

impl From<Classification> for FrameStatus {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Flagged => FrameStatus::Active,
            Classification::Clear => FrameStatus::Idle,
        }
    }
}

impl BitOr for FrameStatus {
    type Output = FrameStatus;

    fn bitor(self, rhs: Self) -> Self::Output {
        if self.is_active() || rhs.is_active() {
            FrameStatus::Active
        } else {
            FrameStatus::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub classification: Classification,
    /// New residency to store, none while the track has not crossed.
    pub residency: Option<Residency>,
}

#[derive(Debug, Clone, Copy)]
pub struct ZoneEvaluator {
    zone: Zone<f32>,
}

impl ZoneEvaluator {
    pub fn new(zone: Zone<f32>) -> Self {
        Self { zone }
    }

    pub fn evaluate(&self, crossed: bool, center: &na::Point2<f32>) -> Evaluation {
        if !crossed {
            return Evaluation {
                classification: Classification::Clear,
                residency: None,
            };
        }

        let inside = self.zone.contains(center);

        Evaluation {
            classification: if inside {
                Classification::Flagged
            } else {
                Classification::Clear
            },
            residency: Some(Residency::from_containment(inside)),
        }
    }
}
