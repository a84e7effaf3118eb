use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};

/// One detector/tracker output for a frame.
///
/// Contains (x,y) of the center and (width,height) of bbox, the class id and
/// the tracker-assigned identifier. `id` is absent when the tracker could not
/// associate the box with a track.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "p", default = "full_confidence")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: i32,
    #[serde(default)]
    pub id: Option<u32>,
}

fn full_confidence() -> f32 {
    1.0
}

impl Observation {
    /// Builds an observation from a corner-format box, as emitted by most detectors.
    ///
    /// The center is the exact midpoint, so a box spanning x 633..636 is
    /// centered at 634.5. Use [`Observation::from_pixel_ltrb`] for whole-pixel
    /// centers.
    pub fn from_ltrb(class: i32, id: Option<u32>, bbox: &BBox<Ltrb>) -> Self {
        let xywh = bbox.as_xywh();

        Self {
            x: xywh.cx(),
            y: xywh.cy(),
            w: xywh.width(),
            h: xywh.height(),
            confidence: 1.0,
            class,
            id,
        }
    }

    /// Same as [`Observation::from_ltrb`] with the center snapped down to
    /// whole pixels, which matters for boxes touching the zone edges.
    pub fn from_pixel_ltrb(class: i32, id: Option<u32>, bbox: &BBox<Ltrb>) -> Self {
        let center = bbox.pixel_center();

        Self {
            x: center.x,
            y: center.y,
            ..Self::from_ltrb(class, id, bbox)
        }
    }

    /// The point the tripwire and zone checks are evaluated on.
    #[inline(always)]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_short_keys() {
        let obs: Observation =
            serde_json::from_str(r#"{"x":300,"y":450,"w":40,"h":100,"p":0.8,"c":7,"id":3}"#)
                .unwrap();

        assert_eq!(obs.class, 7);
        assert_eq!(obs.id, Some(3));
        assert_eq!(obs.center(), na::Point2::new(300.0, 450.0));
    }

    #[test]
    fn missing_id_and_confidence_default() {
        let obs: Observation =
            serde_json::from_str(r#"{"x":1,"y":2,"w":3,"h":4,"c":0}"#).unwrap();

        assert_eq!(obs.id, None);
        assert_eq!(obs.confidence, 1.0);
    }

    #[test]
    fn from_ltrb_reduces_to_center() {
        let obs = Observation::from_ltrb(7, Some(1), &BBox::ltrb(680.0, 0.0, 720.0, 100.0));

        assert_eq!(obs.center(), na::Point2::new(700.0, 50.0));
        assert_eq!(obs.w, 40.0);
    }

    #[test]
    fn from_pixel_ltrb_snaps_center() {
        let bbox = BBox::ltrb(633.0, 400.0, 636.0, 501.0);

        assert_eq!(
            Observation::from_pixel_ltrb(7, Some(1), &bbox).center(),
            na::Point2::new(634.0, 450.0)
        );
        assert_eq!(
            Observation::from_ltrb(7, Some(1), &bbox).center(),
            na::Point2::new(634.5, 450.5)
        );
    }
}
