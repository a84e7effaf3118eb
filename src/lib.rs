pub mod bbox;
pub mod config;
pub mod crossing;
pub mod detection;
pub mod dump;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod scene;
pub mod store;
pub mod track;
pub mod zone;

pub use config::Config;
pub use detection::Observation;
pub use frame::Frame;
pub use scene::{FrameReport, Outcome, SkipReason, TrackStatus};
pub use track::Residency;
pub use zone::{Classification, FrameStatus};

use error::Error;
use scene::{Scene, Settings};
use std::collections::HashMap;
use std::rc::Rc;

pub trait Monitoring {
    fn update(&mut self, frame: &Frame, src: &str) -> FrameReport;
    fn status(&self, src: &str) -> FrameStatus;
    fn tracks(&self, src: &str) -> Rc<[TrackStatus]>;
}

/// Tripwire-gated zone monitor over any number of named video sources.
///
/// Every source gets its own track state, created on its first frame, while
/// the tripwire, the zone and the class filter are shared.
pub struct LaneBarrier {
    settings: Settings,
    scenes: HashMap<String, Scene>,
}

impl LaneBarrier {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            settings: Settings::try_from(config)?,
            scenes: HashMap::new(),
        })
    }

    /// Drops the state of a source, e.g. when its stream restarts.
    pub fn reset(&mut self, src: &str) -> bool {
        self.scenes.remove(src).is_some()
    }
}

impl crate::Monitoring for LaneBarrier {
    fn update(&mut self, frame: &Frame, src: &str) -> FrameReport {
        let settings = self.settings;
        let scene = self
            .scenes
            .entry(src.to_string())
            .or_insert_with(|| Scene::new(settings));

        scene.update(frame)
    }

    #[inline]
    fn status(&self, src: &str) -> FrameStatus {
        self.scenes
            .get(src)
            .map(Scene::status)
            .unwrap_or_default()
    }

    #[inline]
    fn tracks(&self, src: &str) -> Rc<[TrackStatus]> {
        if let Some(scene) = self.scenes.get(src) {
            return scene.tracks().into_boxed_slice().into();
        }

        Rc::new([])
    }
}
