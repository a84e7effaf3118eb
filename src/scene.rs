use serde_derive::Serialize;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::crossing::{CrossingDetector, ZeroSidePolicy};
use crate::detection::Observation;
use crate::error::Error;
use crate::frame::Frame;
use crate::geometry::{Tripwire, Zone};
use crate::store::{TrackStore, TrackUpdate};
use crate::track::{Residency, TrackRecord};
use crate::zone::{Classification, FrameStatus, ZoneEvaluator};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingTrackId,
    ClassFiltered,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TrackStatus {
    pub track_id: u32,
    pub crossed: bool,
    /// the crossing happened on this observation
    pub crossed_now: bool,
    pub residency: Residency,
    pub classification: Classification,
    pub side: Option<f32>,
}

impl TrackStatus {
    #[inline]
    pub fn inside(&self) -> bool {
        self.residency == Residency::Inside
    }

    #[inline]
    pub fn is_flagged(&self) -> bool {
        self.classification == Classification::Flagged
    }
}

impl From<&TrackRecord> for TrackStatus {
    fn from(r: &TrackRecord) -> TrackStatus {
        TrackStatus {
            track_id: r.track_id,
            crossed: r.crossed,
            crossed_now: false,
            residency: r.residency,
            classification: if r.crossed && r.inside() {
                Classification::Flagged
            } else {
                Classification::Clear
            },
            side: r.previous_side,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Applied(TrackStatus),
    Skipped(SkipReason),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub timestamp: f32,
    pub tracks: Vec<TrackStatus>,
    /// index into the frame's observations and why it was ignored
    pub skipped: Vec<(usize, SkipReason)>,
    pub status: FrameStatus,
    /// status differs from the previous frame of the same scene
    pub changed: bool,
}

/// Validated geometry and filters shared by every scene of a monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub tripwire: Tripwire<f32>,
    pub zone: Zone<f32>,
    pub target_class: i32,
    pub zero_side_policy: ZeroSidePolicy,
    pub max_idle_seconds: Option<f32>,
}

impl TryFrom<&Config> for Settings {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        config.validate()?;

        Ok(Self {
            tripwire: config.tripwire(),
            zone: config.zone(),
            target_class: config.target_class_id()?,
            zero_side_policy: config.zero_side_policy,
            max_idle_seconds: config.max_idle_seconds,
        })
    }
}

/// Tripwire and zone state of a single video source.
pub struct Scene {
    tripwire: Tripwire<f32>,
    target_class: i32,
    max_idle_seconds: Option<f32>,
    detector: CrossingDetector,
    evaluator: ZoneEvaluator,
    store: TrackStore,
    status: FrameStatus,
}

impl Scene {
    pub fn new(settings: Settings) -> Self {
        Self {
            tripwire: settings.tripwire,
            target_class: settings.target_class,
            max_idle_seconds: settings.max_idle_seconds,
            detector: CrossingDetector::new(settings.zero_side_policy),
            evaluator: ZoneEvaluator::new(settings.zone),
            store: TrackStore::new(),
            status: FrameStatus::Idle,
        }
    }

    /// Runs one observation through the class filter, the crossing detector
    /// and the zone evaluator, and stores the outcome.
    pub fn observe(&mut self, ts_sec: f32, obs: &Observation) -> Outcome {
        if obs.class != self.target_class {
            return Outcome::Skipped(SkipReason::ClassFiltered);
        }

        let track_id = match obs.id {
            Some(id) => id,
            None => {
                debug!(class = obs.class, x = obs.x, y = obs.y, "observation without track id");
                return Outcome::Skipped(SkipReason::MissingTrackId);
            }
        };

        let center = obs.center();
        let side = self.tripwire.side(&center);

        let (record, created) = self.store.get_or_create(track_id, ts_sec);
        if created {
            debug!(track_id, side, "new track");
        }

        let crossing = self.detector.evaluate(record, side);
        let crossed = record.crossed || crossing.crossed_now;
        let eval = self.evaluator.evaluate(crossed, &center);

        self.store.update(
            track_id,
            TrackUpdate {
                previous_side: Some(side),
                baseline: crossing.baseline,
                crossed: Some(crossing.crossed_now),
                residency: eval.residency,
                seen_at: Some(ts_sec),
            },
        );

        if crossing.crossed_now {
            info!(track_id, side, x = center.x, y = center.y, "tripwire crossed");
        }

        let status = TrackStatus {
            track_id,
            crossed,
            crossed_now: crossing.crossed_now,
            residency: eval.residency.unwrap_or_default(),
            classification: eval.classification,
            side: Some(side),
        };

        trace!(?status, "observation applied");

        Outcome::Applied(status)
    }

    pub fn update(&mut self, frame: &Frame) -> FrameReport {
        let mut tracks = Vec::with_capacity(frame.len());
        let mut skipped = Vec::new();

        for (idx, obs) in frame.iter().enumerate() {
            match self.observe(frame.timestamp, obs) {
                Outcome::Applied(status) => tracks.push(status),
                Outcome::Skipped(reason) => skipped.push((idx, reason)),
            }
        }

        let status = FrameStatus::aggregate(tracks.iter().map(|t| t.classification));
        let changed = status != self.status;

        if changed {
            info!(
                ts = frame.timestamp,
                status = status.as_u8(),
                "lane barrier status changed"
            );
        }

        self.status = status;
        self.prune_stale(frame.timestamp);

        FrameReport {
            timestamp: frame.timestamp,
            tracks,
            skipped,
            status,
            changed,
        }
    }

    /// Drops tracks idle for longer than the configured timeout.
    pub fn prune_stale(&mut self, ts_sec: f32) -> usize {
        let max_idle = match self.max_idle_seconds {
            Some(max_idle) => max_idle,
            None => return 0,
        };

        let before = self.store.len();
        self.store.retain(|r| r.idle_for(ts_sec) <= max_idle);
        let removed = before - self.store.len();

        if removed > 0 {
            debug!(removed, ts = ts_sec, "pruned stale tracks");
        }

        removed
    }

    #[inline]
    pub fn forget(&mut self, track_id: u32) -> bool {
        self.store.remove(track_id).is_some()
    }

    #[inline]
    pub fn status(&self) -> FrameStatus {
        self.status
    }

    #[inline]
    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn tracks(&self) -> Vec<TrackStatus> {
        let mut tracks: Vec<TrackStatus> = self.store.iter().map(Into::into).collect();
        tracks.sort_by_key(|t| t.track_id);

        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUCK: i32 = 7;

    fn scene() -> Scene {
        Scene::new(Settings::try_from(&Config::default()).unwrap())
    }

    fn obs(id: Option<u32>, x: f32, y: f32) -> Observation {
        Observation {
            x,
            y,
            w: 40.0,
            h: 40.0,
            confidence: 0.9,
            class: TRUCK,
            id,
        }
    }

    fn applied(outcome: Outcome) -> TrackStatus {
        match outcome {
            Outcome::Applied(status) => status,
            Outcome::Skipped(reason) => panic!("skipped: {:?}", reason),
        }
    }

    #[test]
    fn first_observation_only_seeds_side() {
        let mut scene = scene();
        let status = applied(scene.observe(0.0, &obs(Some(1), 300.0, 450.0)));

        assert!(!status.crossed);
        assert_eq!(status.residency, Residency::Unknown);
        assert_eq!(status.classification, Classification::Clear);
        assert_eq!(scene.store().get(1).unwrap().previous_side, Some(-38003.0));
    }

    #[test]
    fn crossing_into_zone_flags_track() {
        let mut scene = scene();
        scene.observe(0.0, &obs(Some(1), 100.0, 300.0));
        let status = applied(scene.observe(0.04, &obs(Some(1), 300.0, 450.0)));

        assert!(status.crossed);
        assert!(status.crossed_now);
        assert!(status.inside());
        assert!(status.is_flagged());
    }

    #[test]
    fn crossing_event_fires_once() {
        let mut scene = scene();
        scene.observe(0.0, &obs(Some(1), 100.0, 300.0));
        scene.observe(0.04, &obs(Some(1), 300.0, 450.0));
        let back = applied(scene.observe(0.08, &obs(Some(1), 100.0, 300.0)));

        assert!(back.crossed);
        assert!(!back.crossed_now);
        assert_eq!(back.residency, Residency::Outside);
    }

    #[test]
    fn previous_side_tracks_every_observation() {
        let mut scene = scene();
        scene.observe(0.0, &obs(Some(1), 100.0, 300.0));
        scene.observe(0.04, &obs(Some(1), 300.0, 450.0));
        scene.observe(0.08, &obs(Some(1), 300.0, 50.0));

        let record = scene.store().get(1).unwrap();
        assert_eq!(record.previous_side, Some(-1603.0));
        assert_eq!(record.observations, 3);
        assert_eq!(record.last_seen, 0.08);
    }

    #[test]
    fn skips_without_touching_state() {
        let mut scene = scene();

        assert_eq!(
            scene.observe(0.0, &obs(None, 300.0, 450.0)),
            Outcome::Skipped(SkipReason::MissingTrackId)
        );

        let mut car = obs(Some(2), 300.0, 450.0);
        car.class = 2;
        assert_eq!(
            scene.observe(0.0, &car),
            Outcome::Skipped(SkipReason::ClassFiltered)
        );

        assert!(scene.store().is_empty());
    }

    #[test]
    fn class_filter_applies_before_id_check() {
        let mut scene = scene();
        let mut anon_car = obs(None, 300.0, 450.0);
        anon_car.class = 2;

        assert_eq!(
            scene.observe(0.0, &anon_car),
            Outcome::Skipped(SkipReason::ClassFiltered)
        );
    }

    #[test]
    fn frame_report_collects_skips_and_status() {
        let mut scene = scene();
        scene.update(&Frame::new(0.0, vec![obs(Some(1), 100.0, 300.0)]));

        let report = scene.update(&Frame::new(
            0.04,
            vec![
                obs(None, 10.0, 10.0),
                obs(Some(1), 300.0, 450.0),
                obs(Some(2), 300.0, 450.0),
            ],
        ));

        assert_eq!(report.skipped, vec![(0, SkipReason::MissingTrackId)]);
        assert_eq!(report.tracks.len(), 2);
        assert_eq!(report.status, FrameStatus::Active);
        assert!(report.changed);
        assert_eq!(scene.status(), FrameStatus::Active);
    }

    #[test]
    fn aggregate_is_not_last_writer() {
        let mut scene = scene();
        scene.update(&Frame::new(0.0, vec![obs(Some(1), 100.0, 300.0)]));

        // flagged track first, unflagged one after it
        let report = scene.update(&Frame::new(
            0.04,
            vec![obs(Some(1), 300.0, 450.0), obs(Some(2), 700.0, 50.0)],
        ));

        assert_eq!(report.status, FrameStatus::Active);
    }

    #[test]
    fn empty_frame_is_idle() {
        let mut scene = scene();
        let report = scene.update(&Frame::new(0.0, Vec::new()));

        assert_eq!(report.status, FrameStatus::Idle);
        assert!(!report.changed);
    }

    #[test]
    fn stale_tracks_are_pruned_when_configured() {
        let config = Config {
            max_idle_seconds: Some(1.0),
            ..Config::default()
        };
        let mut scene = Scene::new(Settings::try_from(&config).unwrap());

        scene.update(&Frame::new(0.0, vec![obs(Some(1), 100.0, 300.0)]));
        scene.update(&Frame::new(0.5, vec![obs(Some(2), 100.0, 300.0)]));
        assert_eq!(scene.store().len(), 2);

        scene.update(&Frame::new(1.2, Vec::new()));
        assert!(scene.store().get(1).is_none());
        assert!(scene.store().get(2).is_some());
    }

    #[test]
    fn tracks_are_kept_without_timeout() {
        let mut scene = scene();

        scene.update(&Frame::new(0.0, vec![obs(Some(1), 100.0, 300.0)]));
        scene.update(&Frame::new(1000.0, Vec::new()));

        assert_eq!(scene.prune_stale(1000.0), 0);
        assert_eq!(scene.store().len(), 1);
    }

    #[test]
    fn forgotten_track_starts_over() {
        let mut scene = scene();
        scene.observe(0.0, &obs(Some(1), 100.0, 300.0));
        scene.observe(0.04, &obs(Some(1), 300.0, 450.0));

        assert!(scene.forget(1));

        let status = applied(scene.observe(0.08, &obs(Some(1), 300.0, 450.0)));
        assert!(!status.crossed);
    }

    #[test]
    fn snapshot_matches_last_evaluation() {
        let mut scene = scene();
        scene.observe(0.0, &obs(Some(3), 100.0, 300.0));
        scene.observe(0.0, &obs(Some(1), 100.0, 300.0));
        scene.observe(0.04, &obs(Some(1), 300.0, 450.0));

        let tracks = scene.tracks();
        assert_eq!(tracks.iter().map(|t| t.track_id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(tracks[0].is_flagged());
        assert_eq!(tracks[1].residency, Residency::Unknown);
    }
}
