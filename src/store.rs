use std::collections::HashMap;

use crate::track::{Residency, TrackRecord};

/// Fields to overwrite on a stored record. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackUpdate {
    pub previous_side: Option<f32>,
    pub baseline: Option<f32>,
    pub crossed: Option<bool>,
    pub residency: Option<Residency>,
    pub seen_at: Option<f32>,
}

/// Per-track memory, keyed by the tracker-assigned identifier.
#[derive(Debug, Default)]
pub struct TrackStore {
    records: HashMap<u32, TrackRecord>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Returns the record for `track_id`, creating a fresh one on first sight.
    /// The flag tells whether the record was just created.
    pub fn get_or_create(&mut self, track_id: u32, ts_sec: f32) -> (&TrackRecord, bool) {
        let mut created = false;
        let record = self.records.entry(track_id).or_insert_with(|| {
            created = true;
            TrackRecord::new(track_id, ts_sec)
        });

        (record, created)
    }

    /// Applies `upd` to an existing record. Returns `false` for unknown ids.
    ///
    /// `crossed` is only ever raised: an update carrying `Some(false)` does
    /// not clear a flag that is already set.
    pub fn update(&mut self, track_id: u32, upd: TrackUpdate) -> bool {
        let record = match self.records.get_mut(&track_id) {
            Some(record) => record,
            None => return false,
        };

        if let Some(side) = upd.previous_side {
            record.previous_side = Some(side);
        }

        if let Some(baseline) = upd.baseline {
            record.baseline = Some(baseline);
        }

        if let Some(crossed) = upd.crossed {
            record.crossed |= crossed;
        }

        if let Some(residency) = upd.residency {
            record.residency = residency;
        }

        if let Some(ts) = upd.seen_at {
            record.last_seen = ts;
            record.observations += 1;
        }

        true
    }

    #[inline]
    pub fn get(&self, track_id: u32) -> Option<&TrackRecord> {
        self.records.get(&track_id)
    }

    #[inline]
    pub fn remove(&mut self, track_id: u32) -> Option<TrackRecord> {
        self.records.remove(&track_id)
    }

    #[inline]
    pub fn retain<P: FnMut(&TrackRecord) -> bool>(&mut self, mut pred: P) {
        self.records.retain(|_, r| pred(r))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.values()
    }
}
