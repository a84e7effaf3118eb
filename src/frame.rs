use crate::detection::Observation;

#[derive(Debug, Clone)]
pub struct Frame {
    pub observations: Vec<Observation>,
    pub timestamp: f32, // in seconds
}

impl Frame {
    #[inline]
    pub fn new(timestamp: f32, observations: Vec<Observation>) -> Self {
        Self {
            observations,
            timestamp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
