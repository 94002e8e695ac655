use rustc_hash::FxHashMap;

use crate::geo::Point;

/// A single GPS fix with arbitrary input-side metadata.
///
/// Observations are read-only to the matcher: match results are reported
/// through [`MatchResult`](crate::transition::MatchResult) rather than by
/// mutating tags.
#[derive(Clone, Debug, Default)]
pub struct Observation {
    pub point: Point,
    pub tags: FxHashMap<String, String>,
}

impl Observation {
    pub fn new(point: Point) -> Observation {
        Observation {
            point,
            tags: FxHashMap::default(),
        }
    }
}

/// An ordered sequence of observations.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    pub observations: Vec<Observation>,
}

impl Trace {
    pub fn new(observations: Vec<Observation>) -> Trace {
        Trace { observations }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Trace {
        Trace {
            observations: points.into_iter().map(Observation::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
