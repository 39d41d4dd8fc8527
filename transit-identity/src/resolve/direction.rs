//! Direction assignment for routes with unreliable raw direction data.
//!
//! Each split route declares, per direction, an ordered list of anchor
//! stops. A trip belongs to the direction whose anchors it visits in order.
//! Stops are then ordered by "earliness": anchors by their anchor index,
//! every other stop by where it sits relative to the anchors.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::{DirectionId, Headsign, RawTrip, ResolveError, RouteId};
use crate::rules::{DirectionAnchors, RuleTables};

/// Sort key of a stop within one direction.
///
/// The first component is the segment: `2i + 1` for the anchor with index
/// `i`, `2i` for the stops between anchor `i - 1` and anchor `i`, and
/// `2n` for stops after the last anchor. The second orders stops within
/// a segment.
type Earliness = (usize, usize);

/// The direction a trip was assigned to, with its stops in direction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionAssignment {
    pub direction: DirectionId,
    pub headsign: Headsign,
    /// Raw stop ids.
    pub ordered_stops: Vec<String>,
}

/// Assigns trips of split routes to directions and orders their stops.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::{DirectionId, RawTrip, RouteId};
/// use transit_identity::resolve::TripDirectionSplitter;
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// let splitter = TripDirectionSplitter::new(&rules);
///
/// let trip = RawTrip::new("t1", "190", None, "", &["AF930", "X", "RB481", "RB070"]);
/// let assignment = splitter.assign(RouteId::new(190), &trip).unwrap().unwrap();
/// assert_eq!(assignment.direction, DirectionId::Zero);
/// assert_eq!(assignment.headsign.as_str(), "Mooney's Bay");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TripDirectionSplitter<'a> {
    rules: &'a RuleTables,
}

impl<'a> TripDirectionSplitter<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// Whether `route` has an anchor spec.
    pub fn is_split(&self, route: RouteId) -> bool {
        self.rules.anchor_spec(route).is_some()
    }

    /// Assign a trip to a direction.
    ///
    /// Returns `Ok(None)` for routes without an anchor spec. A trip on a
    /// split route must match exactly one direction's anchors.
    pub fn assign(
        &self,
        route: RouteId,
        trip: &RawTrip,
    ) -> Result<Option<DirectionAssignment>, ResolveError> {
        let Some(spec) = self.rules.anchor_spec(route) else {
            return Ok(None);
        };

        let matched: Vec<DirectionId> = DirectionId::ALL
            .into_iter()
            .filter(|&d| visits_in_order(spec.direction(d).anchors(), &trip.stops))
            .collect();

        let &[direction] = &matched[..] else {
            return Err(ResolveError::UnassignableTrip {
                route,
                trip_id: trip.trip_id.clone(),
                matched: matched.len(),
            });
        };

        let anchors = spec.direction(direction);
        let keys = earliness(anchors, &trip.stops);
        let mut order: Vec<usize> = (0..trip.stops.len()).collect();
        order.sort_by_key(|&i| keys[i]);

        debug!(%route, trip_id = %trip.trip_id, %direction, "Assigned trip direction");
        Ok(Some(DirectionAssignment {
            direction,
            headsign: anchors.headsign().clone(),
            ordered_stops: order.into_iter().map(|i| trip.stops[i].clone()).collect(),
        }))
    }

    /// Compare the stops at positions `a` and `b` of `stops` by earliness.
    ///
    /// Routes without an anchor spec keep feed order. Returns `None` if
    /// either position is outside `stops`.
    pub fn compare_early(
        &self,
        route: RouteId,
        direction: DirectionId,
        stops: &[String],
        a: usize,
        b: usize,
    ) -> Option<Ordering> {
        if a >= stops.len() || b >= stops.len() {
            return None;
        }
        match self.rules.anchor_spec(route) {
            Some(spec) => {
                let keys = earliness(spec.direction(direction), stops);
                Some(keys[a].cmp(&keys[b]))
            }
            None => Some(a.cmp(&b)),
        }
    }

    /// One stop order for a whole direction, merged from its trips.
    ///
    /// Each stop appears once. Stops between the same pair of anchors keep
    /// the order in which they were first seen. Routes without an anchor
    /// spec concatenate unseen stops in trip order.
    pub fn direction_stop_order<S: AsRef<[String]>>(
        &self,
        route: RouteId,
        direction: DirectionId,
        trips: &[S],
    ) -> Vec<String> {
        let anchors = self
            .rules
            .anchor_spec(route)
            .map(|spec| spec.direction(direction));

        let mut keys: HashMap<&str, Earliness> = HashMap::new();
        let mut seen: Vec<&str> = Vec::new();

        for trip in trips {
            let stops = trip.as_ref();
            let trip_keys = match anchors {
                Some(anchors) => earliness(anchors, stops),
                None => vec![(0, 0); stops.len()],
            };
            for (stop, (segment, _)) in stops.iter().zip(trip_keys) {
                if keys.contains_key(stop.as_str()) {
                    continue;
                }
                keys.insert(stop.as_str(), (segment, seen.len()));
                seen.push(stop.as_str());
            }
        }

        seen.sort_by_key(|stop| keys[stop]);
        trace!(%route, %direction, stops = seen.len(), "Merged direction stop order");
        seen.into_iter().map(str::to_string).collect()
    }
}

/// Whether `anchors` appear in `stops` in the same relative order.
fn visits_in_order(anchors: &[String], stops: &[String]) -> bool {
    let mut remaining = stops.iter();
    anchors
        .iter()
        .all(|anchor| remaining.any(|stop| stop == anchor))
}

fn earliness(anchors: &DirectionAnchors, stops: &[String]) -> Vec<Earliness> {
    let mut segment = 0;
    stops
        .iter()
        .enumerate()
        .map(|(position, stop)| match anchors.rank(stop) {
            Some(rank) => {
                segment = 2 * (rank + 1);
                (2 * rank + 1, 0)
            }
            None => (segment, position),
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::rules::FeedRevision;
    use proptest::prelude::*;

    /// A trip in direction 0 of route 190: its anchors, in order, with
    /// arbitrary non-anchor stops inserted around them.
    fn direction_zero_trip() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::collection::vec("[a-z]{1,3}", 0..3), 4).prop_map(|fillers| {
            let anchors = ["AF930", "RB481", "RB070"];
            let mut stops = Vec::new();
            for (i, filler) in fillers.into_iter().enumerate() {
                stops.extend(filler);
                if let Some(anchor) = anchors.get(i) {
                    stops.push(anchor.to_string());
                }
            }
            stops
        })
    }

    proptest! {
        #[test]
        fn superset_of_anchors_is_always_assigned(stops in direction_zero_trip()) {
            let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
            let splitter = TripDirectionSplitter::new(&rules);
            let trip = RawTrip {
                trip_id: "p".to_string(),
                route: "190".to_string(),
                direction_id: None,
                headsign: String::new(),
                stops: stops.clone(),
            };

            let assignment = splitter.assign(RouteId::new(190), &trip).unwrap().unwrap();
            prop_assert_eq!(assignment.direction, DirectionId::Zero);
            // In-order trips keep their order
            prop_assert_eq!(assignment.ordered_stops, stops);
        }
    }
}
