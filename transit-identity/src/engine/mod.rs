//! The batch driver: runs one feed through every resolver.
//!
//! Stops are resolved first because split-route trips report their stops
//! as canonical ids. Routes come next, then trips. The first error aborts
//! the run; there is no partial output.

mod config;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    DirectionId, Headsign, HexColor, IdentifierKind, RawRoute, RawStop, RawTrip, ResolveError,
    RouteId, StopId,
};
use crate::resolve::{
    HeadsignMergeResolver, RouteClassification, RouteMetadataResolver, StopIdResolver, Strictness,
    TripDirectionSplitter,
};
use crate::rules::RuleTables;

pub use config::{ConfigError, EngineConfig, LENIENT_VAR, REVISION_VAR, RULES_VAR};

/// The raw records of one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedBatch {
    pub routes: Vec<RawRoute>,
    pub stops: Vec<RawStop>,
    pub trips: Vec<RawTrip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStop {
    pub raw_id: String,
    pub stop_id: StopId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub short_code: String,
    #[serde(flatten)]
    pub classification: RouteClassification,
}

/// The label every trip of one route direction carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionHeadsign {
    pub route_id: RouteId,
    pub direction: DirectionId,
    pub headsign: Headsign,
}

/// Merged stop order of one direction of a split route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionStops {
    pub route_id: RouteId,
    pub direction: DirectionId,
    pub stops: Vec<StopId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTrip {
    pub trip_id: String,
    pub route_id: RouteId,
    pub direction: DirectionId,
    pub headsign: Headsign,
    /// Stops in direction order. Only set for split routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_stops: Option<Vec<StopId>>,
}

/// Everything the pipeline persists for one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFeed {
    pub revision: String,
    /// Color for routes whose own color is unset.
    pub agency_color: Option<HexColor>,
    pub stops: Vec<ResolvedStop>,
    pub routes: Vec<ResolvedRoute>,
    pub headsigns: Vec<DirectionHeadsign>,
    pub trips: Vec<ResolvedTrip>,
    pub direction_stops: Vec<DirectionStops>,
}

impl ResolvedFeed {
    pub fn stop_id(&self, raw_id: &str) -> Option<StopId> {
        self.stops
            .iter()
            .find(|s| s.raw_id == raw_id)
            .map(|s| s.stop_id)
    }

    pub fn headsign(&self, route: RouteId, direction: DirectionId) -> Option<&Headsign> {
        self.headsigns
            .iter()
            .find(|h| h.route_id == route && h.direction == direction)
            .map(|h| &h.headsign)
    }

    pub fn trip(&self, trip_id: &str) -> Option<&ResolvedTrip> {
        self.trips.iter().find(|t| t.trip_id == trip_id)
    }
}

/// Runs feed batches through the resolvers for one set of rule tables.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::{RawRoute, RawStop, RawTrip};
/// use transit_identity::engine::{FeedBatch, IdentityEngine};
/// use transit_identity::resolve::Strictness;
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// let engine = IdentityEngine::new(&rules, Strictness::Strict);
///
/// let batch = FeedBatch {
///     routes: vec![RawRoute::new("14")],
///     stops: vec![RawStop::new("EE1234", None, "Somewhere")],
///     trips: vec![
///         RawTrip::new("a", "14", Some(0), "Tunney's Pasture", &["EE1234"]),
///         RawTrip::new("b", "14", Some(0), "Carlington", &["EE1234"]),
///     ],
/// };
/// let feed = engine.run(&batch).unwrap();
/// assert_eq!(feed.stop_id("EE1234").unwrap().get(), 101_234);
/// assert_eq!(feed.trip("a").unwrap().headsign.as_str(), "Carlington");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IdentityEngine<'a> {
    rules: &'a RuleTables,
    stops: StopIdResolver<'a>,
    routes: RouteMetadataResolver<'a>,
    headsigns: HeadsignMergeResolver<'a>,
    splitter: TripDirectionSplitter<'a>,
}

/// Per-trip result before direction headsigns are final.
struct TripDraft {
    trip_id: String,
    route_id: RouteId,
    direction: DirectionId,
    ordered_stops: Option<Vec<StopId>>,
}

impl<'a> IdentityEngine<'a> {
    pub fn new(rules: &'a RuleTables, strictness: Strictness) -> Self {
        Self {
            rules,
            stops: StopIdResolver::new(rules),
            routes: RouteMetadataResolver::new(rules, strictness),
            headsigns: HeadsignMergeResolver::new(rules),
            splitter: TripDirectionSplitter::new(rules),
        }
    }

    /// Resolve a whole batch, stopping at the first error.
    pub fn run(&self, batch: &FeedBatch) -> Result<ResolvedFeed, ResolveError> {
        let stops = self.resolve_stops(&batch.stops)?;
        let stop_ids: HashMap<&str, StopId> = stops
            .iter()
            .map(|s| (s.raw_id.as_str(), s.stop_id))
            .collect();

        let routes = batch
            .routes
            .iter()
            .map(|route| {
                Ok(ResolvedRoute {
                    short_code: route.short_code.clone(),
                    classification: self.routes.classify(route)?,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let mut groups: BTreeMap<(RouteId, DirectionId), Headsign> = BTreeMap::new();
        let mut split_stops: BTreeMap<(RouteId, DirectionId), Vec<&[String]>> = BTreeMap::new();
        let mut drafts = Vec::with_capacity(batch.trips.len());

        for trip in &batch.trips {
            let route_id = self.routes.route_id(&trip.route)?;

            let draft = match self.splitter.assign(route_id, trip)? {
                Some(assignment) => {
                    let ordered = assignment
                        .ordered_stops
                        .iter()
                        .map(|raw| known_stop(&stop_ids, raw))
                        .collect::<Result<Vec<_>, _>>()?;
                    groups.insert((route_id, assignment.direction), assignment.headsign);
                    split_stops
                        .entry((route_id, assignment.direction))
                        .or_default()
                        .push(&trip.stops);
                    TripDraft {
                        trip_id: trip.trip_id.clone(),
                        route_id,
                        direction: assignment.direction,
                        ordered_stops: Some(ordered),
                    }
                }
                None => {
                    let direction = raw_direction(trip)?;
                    let label = self.headsigns.label(route_id, direction, &trip.headsign);
                    self.fold_headsign(&mut groups, route_id, direction, label)?;
                    TripDraft {
                        trip_id: trip.trip_id.clone(),
                        route_id,
                        direction,
                        ordered_stops: None,
                    }
                }
            };
            drafts.push(draft);
        }

        let direction_stops = split_stops
            .iter()
            .map(|(&(route_id, direction), trips)| {
                let order = self
                    .splitter
                    .direction_stop_order(route_id, direction, trips);
                Ok(DirectionStops {
                    route_id,
                    direction,
                    stops: order
                        .iter()
                        .map(|raw| known_stop(&stop_ids, raw))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let trips: Vec<ResolvedTrip> = drafts
            .into_iter()
            .map(|d| ResolvedTrip {
                headsign: groups[&(d.route_id, d.direction)].clone(),
                trip_id: d.trip_id,
                route_id: d.route_id,
                direction: d.direction,
                ordered_stops: d.ordered_stops,
            })
            .collect();

        let headsigns: Vec<DirectionHeadsign> = groups
            .into_iter()
            .map(|((route_id, direction), headsign)| DirectionHeadsign {
                route_id,
                direction,
                headsign,
            })
            .collect();

        info!(
            revision = self.rules.revision(),
            stops = stops.len(),
            routes = routes.len(),
            trips = trips.len(),
            directions = headsigns.len(),
            "Resolved feed"
        );

        Ok(ResolvedFeed {
            revision: self.rules.revision().to_string(),
            agency_color: self.rules.agency_color(),
            stops,
            routes,
            headsigns,
            trips,
            direction_stops,
        })
    }

    /// Resolve every stop, rejecting two raw ids that land on one id.
    fn resolve_stops(&self, raw: &[RawStop]) -> Result<Vec<ResolvedStop>, ResolveError> {
        let mut owners: HashMap<StopId, &str> = HashMap::with_capacity(raw.len());
        let mut stops = Vec::with_capacity(raw.len());

        for stop in raw {
            let stop_id = self.stops.resolve_stop(stop)?;
            match owners.get(&stop_id) {
                Some(&owner) if owner == stop.raw_id => continue,
                Some(_) => {
                    return Err(ResolveError::stop(
                        stop.raw_id.as_str(),
                        "canonical id already assigned to another stop",
                    ));
                }
                None => {
                    owners.insert(stop_id, &stop.raw_id);
                }
            }
            stops.push(ResolvedStop {
                raw_id: stop.raw_id.clone(),
                stop_id,
            });
        }

        Ok(stops)
    }

    /// Fold a trip's label into its route direction's headsign.
    ///
    /// The first label observed is kept; each later distinct label is
    /// merged into it. The group label is only fixed once the whole batch
    /// has been folded, so the outcome follows trip order: merge rules
    /// chain from the current label, and a pair with no rule between them
    /// aborts the run even if a later trip would have bridged them.
    fn fold_headsign(
        &self,
        groups: &mut BTreeMap<(RouteId, DirectionId), Headsign>,
        route: RouteId,
        direction: DirectionId,
        label: Headsign,
    ) -> Result<(), ResolveError> {
        match groups.get_mut(&(route, direction)) {
            Some(current) if *current == label => {}
            Some(current) => {
                let merged = self.headsigns.merge(current.as_str(), label.as_str(), route)?;
                debug!(%route, %direction, from = %current, to = %merged, "Direction headsign");
                *current = merged;
            }
            None => {
                groups.insert((route, direction), label);
            }
        }
        Ok(())
    }
}

fn raw_direction(trip: &RawTrip) -> Result<DirectionId, ResolveError> {
    let raw = trip.direction_id.unwrap_or(0);
    DirectionId::try_from(raw).map_err(|_| ResolveError::UnresolvedIdentifier {
        kind: IdentifierKind::Direction,
        input: format!("{}:{raw}", trip.trip_id),
        reason: "direction id must be 0 or 1",
    })
}

fn known_stop(stop_ids: &HashMap<&str, StopId>, raw: &str) -> Result<StopId, ResolveError> {
    stop_ids
        .get(raw)
        .copied()
        .ok_or_else(|| ResolveError::stop(raw, "stop is not in the batch"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClassificationKind;
    use crate::rules::FeedRevision;

    fn current() -> RuleTables {
        RuleTables::builtin(FeedRevision::Current).unwrap()
    }

    fn split_batch() -> FeedBatch {
        FeedBatch {
            routes: vec![RawRoute::new("190")],
            stops: ["AF930", "RB481", "RB070", "RA510", "AF920", "QQ1"]
                .iter()
                .enumerate()
                .map(|(i, id)| RawStop::new(*id, Some((8000 + i).to_string()).as_deref(), *id))
                .collect(),
            trips: vec![
                RawTrip::new("out", "190", Some(1), "x", &["AF930", "QQ1", "RB481", "RB070"]),
                RawTrip::new("in", "190", Some(0), "y", &["RB070", "RA510", "AF920"]),
            ],
        }
    }

    #[test]
    fn empty_batch() {
        let rules = current();
        let feed = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&FeedBatch::default())
            .unwrap();
        assert!(feed.stops.is_empty());
        assert_eq!(feed.revision, "current");
        assert_eq!(feed.agency_color.unwrap().as_str(), "A2211F");
    }

    #[test]
    fn headsigns_fold_per_direction() {
        let rules = current();
        let engine = IdentityEngine::new(&rules, Strictness::Strict);
        let batch = FeedBatch {
            trips: vec![
                RawTrip::new("a", "14", Some(0), "Tunney's Pasture", &[]),
                RawTrip::new("b", "14", Some(1), "St-Laurent", &[]),
                RawTrip::new("c", "14", Some(0), "Carlington", &[]),
                RawTrip::new("d", "14", Some(0), "Special", &[]),
            ],
            ..FeedBatch::default()
        };
        let feed = engine.run(&batch).unwrap();

        let zero = feed.headsign(RouteId::new(14), DirectionId::Zero).unwrap();
        assert_eq!(zero.as_str(), "Carlington");
        assert_eq!(feed.trip("a").unwrap().headsign.as_str(), "Carlington");
        assert_eq!(feed.trip("b").unwrap().headsign.as_str(), "St-Laurent");
        assert_eq!(feed.headsigns.len(), 2);
    }

    #[test]
    fn ambiguous_merge_aborts() {
        let rules = current();
        let engine = IdentityEngine::new(&rules, Strictness::Lenient);
        let batch = FeedBatch {
            trips: vec![
                RawTrip::new("a", "14", Some(0), "Foo", &[]),
                RawTrip::new("b", "14", Some(0), "Bar", &[]),
            ],
            ..FeedBatch::default()
        };
        assert!(matches!(
            engine.run(&batch).unwrap_err(),
            ResolveError::AmbiguousMerge { .. }
        ));
    }

    #[test]
    fn cleaned_labels_reach_merge_rules() {
        let rules = current();
        let engine = IdentityEngine::new(&rules, Strictness::Strict);
        let batch = FeedBatch {
            trips: vec![
                RawTrip::new("a", "661", Some(0), "Bell H.S", &[]),
                RawTrip::new("b", "661", Some(0), "Bell", &[]),
            ],
            ..FeedBatch::default()
        };
        let feed = engine.run(&batch).unwrap();
        let label = feed.headsign(RouteId::new(661), DirectionId::Zero).unwrap();
        assert_eq!(label.as_str(), "Bell");
        assert_eq!(feed.trip("a").unwrap().headsign.as_str(), "Bell");
    }

    #[test]
    fn headsign_folding_follows_trip_order() {
        let rules = current();
        let engine = IdentityEngine::new(&rules, Strictness::Strict);
        let batch = |labels: [&str; 3]| FeedBatch {
            trips: labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| RawTrip::new(i.to_string(), "11", Some(0), label, &[]))
                .collect(),
            ..FeedBatch::default()
        };

        let chained = engine
            .run(&batch(["Parliament", "Parliament / Parlement", "Rideau"]))
            .unwrap();
        assert_eq!(
            chained.headsign(RouteId::new(11), DirectionId::Zero).unwrap().as_str(),
            "Rideau"
        );

        // "Parliament" and "Rideau" have no rule of their own
        assert_eq!(
            engine
                .run(&batch(["Parliament", "Rideau", "Parliament / Parlement"]))
                .unwrap_err(),
            ResolveError::AmbiguousMerge {
                route: RouteId::new(11),
                first: "Parliament".to_string(),
                second: "Rideau".to_string(),
            }
        );
    }

    #[test]
    fn strictness_controls_classification() {
        let rules = current();
        let batch = FeedBatch {
            routes: vec![RawRoute::new("250")],
            ..FeedBatch::default()
        };

        let err = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedClassification {
                kind: ClassificationKind::LongName,
                ..
            }
        ));

        let feed = IdentityEngine::new(&rules, Strictness::Lenient)
            .run(&batch)
            .unwrap();
        assert_eq!(feed.routes[0].classification.long_name, "Route 250");
    }

    #[test]
    fn invalid_direction_is_unresolved() {
        let rules = current();
        let batch = FeedBatch {
            trips: vec![RawTrip::new("a", "14", Some(2), "Carlington", &[])],
            ..FeedBatch::default()
        };
        let err = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedIdentifier {
                kind: IdentifierKind::Direction,
                ..
            }
        ));
    }

    #[test]
    fn missing_direction_defaults_to_zero() {
        let rules = current();
        let batch = FeedBatch {
            trips: vec![RawTrip::new("a", "14", None, "Carlington", &[])],
            ..FeedBatch::default()
        };
        let feed = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap();
        assert_eq!(feed.trip("a").unwrap().direction, DirectionId::Zero);
    }

    #[test]
    fn colliding_stop_ids_abort() {
        let rules = current();
        let batch = FeedBatch {
            stops: vec![
                RawStop::new("EE1234", None, "A"),
                RawStop::new("X", Some("101234"), "B"),
            ],
            ..FeedBatch::default()
        };
        let err = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::stop("X", "canonical id already assigned to another stop")
        );
    }

    #[test]
    fn repeated_stop_record_is_listed_once() {
        let rules = current();
        let batch = FeedBatch {
            stops: vec![
                RawStop::new("EE1234", None, "A"),
                RawStop::new("EE1234", None, "A"),
            ],
            ..FeedBatch::default()
        };
        let feed = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap();
        assert_eq!(feed.stops.len(), 1);
    }

    #[test]
    fn split_route_trips() {
        let rules = current();
        let feed = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&split_batch())
            .unwrap();

        let out = feed.trip("out").unwrap();
        assert_eq!(out.direction, DirectionId::Zero);
        assert_eq!(out.headsign.as_str(), "Mooney's Bay");
        let expected: Vec<StopId> = ["AF930", "QQ1", "RB481", "RB070"]
            .iter()
            .map(|id| feed.stop_id(id).unwrap())
            .collect();
        assert_eq!(out.ordered_stops.as_deref(), Some(expected.as_slice()));

        let inbound = feed.trip("in").unwrap();
        assert_eq!(inbound.direction, DirectionId::One);
        assert_eq!(inbound.headsign.as_str(), "Hurdman");

        assert_eq!(feed.direction_stops.len(), 2);
        assert_eq!(feed.direction_stops[0].direction, DirectionId::Zero);
        assert_eq!(feed.direction_stops[0].stops, expected);
    }

    #[test]
    fn split_route_needs_known_stops() {
        let rules = current();
        let mut batch = split_batch();
        batch.stops.retain(|s| s.raw_id != "QQ1");
        let err = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap_err();
        assert_eq!(err, ResolveError::stop("QQ1", "stop is not in the batch"));
    }

    #[test]
    fn unassignable_split_trip_aborts() {
        let rules = current();
        let mut batch = split_batch();
        batch
            .trips
            .push(RawTrip::new("lost", "190", Some(0), "", &["AF930"]));
        let err = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&batch)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnassignableTrip { matched: 0, .. }));
    }

    #[test]
    fn resolved_feed_serializes() {
        let rules = current();
        let feed = IdentityEngine::new(&rules, Strictness::Strict)
            .run(&split_batch())
            .unwrap();
        let json = serde_json::to_value(&feed).unwrap();

        assert_eq!(json["agency_color"], "A2211F");
        assert_eq!(json["routes"][0]["short_code"], "190");
        assert_eq!(json["routes"][0]["route_id"], 190);
        assert_eq!(json["routes"][0]["color"], "4F4C4C");
        assert_eq!(json["trips"][0]["direction"], 0);
    }
}
