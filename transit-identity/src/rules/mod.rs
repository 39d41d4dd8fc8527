//! Rule tables: the constant data every resolver consults.
//!
//! A `RuleTables` is built once per run, either from a built-in revision or
//! from a JSON rule document, and is read-only afterwards.

mod document;
mod error;
mod oc_transpo;
mod tables;

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::domain::{DirectionId, Headsign, HexColor, RouteId, StopId};

pub use document::{
    AnchorSpecEntry, ColorBandEntry, ColorClassEntry, ColorOverrideEntry, DirectionAnchorsEntry,
    HeadsignOverrideEntry, LongNameEntry, MergeRuleEntry, RouteAliasEntry, RuleTablesBuilder,
    RulesDocument, StopBandEntry, StopExceptionEntry,
};
pub use error::RulesError;
pub use oc_transpo::{FeedRevision, InvalidFeedRevision};
pub use tables::{
    AnchorSpec, BAND_WIDTH, ColorBand, ColorClass, DirectionAnchors, MergeRule, PrefixBand,
    RouteAlias, StopException,
};

/// Validated, immutable rule tables for one feed revision.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::RouteId;
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// assert_eq!(rules.route_alias("R1"), Some(RouteId::new(701)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTables {
    revision: String,
    agency_color: Option<HexColor>,
    stop_bands: Vec<PrefixBand>,
    stop_exceptions: Vec<StopException>,
    route_aliases: Vec<RouteAlias>,
    long_names: HashMap<RouteId, String>,
    color_overrides: HashMap<RouteId, Option<HexColor>>,
    color_bands: Vec<ColorBand>,
    color_classes: Vec<ColorClass>,
    merge_rules: HashMap<RouteId, Vec<MergeRule>>,
    headsign_overrides: HashMap<(RouteId, DirectionId), HashMap<String, Headsign>>,
    clean_headsigns: bool,
    anchor_specs: HashMap<RouteId, AnchorSpec>,
}

impl RuleTables {
    /// Parse and validate a JSON rule document.
    pub fn from_json_str(json: &str) -> Result<RuleTables, RulesError> {
        let doc: RulesDocument = serde_json::from_str(json)?;
        RuleTablesBuilder::from_document(doc).build()
    }

    /// Read, parse and validate a JSON rule document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<RuleTables, RulesError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json_str(&json)?;
        debug!(path = %path.display(), revision = %rules.revision, "Loaded rule document");
        Ok(rules)
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Color for routes no other color rule covers.
    pub fn agency_color(&self) -> Option<HexColor> {
        self.agency_color
    }

    /// Prefix bands in match order.
    pub fn stop_bands(&self) -> &[PrefixBand] {
        &self.stop_bands
    }

    /// Fixed stop id for a raw id, compared case-insensitively.
    pub fn stop_exception(&self, raw_id: &str) -> Option<StopId> {
        let lowered = raw_id.to_lowercase();
        self.stop_exceptions
            .iter()
            .find(|e| e.matches_lowercase(&lowered))
            .map(StopException::stop_id)
    }

    /// Route number for a non-numeric short code, compared case-insensitively.
    pub fn route_alias(&self, code: &str) -> Option<RouteId> {
        let lowered = code.trim().to_lowercase();
        self.route_aliases
            .iter()
            .find(|a| a.matches_lowercase(&lowered))
            .map(RouteAlias::route)
    }

    pub fn long_name(&self, route: RouteId) -> Option<&str> {
        self.long_names.get(&route).map(String::as_str)
    }

    /// Explicit color override. `Some(None)` means the route is
    /// deliberately uncolored.
    pub fn color_override(&self, route: RouteId) -> Option<Option<HexColor>> {
        self.color_overrides.get(&route).copied()
    }

    pub fn color_band(&self, route: RouteId) -> Option<&ColorBand> {
        self.color_bands.iter().find(|b| b.contains(route))
    }

    /// Color classes in match order.
    pub fn color_classes(&self) -> &[ColorClass] {
        &self.color_classes
    }

    pub fn merge_rules(&self, route: RouteId) -> &[MergeRule] {
        self.merge_rules.get(&route).map_or(&[], Vec::as_slice)
    }

    pub fn headsign_override(
        &self,
        route: RouteId,
        direction: DirectionId,
        raw: &str,
    ) -> Option<&Headsign> {
        self.headsign_overrides.get(&(route, direction))?.get(raw)
    }

    /// Whether raw headsigns go through text cleaning.
    pub fn clean_headsigns(&self) -> bool {
        self.clean_headsigns
    }

    pub fn anchor_spec(&self, route: RouteId) -> Option<&AnchorSpec> {
        self.anchor_specs.get(&route)
    }

    /// Routes with an anchor spec, ascending.
    pub fn split_routes(&self) -> Vec<RouteId> {
        let mut routes: Vec<RouteId> = self.anchor_specs.keys().copied().collect();
        routes.sort();
        routes
    }

    /// Export these tables as a rule document.
    ///
    /// Keyed tables are emitted in ascending route order so the output is
    /// stable and can be diffed.
    pub fn to_document(&self) -> RulesDocument {
        let mut long_names: Vec<LongNameEntry> = self
            .long_names
            .iter()
            .map(|(route, name)| LongNameEntry {
                route: route.get(),
                name: name.clone(),
            })
            .collect();
        long_names.sort_by_key(|e| e.route);

        let mut color_overrides: Vec<ColorOverrideEntry> = self
            .color_overrides
            .iter()
            .map(|(route, color)| ColorOverrideEntry {
                route: route.get(),
                color: color.map(|c| c.as_str().to_string()),
            })
            .collect();
        color_overrides.sort_by_key(|e| e.route);

        let mut merge_routes: Vec<&RouteId> = self.merge_rules.keys().collect();
        merge_routes.sort();
        let merge_rules = merge_routes
            .into_iter()
            .flat_map(|route| {
                self.merge_rules[route].iter().map(move |rule| MergeRuleEntry {
                    route: route.get(),
                    variants: rule.variants().map(str::to_string).collect(),
                    canonical: rule.canonical().as_str().to_string(),
                })
            })
            .collect();

        let mut headsign_overrides: Vec<HeadsignOverrideEntry> = self
            .headsign_overrides
            .iter()
            .flat_map(|(&(route, direction), by_raw)| {
                by_raw.iter().map(move |(raw, headsign)| HeadsignOverrideEntry {
                    route: route.get(),
                    direction,
                    raw: raw.clone(),
                    headsign: headsign.as_str().to_string(),
                })
            })
            .collect();
        headsign_overrides.sort_by(|a, b| {
            (a.route, a.direction, &a.raw).cmp(&(b.route, b.direction, &b.raw))
        });

        let anchor_entry = |d: &DirectionAnchors| DirectionAnchorsEntry {
            headsign: d.headsign().as_str().to_string(),
            anchors: d.anchors().to_vec(),
        };
        let anchor_specs = self
            .split_routes()
            .into_iter()
            .filter_map(|route| {
                let spec = self.anchor_specs.get(&route)?;
                Some(AnchorSpecEntry {
                    route: route.get(),
                    direction_0: anchor_entry(spec.direction(DirectionId::Zero)),
                    direction_1: anchor_entry(spec.direction(DirectionId::One)),
                })
            })
            .collect();

        RulesDocument {
            revision: self.revision.clone(),
            agency_color: self.agency_color.map(|c| c.as_str().to_string()),
            stop_bands: self
                .stop_bands
                .iter()
                .map(|b| StopBandEntry {
                    prefix: b.prefix().to_string(),
                    offset: b.offset(),
                })
                .collect(),
            stop_exceptions: self
                .stop_exceptions
                .iter()
                .map(|e| StopExceptionEntry {
                    raw_id: e.raw_id().to_string(),
                    stop_id: e.stop_id().get(),
                })
                .collect(),
            route_aliases: self
                .route_aliases
                .iter()
                .map(|a| RouteAliasEntry {
                    code: a.code().to_string(),
                    route: a.route().get(),
                })
                .collect(),
            long_names,
            color_overrides,
            color_bands: self
                .color_bands
                .iter()
                .map(|b| ColorBandEntry {
                    first: b.first().get(),
                    last: b.last().get(),
                    color: b.color().map(|c| c.as_str().to_string()),
                })
                .collect(),
            color_classes: self
                .color_classes
                .iter()
                .map(|c| ColorClassEntry {
                    name: c.name().to_string(),
                    color: c.color().map(|c| c.as_str().to_string()),
                    routes: c.routes().map(RouteId::get).collect(),
                })
                .collect(),
            merge_rules,
            headsign_overrides,
            clean_headsigns: self.clean_headsigns,
            anchor_specs,
        }
    }
}
