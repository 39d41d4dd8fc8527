//! Entry types held by `RuleTables`.
//!
//! These are constructed only through `RuleTablesBuilder::build`, which
//! validates them, so their accessors are infallible.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::domain::{DirectionId, Headsign, HexColor, RouteId, StopId};

/// Width of every prefix band. Suffix digits must stay below this value.
pub const BAND_WIDTH: u32 = 100_000;

/// A stop id prefix and the start of the integer band reserved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixBand {
    prefix: String,
    offset: u32,
}

impl PrefixBand {
    pub(crate) fn new(prefix: String, offset: u32) -> Self {
        Self { prefix, offset }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Every stop id this band can produce.
    pub fn range(&self) -> Range<u32> {
        self.offset..self.offset + BAND_WIDTH
    }

    pub fn contains(&self, id: u32) -> bool {
        self.range().contains(&id)
    }
}

/// A raw stop id with a fixed, hand-assigned stop id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopException {
    raw_id: String,
    key: String,
    stop_id: StopId,
}

impl StopException {
    pub(crate) fn new(raw_id: String, stop_id: StopId) -> Self {
        let key = raw_id.to_lowercase();
        Self {
            raw_id,
            key,
            stop_id,
        }
    }

    pub fn raw_id(&self) -> &str {
        &self.raw_id
    }

    pub fn stop_id(&self) -> StopId {
        self.stop_id
    }

    /// Case-insensitive match against an already lowercased raw id.
    pub(crate) fn matches_lowercase(&self, lowered: &str) -> bool {
        self.key == lowered
    }
}

/// A non-numeric route short code and the route number it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAlias {
    code: String,
    key: String,
    route: RouteId,
}

impl RouteAlias {
    pub(crate) fn new(code: String, route: RouteId) -> Self {
        let key = code.to_lowercase();
        Self { code, key, route }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    pub(crate) fn matches_lowercase(&self, lowered: &str) -> bool {
        self.key == lowered
    }
}

/// An inclusive range of route numbers sharing one color.
///
/// `color` may be `None`: the band is known but has no color defined yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBand {
    first: RouteId,
    last: RouteId,
    color: Option<HexColor>,
}

impl ColorBand {
    pub(crate) fn new(first: RouteId, last: RouteId, color: Option<HexColor>) -> Self {
        Self { first, last, color }
    }

    pub fn first(&self) -> RouteId {
        self.first
    }

    pub fn last(&self) -> RouteId {
        self.last
    }

    pub fn color(&self) -> Option<HexColor> {
        self.color
    }

    pub fn contains(&self, route: RouteId) -> bool {
        self.first <= route && route <= self.last
    }
}

/// A named set of routes sharing one color (school routes, a line family...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorClass {
    name: String,
    color: Option<HexColor>,
    routes: BTreeSet<RouteId>,
}

impl ColorClass {
    pub(crate) fn new(name: String, color: Option<HexColor>, routes: BTreeSet<RouteId>) -> Self {
        Self {
            name,
            color,
            routes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<HexColor> {
        self.color
    }

    pub fn routes(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.routes.iter().copied()
    }

    pub fn contains(&self, route: RouteId) -> bool {
        self.routes.contains(&route)
    }
}

/// Headsign variants of one route direction that collapse to one label.
///
/// A rule applies to a pair when both headsigns are among its variants, so
/// it is independent of which headsign was observed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    variants: BTreeSet<String>,
    canonical: Headsign,
}

impl MergeRule {
    pub(crate) fn new(variants: BTreeSet<String>, canonical: Headsign) -> Self {
        Self {
            variants,
            canonical,
        }
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    pub fn canonical(&self) -> &Headsign {
        &self.canonical
    }

    pub fn matches(&self, a: &str, b: &str) -> bool {
        self.variants.contains(a) && self.variants.contains(b)
    }
}

/// The anchor waypoints and headsign of one direction of a split route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionAnchors {
    headsign: Headsign,
    anchors: Vec<String>,
}

impl DirectionAnchors {
    pub(crate) fn new(headsign: Headsign, anchors: Vec<String>) -> Self {
        Self { headsign, anchors }
    }

    pub fn headsign(&self) -> &Headsign {
        &self.headsign
    }

    /// Raw stop ids a trip in this direction visits, in order.
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Index of `stop` in the anchor list, if it is an anchor.
    pub fn rank(&self, stop: &str) -> Option<usize> {
        self.anchors.iter().position(|a| a == stop)
    }
}

/// Both directions of a route whose raw direction data is unreliable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    zero: DirectionAnchors,
    one: DirectionAnchors,
}

impl AnchorSpec {
    pub(crate) fn new(zero: DirectionAnchors, one: DirectionAnchors) -> Self {
        Self { zero, one }
    }

    pub fn direction(&self, direction: DirectionId) -> &DirectionAnchors {
        match direction {
            DirectionId::Zero => &self.zero,
            DirectionId::One => &self.one,
        }
    }
}
