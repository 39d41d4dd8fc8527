//! Serializable rule documents and the validating builder.
//!
//! A `RulesDocument` is the on-disk (JSON) shape of a rule table revision.
//! Every path into a `RuleTables` goes through `RuleTablesBuilder::build`,
//! whether the rules come from a file or from the built-in tables.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::RuleTables;
use super::error::RulesError;
use super::tables::{
    AnchorSpec, BAND_WIDTH, ColorBand, ColorClass, DirectionAnchors, MergeRule, PrefixBand,
    RouteAlias, StopException,
};
use crate::domain::{DirectionId, Headsign, HexColor, RouteId, StopId};
use crate::resolve::clean_headsign;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopBandEntry {
    pub prefix: String,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopExceptionEntry {
    pub raw_id: String,
    pub stop_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAliasEntry {
    pub code: String,
    pub route: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongNameEntry {
    pub route: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOverrideEntry {
    pub route: u32,
    /// `None` means the route intentionally has no color.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBandEntry {
    pub first: u32,
    pub last: u32,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorClassEntry {
    pub name: String,
    pub color: Option<String>,
    pub routes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRuleEntry {
    pub route: u32,
    pub variants: Vec<String>,
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadsignOverrideEntry {
    pub route: u32,
    pub direction: DirectionId,
    pub raw: String,
    pub headsign: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionAnchorsEntry {
    pub headsign: String,
    pub anchors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSpecEntry {
    pub route: u32,
    pub direction_0: DirectionAnchorsEntry,
    pub direction_1: DirectionAnchorsEntry,
}

/// Every rule table of one revision, in declaration order.
///
/// Order matters for `stop_bands` (first matching prefix wins) and
/// `color_classes` (first containing class wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesDocument {
    pub revision: String,
    pub agency_color: Option<String>,
    pub stop_bands: Vec<StopBandEntry>,
    pub stop_exceptions: Vec<StopExceptionEntry>,
    pub route_aliases: Vec<RouteAliasEntry>,
    pub long_names: Vec<LongNameEntry>,
    pub color_overrides: Vec<ColorOverrideEntry>,
    pub color_bands: Vec<ColorBandEntry>,
    pub color_classes: Vec<ColorClassEntry>,
    pub merge_rules: Vec<MergeRuleEntry>,
    pub headsign_overrides: Vec<HeadsignOverrideEntry>,
    pub clean_headsigns: bool,
    pub anchor_specs: Vec<AnchorSpecEntry>,
}

/// Builder for rule tables.
///
/// Provides a fluent API for declaring rules; `build` validates the whole
/// set at once.
#[derive(Debug, Clone, Default)]
pub struct RuleTablesBuilder {
    doc: RulesDocument,
}

impl RuleTablesBuilder {
    /// Create an empty builder for the named revision.
    pub fn new(revision: &str) -> Self {
        Self {
            doc: RulesDocument {
                revision: revision.to_string(),
                ..RulesDocument::default()
            },
        }
    }

    /// Start from a parsed rule document.
    pub fn from_document(doc: RulesDocument) -> Self {
        Self { doc }
    }

    pub fn agency_color(mut self, color: &str) -> Self {
        self.doc.agency_color = Some(color.to_string());
        self
    }

    /// Reserve the band starting at `offset` for raw ids beginning with `prefix`.
    pub fn stop_band(mut self, prefix: &str, offset: u32) -> Self {
        self.doc.stop_bands.push(StopBandEntry {
            prefix: prefix.to_string(),
            offset,
        });
        self
    }

    pub fn stop_exception(mut self, raw_id: &str, stop_id: u32) -> Self {
        self.doc.stop_exceptions.push(StopExceptionEntry {
            raw_id: raw_id.to_string(),
            stop_id,
        });
        self
    }

    pub fn route_alias(mut self, code: &str, route: u32) -> Self {
        self.doc.route_aliases.push(RouteAliasEntry {
            code: code.to_string(),
            route,
        });
        self
    }

    pub fn long_name(mut self, route: u32, name: &str) -> Self {
        self.doc.long_names.push(LongNameEntry {
            route,
            name: name.to_string(),
        });
        self
    }

    pub fn color_override(mut self, route: u32, color: Option<&str>) -> Self {
        self.doc.color_overrides.push(ColorOverrideEntry {
            route,
            color: color.map(str::to_string),
        });
        self
    }

    pub fn color_band(mut self, first: u32, last: u32, color: Option<&str>) -> Self {
        self.doc.color_bands.push(ColorBandEntry {
            first,
            last,
            color: color.map(str::to_string),
        });
        self
    }

    pub fn color_class(mut self, name: &str, color: Option<&str>, routes: &[u32]) -> Self {
        self.doc.color_classes.push(ColorClassEntry {
            name: name.to_string(),
            color: color.map(str::to_string),
            routes: routes.to_vec(),
        });
        self
    }

    pub fn merge_rule(mut self, route: u32, variants: &[&str], canonical: &str) -> Self {
        self.doc.merge_rules.push(MergeRuleEntry {
            route,
            variants: variants.iter().map(|v| v.to_string()).collect(),
            canonical: canonical.to_string(),
        });
        self
    }

    pub fn headsign_override(
        mut self,
        route: u32,
        direction: DirectionId,
        raw: &str,
        headsign: &str,
    ) -> Self {
        self.doc.headsign_overrides.push(HeadsignOverrideEntry {
            route,
            direction,
            raw: raw.to_string(),
            headsign: headsign.to_string(),
        });
        self
    }

    pub fn clean_headsigns(mut self, enabled: bool) -> Self {
        self.doc.clean_headsigns = enabled;
        self
    }

    /// Declare a direction-split route: `(headsign, anchors)` per direction.
    pub fn anchor_spec(mut self, route: u32, zero: (&str, &[&str]), one: (&str, &[&str])) -> Self {
        let entry = |(headsign, anchors): (&str, &[&str])| DirectionAnchorsEntry {
            headsign: headsign.to_string(),
            anchors: anchors.iter().map(|a| a.to_string()).collect(),
        };
        self.doc.anchor_specs.push(AnchorSpecEntry {
            route,
            direction_0: entry(zero),
            direction_1: entry(one),
        });
        self
    }

    /// Validate every table and produce immutable rule tables.
    pub fn build(self) -> Result<RuleTables, RulesError> {
        let doc = self.doc;

        let agency_color = doc
            .agency_color
            .as_deref()
            .map(|c| parse_color("agency color", c))
            .transpose()?;

        let stop_bands = build_stop_bands(&doc.stop_bands)?;
        let stop_exceptions = build_stop_exceptions(&doc.stop_exceptions, &stop_bands)?;
        let route_aliases = build_route_aliases(&doc.route_aliases)?;

        let mut long_names = HashMap::with_capacity(doc.long_names.len());
        for entry in &doc.long_names {
            let route = RouteId::new(entry.route);
            if long_names.insert(route, entry.name.clone()).is_some() {
                return Err(duplicate("long name", route));
            }
        }

        let mut color_overrides = HashMap::with_capacity(doc.color_overrides.len());
        for entry in &doc.color_overrides {
            let route = RouteId::new(entry.route);
            let color = parse_optional_color("color override", entry.color.as_deref())?;
            if color_overrides.insert(route, color).is_some() {
                return Err(duplicate("color override", route));
            }
        }

        let color_bands = build_color_bands(&doc.color_bands)?;
        let color_classes = build_color_classes(&doc.color_classes)?;
        let merge_rules = build_merge_rules(&doc.merge_rules, doc.clean_headsigns)?;
        let headsign_overrides = build_headsign_overrides(&doc.headsign_overrides)?;
        let anchor_specs = build_anchor_specs(&doc.anchor_specs)?;

        Ok(RuleTables {
            revision: doc.revision,
            agency_color,
            stop_bands,
            stop_exceptions,
            route_aliases,
            long_names,
            color_overrides,
            color_bands,
            color_classes,
            merge_rules,
            headsign_overrides,
            clean_headsigns: doc.clean_headsigns,
            anchor_specs,
        })
    }
}

fn duplicate(table: &'static str, key: impl ToString) -> RulesError {
    RulesError::Duplicate {
        table,
        key: key.to_string(),
    }
}

fn parse_color(table: &'static str, value: &str) -> Result<HexColor, RulesError> {
    HexColor::parse(value).map_err(|source| RulesError::InvalidColor {
        table,
        value: value.to_string(),
        source,
    })
}

fn parse_optional_color(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<HexColor>, RulesError> {
    value.map(|c| parse_color(table, c)).transpose()
}

fn build_stop_bands(entries: &[StopBandEntry]) -> Result<Vec<PrefixBand>, RulesError> {
    let mut bands: Vec<PrefixBand> = Vec::with_capacity(entries.len());

    for entry in entries {
        let invalid = |reason| RulesError::InvalidBand {
            prefix: entry.prefix.clone(),
            reason,
        };
        if entry.prefix.is_empty() {
            return Err(invalid("prefix cannot be empty"));
        }
        if entry.offset == 0 || entry.offset % BAND_WIDTH != 0 {
            return Err(invalid("offset must be a positive multiple of 100000"));
        }
        if entry.offset.checked_add(BAND_WIDTH).is_none() {
            return Err(invalid("offset out of range"));
        }

        for earlier in &bands {
            if earlier.prefix() == entry.prefix {
                return Err(duplicate("stop band", &entry.prefix));
            }
            if earlier.offset() == entry.offset {
                return Err(invalid("offset already assigned to another prefix"));
            }
            if entry.prefix.starts_with(earlier.prefix()) {
                return Err(RulesError::ShadowedPrefix {
                    earlier: earlier.prefix().to_string(),
                    later: entry.prefix.clone(),
                });
            }
        }

        bands.push(PrefixBand::new(entry.prefix.clone(), entry.offset));
    }

    Ok(bands)
}

fn build_stop_exceptions(
    entries: &[StopExceptionEntry],
    bands: &[PrefixBand],
) -> Result<Vec<StopException>, RulesError> {
    let mut exceptions: Vec<StopException> = Vec::with_capacity(entries.len());

    for entry in entries {
        let lowered = entry.raw_id.to_lowercase();
        if exceptions.iter().any(|e| e.matches_lowercase(&lowered)) {
            return Err(duplicate("stop exception", &entry.raw_id));
        }
        if let Some(band) = bands.iter().find(|b| b.contains(entry.stop_id)) {
            return Err(RulesError::ExceptionInBand {
                raw_id: entry.raw_id.clone(),
                stop_id: entry.stop_id,
                prefix: band.prefix().to_string(),
            });
        }
        exceptions.push(StopException::new(
            entry.raw_id.clone(),
            StopId::new(entry.stop_id),
        ));
    }

    Ok(exceptions)
}

fn build_route_aliases(entries: &[RouteAliasEntry]) -> Result<Vec<RouteAlias>, RulesError> {
    let mut aliases: Vec<RouteAlias> = Vec::with_capacity(entries.len());

    for entry in entries {
        let code = entry.code.trim();
        if code.is_empty() {
            return Err(RulesError::InvalidAlias {
                code: entry.code.clone(),
                reason: "alias cannot be empty",
            });
        }
        if code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RulesError::InvalidAlias {
                code: entry.code.clone(),
                reason: "numeric codes are route numbers, not aliases",
            });
        }
        let lowered = code.to_lowercase();
        if aliases.iter().any(|a| a.matches_lowercase(&lowered)) {
            return Err(duplicate("route alias", code));
        }
        aliases.push(RouteAlias::new(code.to_string(), RouteId::new(entry.route)));
    }

    Ok(aliases)
}

fn build_color_bands(entries: &[ColorBandEntry]) -> Result<Vec<ColorBand>, RulesError> {
    let mut bands = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.first > entry.last {
            return Err(RulesError::InvalidColorBand {
                first: entry.first,
                last: entry.last,
                reason: "first must not exceed last",
            });
        }
        let color = parse_optional_color("color band", entry.color.as_deref())?;
        bands.push(ColorBand::new(
            RouteId::new(entry.first),
            RouteId::new(entry.last),
            color,
        ));
    }

    let mut sorted: Vec<&ColorBand> = bands.iter().collect();
    sorted.sort_by_key(|b| b.first());
    for pair in sorted.windows(2) {
        if pair[1].first() <= pair[0].last() {
            return Err(RulesError::InvalidColorBand {
                first: pair[1].first().get(),
                last: pair[1].last().get(),
                reason: "overlaps another band",
            });
        }
    }

    Ok(bands)
}

fn build_color_classes(entries: &[ColorClassEntry]) -> Result<Vec<ColorClass>, RulesError> {
    let mut classes: Vec<ColorClass> = Vec::with_capacity(entries.len());

    for entry in entries {
        if classes.iter().any(|c| c.name() == entry.name) {
            return Err(duplicate("color class", &entry.name));
        }
        let color = parse_optional_color("color class", entry.color.as_deref())?;
        let routes: BTreeSet<RouteId> = entry.routes.iter().copied().map(RouteId::new).collect();
        classes.push(ColorClass::new(entry.name.clone(), color, routes));
    }

    Ok(classes)
}

/// With cleaning on, merges only ever see cleaned labels, so every variant
/// must already be in cleaned form.
fn build_merge_rules(
    entries: &[MergeRuleEntry],
    clean_headsigns: bool,
) -> Result<HashMap<RouteId, Vec<MergeRule>>, RulesError> {
    let mut rules: HashMap<RouteId, Vec<MergeRule>> = HashMap::new();

    for entry in entries {
        let invalid = |reason| RulesError::InvalidMergeRule {
            route: entry.route,
            reason,
        };
        let variants: BTreeSet<String> = entry.variants.iter().cloned().collect();
        if variants.len() < 2 {
            return Err(invalid("needs at least two distinct variants"));
        }
        if !variants.contains(&entry.canonical) {
            return Err(invalid("canonical label must be one of the variants"));
        }
        if clean_headsigns {
            for variant in &variants {
                let cleaned = clean_headsign(variant);
                if cleaned != *variant {
                    return Err(RulesError::UncleanMergeVariant {
                        route: entry.route,
                        variant: variant.clone(),
                        cleaned,
                    });
                }
            }
        }

        let route_rules = rules.entry(RouteId::new(entry.route)).or_default();
        if route_rules
            .iter()
            .any(|r| r.variants().eq(variants.iter().map(String::as_str)))
        {
            return Err(duplicate(
                "merge rule",
                format!("route {} {:?}", entry.route, entry.variants),
            ));
        }
        route_rules.push(MergeRule::new(
            variants,
            Headsign::new(entry.canonical.clone()),
        ));
    }

    Ok(rules)
}

type OverrideTable = HashMap<(RouteId, DirectionId), HashMap<String, Headsign>>;

fn build_headsign_overrides(entries: &[HeadsignOverrideEntry]) -> Result<OverrideTable, RulesError> {
    let mut overrides: OverrideTable = HashMap::new();

    for entry in entries {
        let by_raw = overrides
            .entry((RouteId::new(entry.route), entry.direction))
            .or_default();
        if by_raw
            .insert(entry.raw.clone(), Headsign::new(entry.headsign.clone()))
            .is_some()
        {
            return Err(duplicate(
                "headsign override",
                format!("route {} direction {} {:?}", entry.route, entry.direction, entry.raw),
            ));
        }
    }

    Ok(overrides)
}

fn build_anchor_specs(
    entries: &[AnchorSpecEntry],
) -> Result<HashMap<RouteId, AnchorSpec>, RulesError> {
    let mut specs = HashMap::with_capacity(entries.len());

    for entry in entries {
        let invalid = |reason| RulesError::InvalidAnchorSpec {
            route: entry.route,
            reason,
        };
        for direction in [&entry.direction_0, &entry.direction_1] {
            if direction.anchors.is_empty() {
                return Err(invalid("each direction needs at least one anchor"));
            }
            if direction.headsign.trim().is_empty() {
                return Err(invalid("each direction needs a headsign"));
            }
        }
        if entry.direction_0.anchors == entry.direction_1.anchors {
            return Err(invalid("directions must have different anchors"));
        }

        let to_anchors = |d: &DirectionAnchorsEntry| {
            DirectionAnchors::new(Headsign::new(d.headsign.clone()), d.anchors.clone())
        };
        let spec = AnchorSpec::new(to_anchors(&entry.direction_0), to_anchors(&entry.direction_1));
        if specs.insert(RouteId::new(entry.route), spec).is_some() {
            return Err(duplicate("anchor spec", entry.route));
        }
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RuleTablesBuilder {
        RuleTablesBuilder::new("test")
    }

    #[test]
    fn empty_builder_builds() {
        let rules = base().build().unwrap();
        assert_eq!(rules.revision(), "test");
        assert!(rules.stop_bands().is_empty());
    }

    #[test]
    fn rejects_misaligned_band() {
        let err = base().stop_band("EE", 150_000).build().unwrap_err();
        assert!(matches!(err, RulesError::InvalidBand { .. }));

        let err = base().stop_band("EE", 0).build().unwrap_err();
        assert!(matches!(err, RulesError::InvalidBand { .. }));
    }

    #[test]
    fn rejects_reused_offset() {
        let err = base()
            .stop_band("EE", 100_000)
            .stop_band("EO", 100_000)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidBand { .. }));
    }

    #[test]
    fn rejects_duplicate_prefix() {
        let err = base()
            .stop_band("EE", 100_000)
            .stop_band("EE", 200_000)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::Duplicate { .. }));
    }

    #[test]
    fn rejects_shadowed_prefix() {
        let err = base()
            .stop_band("SN", 100_000)
            .stop_band("SNOW", 200_000)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::ShadowedPrefix { .. }));

        // The reverse order is fine: the longer prefix is tried first
        assert!(
            base()
                .stop_band("SNOW", 100_000)
                .stop_band("SN", 200_000)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn rejects_exception_inside_band() {
        let err = base()
            .stop_band("EE", 100_000)
            .stop_exception("EE-CAFE", 100_001)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::ExceptionInBand { .. }));
    }

    #[test]
    fn rejects_duplicate_exception_ignoring_case() {
        let err = base()
            .stop_exception("SNO CAFÉ", 9_900_001)
            .stop_exception("sno café", 9_900_002)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::Duplicate { .. }));
    }

    #[test]
    fn rejects_numeric_alias() {
        let err = base().route_alias("95", 95).build().unwrap_err();
        assert!(matches!(err, RulesError::InvalidAlias { .. }));
    }

    #[test]
    fn rejects_invalid_color() {
        let err = base().color_override(11, Some("F1462")).build().unwrap_err();
        assert!(matches!(err, RulesError::InvalidColor { .. }));
    }

    #[test]
    fn rejects_overlapping_color_bands() {
        let err = base()
            .color_band(100, 199, Some("4F4C4C"))
            .color_band(150, 299, Some("8D188F"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidColorBand { .. }));
    }

    #[test]
    fn rejects_inverted_color_band() {
        let err = base().color_band(299, 200, None).build().unwrap_err();
        assert!(matches!(err, RulesError::InvalidColorBand { .. }));
    }

    #[test]
    fn rejects_duplicate_long_name() {
        let err = base()
            .long_name(14, "St Laurent - Carlington")
            .long_name(14, "Other")
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::Duplicate { .. }));
    }

    #[test]
    fn rejects_merge_rule_with_foreign_canonical() {
        let err = base()
            .merge_rule(14, &["Tunney's Pasture", "Carlington"], "Hurdman")
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidMergeRule { .. }));
    }

    #[test]
    fn rejects_single_variant_merge_rule() {
        let err = base()
            .merge_rule(14, &["Carlington", "Carlington"], "Carlington")
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidMergeRule { .. }));
    }

    #[test]
    fn rejects_merge_variant_changed_by_cleaning() {
        let err = base()
            .merge_rule(661, &["Bell H.S", "Bell"], "Bell")
            .clean_headsigns(true)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RulesError::UncleanMergeVariant { route: 661, ref variant, ref cleaned }
                if variant == "Bell H.S" && cleaned == "Bell HS"
        ));

        // Raw labels reach the merge untouched when cleaning is off
        base()
            .merge_rule(661, &["Bell H.S", "Bell"], "Bell")
            .build()
            .unwrap();
    }

    #[test]
    fn rejects_identical_anchor_directions() {
        let err = base()
            .anchor_spec(190, ("A", &["X", "Y"]), ("B", &["X", "Y"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidAnchorSpec { .. }));
    }

    #[test]
    fn rejects_empty_anchor_list() {
        let err = base()
            .anchor_spec(190, ("A", &[]), ("B", &["X"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidAnchorSpec { .. }));
    }

    #[test]
    fn document_deserializes_with_defaults() {
        let doc: RulesDocument = serde_json::from_str(
            r#"{
                "revision": "mini",
                "stop_bands": [{"prefix": "EE", "offset": 100000}],
                "long_names": [{"route": 14, "name": "St Laurent - Carlington"}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.revision, "mini");
        assert!(doc.merge_rules.is_empty());
        assert!(!doc.clean_headsigns);

        let rules = RuleTablesBuilder::from_document(doc).build().unwrap();
        assert_eq!(rules.long_name(RouteId::new(14)), Some("St Laurent - Carlington"));
    }
}
