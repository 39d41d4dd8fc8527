//! Headsign labelling and merging.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::domain::{DirectionId, Headsign, ResolveError, RouteId};
use crate::rules::RuleTables;

/// Marker a feed puts before a headsign for the northbound variant.
const DIRECTION_MARKER: &str = "N ";

/// Placeholder label some trips carry instead of a destination.
const SPECIAL: &str = "Special";

static STARTS_WITH_TO_VERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^.* |^)(to/vers|to / vers)").unwrap());

static TO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(^|\W)to(\W|$)").unwrap());

static VIA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(^|\W)via(\W|$)").unwrap());

static SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\S)\s*/\s*(\S)").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Known misspellings and their fixes, matched as whole words ignoring case.
static WORD_FIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"carine wilson", "Cairine Wilson"),
        (r"sarfield", "Sarsfield"),
        (r"st- laurent|st laurent", "St-Laurent"),
        (r"l\. b\. pearson|lester b\. pearson", "LB Pearson"),
        (r"h\.s|hs", "HS"),
    ]
    .into_iter()
    .map(|(words, fix)| (whole_words(words), fix))
    .collect()
});

fn whole_words(words: &str) -> Regex {
    // Built from the constant patterns above only
    Regex::new(&format!(r"(?i)(^|\W)({words})(\W|$)")).unwrap()
}

/// Clean a raw feed headsign into a display label.
///
/// Drops everything up to a "to/vers" marker, keeps only the destination
/// of an "A to B" label and drops a trailing "via" clause. Then fixes known
/// misspellings, spaces slashes as " / " and collapses whitespace.
///
/// ```
/// use transit_identity::resolve::clean_headsign;
///
/// assert_eq!(clean_headsign("95 to/vers Orleans"), "Orleans");
/// assert_eq!(clean_headsign("Albert/Bay"), "Albert / Bay");
/// assert_eq!(clean_headsign("Bell H.S"), "Bell HS");
/// assert_eq!(clean_headsign("Blair via Innes"), "Blair");
/// ```
pub fn clean_headsign(raw: &str) -> String {
    let label = STARTS_WITH_TO_VERS.replace_all(raw, "");
    let mut label = remove_via(keep_to(&label)).to_string();
    for (pattern, fix) in WORD_FIXES.iter() {
        label = pattern
            .replace_all(&label, format!("${{1}}{fix}${{3}}"))
            .into_owned();
    }
    let label = SLASHES.replace_all(&label, "$1 / $2");
    WHITESPACE.replace_all(label.trim(), " ").into_owned()
}

/// The text after the first standalone "to", unless nothing follows it.
fn keep_to(label: &str) -> &str {
    match TO.find(label) {
        Some(m) if !label[m.end()..].trim().is_empty() => &label[m.end()..],
        _ => label,
    }
}

/// The text before the first standalone "via", unless nothing precedes it.
fn remove_via(label: &str) -> &str {
    match VIA.find(label) {
        Some(m) if !label[..m.start()].trim().is_empty() => &label[..m.start()],
        _ => label,
    }
}

/// Turns raw trip headsigns into labels and merges conflicting labels
/// observed for the same route direction.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::RouteId;
/// use transit_identity::resolve::HeadsignMergeResolver;
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// let resolver = HeadsignMergeResolver::new(&rules);
/// let route = RouteId::new(14);
///
/// let merged = resolver.merge("Tunney's Pasture", "Carlington", route).unwrap();
/// assert_eq!(merged.as_str(), "Carlington");
/// assert!(resolver.merge("Foo", "Bar", route).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HeadsignMergeResolver<'a> {
    rules: &'a RuleTables,
}

impl<'a> HeadsignMergeResolver<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// The label for a raw trip headsign.
    ///
    /// A placeholder override for the route direction wins; otherwise the
    /// headsign is cleaned if the rules ask for it.
    pub fn label(&self, route: RouteId, direction: DirectionId, raw: &str) -> Headsign {
        if let Some(label) = self.rules.headsign_override(route, direction, raw) {
            trace!(%route, %direction, raw, %label, "Placeholder headsign");
            return label.clone();
        }
        if self.rules.clean_headsigns() {
            Headsign::new(clean_headsign(raw))
        } else {
            Headsign::new(raw)
        }
    }

    /// Merge two labels observed for one direction of `route`.
    ///
    /// Equal labels, a "N " marked variant, and a "Special" placeholder are
    /// handled generically. Anything else needs a merge rule for the route;
    /// without one the merge fails in every mode.
    pub fn merge(&self, a: &str, b: &str, route: RouteId) -> Result<Headsign, ResolveError> {
        if a == b {
            return Ok(Headsign::new(a));
        }

        if a.strip_prefix(DIRECTION_MARKER) == Some(b) {
            return Ok(Headsign::new(b));
        }
        if b.strip_prefix(DIRECTION_MARKER) == Some(a) {
            return Ok(Headsign::new(a));
        }

        match (is_special(a), is_special(b)) {
            (true, false) => return Ok(Headsign::new(b)),
            (false, true) => return Ok(Headsign::new(a)),
            _ => {}
        }

        if let Some(rule) = self
            .rules
            .merge_rules(route)
            .iter()
            .find(|r| r.matches(a, b))
        {
            debug!(%route, a, b, canonical = %rule.canonical(), "Merged headsigns");
            return Ok(rule.canonical().clone());
        }

        Err(ResolveError::AmbiguousMerge {
            route,
            first: a.to_string(),
            second: b.to_string(),
        })
    }
}

fn is_special(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(SPECIAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FeedRevision, RuleTablesBuilder};

    fn current() -> RuleTables {
        RuleTables::builtin(FeedRevision::Current).unwrap()
    }

    fn route(n: u32) -> RouteId {
        RouteId::new(n)
    }

    #[test]
    fn equal_labels() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(resolver.merge("Foo", "Foo", route(14)).unwrap().as_str(), "Foo");
    }

    #[test]
    fn direction_marker_loses() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(
            resolver.merge("N Hurdman", "Hurdman", route(99)).unwrap().as_str(),
            "Hurdman"
        );
        assert_eq!(
            resolver.merge("Hurdman", "N Hurdman", route(99)).unwrap().as_str(),
            "Hurdman"
        );
    }

    #[test]
    fn special_placeholder_loses() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(
            resolver.merge("Special", "Greenboro", route(99)).unwrap().as_str(),
            "Greenboro"
        );
        assert_eq!(
            resolver.merge("Greenboro", "SPECIAL", route(99)).unwrap().as_str(),
            "Greenboro"
        );
    }

    #[test]
    fn two_specials_do_not_merge() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert!(resolver.merge("Special", "special", route(99)).is_err());
    }

    #[test]
    fn route_rule() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        let merged = resolver
            .merge("Tunney's Pasture", "Carlington", route(14))
            .unwrap();
        assert_eq!(merged.as_str(), "Carlington");
    }

    #[test]
    fn three_variant_rule_matches_any_pair() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        let merged = resolver
            .merge("Parliament ~ Parlement", "Rideau", route(12))
            .unwrap();
        assert_eq!(merged.as_str(), "Parliament / Parlement");
    }

    #[test]
    fn rule_is_scoped_to_its_route() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert!(resolver.merge("Tunney's Pasture", "Carlington", route(15)).is_err());
    }

    #[test]
    fn unconfigured_pair_is_ambiguous() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(
            resolver.merge("Foo", "Bar", route(14)).unwrap_err(),
            ResolveError::AmbiguousMerge {
                route: route(14),
                first: "Foo".to_string(),
                second: "Bar".to_string(),
            }
        );
    }

    #[test]
    fn legacy_placeholder_label() {
        let rules = RuleTables::builtin(FeedRevision::Legacy).unwrap();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(
            resolver.label(route(179), DirectionId::Zero, "0").as_str(),
            "CitiGate"
        );
        // Only the digit matching the direction is a placeholder
        assert_eq!(resolver.label(route(179), DirectionId::One, "0").as_str(), "0");
        assert_eq!(
            resolver.label(route(14), DirectionId::Zero, "Carlington").as_str(),
            "Carlington"
        );
    }

    #[test]
    fn label_cleans_when_enabled() {
        let rules = current();
        let resolver = HeadsignMergeResolver::new(&rules);
        assert_eq!(
            resolver.label(route(5), DirectionId::Zero, "Billings  Bridge/St Laurent").as_str(),
            "Billings Bridge / St-Laurent"
        );

        let raw_rules = RuleTablesBuilder::new("raw").build().unwrap();
        let raw = HeadsignMergeResolver::new(&raw_rules);
        assert_eq!(
            raw.label(route(5), DirectionId::Zero, "Billings  Bridge/St Laurent").as_str(),
            "Billings  Bridge/St Laurent"
        );
    }

    #[test]
    fn cleaning() {
        assert_eq!(clean_headsign("To / Vers Blair"), "Blair");
        assert_eq!(clean_headsign("Route 5 to/vers Rideau"), "Rideau");
        assert_eq!(clean_headsign("Carine Wilson"), "Cairine Wilson");
        assert_eq!(clean_headsign("Navan/Sarfield"), "Navan / Sarsfield");
        assert_eq!(clean_headsign("st- laurent"), "St-Laurent");
        assert_eq!(clean_headsign("Lester B. Pearson HS"), "LB Pearson HS");
        assert_eq!(clean_headsign("L. B. Pearson"), "LB Pearson");
        // Whole words only
        assert_eq!(clean_headsign("Hillcrest"), "Hillcrest");
        assert_eq!(clean_headsign("  Greenboro   "), "Greenboro");
    }

    #[test]
    fn cleaning_keeps_destination_and_drops_via() {
        assert_eq!(clean_headsign("Hurdman to Blair"), "Blair");
        assert_eq!(
            clean_headsign("Tunney's Pasture Via Briarbrook"),
            "Tunney's Pasture"
        );
        assert_eq!(clean_headsign("Hurdman TO Blair via Innes"), "Blair");
        // A dangling marker is not a destination
        assert_eq!(clean_headsign("Blair to"), "Blair to");
        assert_eq!(clean_headsign("Via Rail"), "Via Rail");
        // Whole words only
        assert_eq!(clean_headsign("Toronto Viaduct"), "Toronto Viaduct");
    }
}
