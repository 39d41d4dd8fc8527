//! Route identity and classification.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    ClassificationKind, HexColor, RawRoute, ResolveError, RouteId, RouteShortCode,
};
use crate::rules::RuleTables;

/// How to treat a route no long-name or color rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Missing classification rules abort the run.
    #[default]
    Strict,
    /// Missing classification rules fall back to a default long name and
    /// no color.
    Lenient,
}

/// Classification of one route record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteClassification {
    pub route_id: RouteId,
    pub long_name: String,
    /// `None` means the route is intentionally uncolored.
    pub color: Option<HexColor>,
}

/// Resolves route short codes to route ids, long names and colors.
///
/// # Examples
///
/// ```
/// use transit_identity::resolve::{RouteMetadataResolver, Strictness};
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// let resolver = RouteMetadataResolver::new(&rules, Strictness::Lenient);
///
/// assert_eq!(resolver.resolve_long_name("250").unwrap(), "Route 250");
/// assert_eq!(resolver.resolve_color("250").unwrap().unwrap().as_str(), "8D188F");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteMetadataResolver<'a> {
    rules: &'a RuleTables,
    strictness: Strictness,
}

impl<'a> RouteMetadataResolver<'a> {
    pub fn new(rules: &'a RuleTables, strictness: Strictness) -> Self {
        Self { rules, strictness }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// The canonical route id for a short code.
    ///
    /// Numeric codes are the route number; other codes must have an alias.
    /// Failure is fatal in every mode.
    pub fn route_id(&self, short_code: &str) -> Result<RouteId, ResolveError> {
        let parsed = RouteShortCode::parse(short_code)
            .map_err(|e| ResolveError::route(short_code, e.reason()))?;

        match parsed {
            RouteShortCode::Number(id) => Ok(id),
            RouteShortCode::Alias(code) => {
                let id = self
                    .rules
                    .route_alias(&code)
                    .ok_or_else(|| ResolveError::route(short_code, "unknown route alias"))?;
                debug!(code = %code, %id, "Resolved route alias");
                Ok(id)
            }
        }
    }

    pub fn resolve_long_name(&self, short_code: &str) -> Result<String, ResolveError> {
        let id = self.route_id(short_code)?;
        match self.rules.long_name(id) {
            Some(name) => Ok(name.to_string()),
            None => self.unclassified(ClassificationKind::LongName, short_code, || {
                format!("Route {}", short_code.trim())
            }),
        }
    }

    /// Color by precedence: explicit override, then numeric band, then the
    /// first color class listing the route.
    ///
    /// `Ok(None)` from an override or band is a deliberate "no color".
    pub fn resolve_color(&self, short_code: &str) -> Result<Option<HexColor>, ResolveError> {
        let id = self.route_id(short_code)?;

        if let Some(color) = self.rules.color_override(id) {
            debug!(%id, ?color, "Route color override");
            return Ok(color);
        }
        if let Some(band) = self.rules.color_band(id) {
            debug!(%id, first = %band.first(), last = %band.last(), "Route color band");
            return Ok(band.color());
        }
        if let Some(class) = self.rules.color_classes().iter().find(|c| c.contains(id)) {
            debug!(%id, class = class.name(), "Route color class");
            return Ok(class.color());
        }

        self.unclassified(ClassificationKind::Color, short_code, || None)
    }

    /// Classify a feed route record. Values the feed supplies win over rules.
    pub fn classify(&self, route: &RawRoute) -> Result<RouteClassification, ResolveError> {
        let route_id = self.route_id(&route.short_code)?;

        let long_name = match route.long_name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => self.resolve_long_name(&route.short_code)?,
        };

        let feed_color = route
            .color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .and_then(|c| match HexColor::parse(c.trim()) {
                Ok(color) => Some(color),
                Err(e) => {
                    warn!(route = %route_id, color = c, error = %e, "Ignoring invalid feed color");
                    None
                }
            });
        let color = match feed_color {
            Some(color) => Some(color),
            None => self.resolve_color(&route.short_code)?,
        };

        Ok(RouteClassification {
            route_id,
            long_name,
            color,
        })
    }

    fn unclassified<T>(
        &self,
        kind: ClassificationKind,
        short_code: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ResolveError> {
        match self.strictness {
            Strictness::Strict => Err(ResolveError::UnresolvedClassification {
                kind,
                input: short_code.to_string(),
            }),
            Strictness::Lenient => {
                warn!(short_code, %kind, "No classification rule, using default");
                Ok(default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentifierKind;
    use crate::rules::{FeedRevision, RuleTablesBuilder};

    fn current() -> RuleTables {
        RuleTables::builtin(FeedRevision::Current).unwrap()
    }

    fn color(s: &str) -> Option<HexColor> {
        Some(HexColor::parse(s).unwrap())
    }

    #[test]
    fn numeric_route_id() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(resolver.route_id("95").unwrap(), RouteId::new(95));
        assert_eq!(resolver.route_id(" 14 ").unwrap(), RouteId::new(14));
    }

    #[test]
    fn alias_route_id() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(resolver.route_id("R1").unwrap(), RouteId::new(701));
        assert_eq!(resolver.route_id("hurd").unwrap(), RouteId::new(104));
    }

    #[test]
    fn unknown_alias_is_fatal_even_when_lenient() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Lenient);
        let err = resolver.resolve_long_name("X9").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedIdentifier {
                kind: IdentifierKind::Route,
                ..
            }
        ));
        assert!(resolver.route_id("").is_err());
    }

    #[test]
    fn long_name_lookup() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(
            resolver.resolve_long_name("14").unwrap(),
            "St Laurent - Carlington"
        );
        assert_eq!(
            resolver.resolve_long_name("R1").unwrap(),
            "Blair - Tunney's Pasture"
        );
    }

    #[test]
    fn missing_long_name_strict() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(
            resolver.resolve_long_name("250").unwrap_err(),
            ResolveError::UnresolvedClassification {
                kind: ClassificationKind::LongName,
                input: "250".to_string(),
            }
        );
    }

    #[test]
    fn missing_long_name_lenient() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Lenient);
        assert_eq!(resolver.resolve_long_name("250").unwrap(), "Route 250");
    }

    #[test]
    fn red_class_color() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(resolver.resolve_color("6").unwrap(), color("B31B18"));
    }

    #[test]
    fn override_beats_class() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        // 61 is also in the green class
        assert_eq!(resolver.resolve_color("61").unwrap(), color("293D9B"));
        assert_eq!(resolver.resolve_color("11").unwrap(), color("F14623"));
    }

    #[test]
    fn band_beats_class() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        // 201 is also in the orange and red classes
        assert_eq!(resolver.resolve_color("201").unwrap(), color("8D188F"));
        assert_eq!(resolver.resolve_color("150").unwrap(), color("4F4C4C"));
    }

    #[test]
    fn unset_color_is_a_valid_answer() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(resolver.resolve_color("970").unwrap(), None);
        assert_eq!(resolver.resolve_color("R1").unwrap(), None);
        assert_eq!(resolver.resolve_color("450").unwrap(), None);
    }

    #[test]
    fn class_priority_order() {
        let rules = RuleTablesBuilder::new("test")
            .color_class("FIRST", Some("111111"), &[7])
            .color_class("SECOND", Some("222222"), &[7, 8])
            .build()
            .unwrap();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        assert_eq!(resolver.resolve_color("7").unwrap(), color("111111"));
        assert_eq!(resolver.resolve_color("8").unwrap(), color("222222"));
    }

    #[test]
    fn missing_color_by_strictness() {
        let rules = current();
        let strict = RouteMetadataResolver::new(&rules, Strictness::Strict);
        let lenient = RouteMetadataResolver::new(&rules, Strictness::Lenient);

        // Below every band and in no class
        assert_eq!(
            strict.resolve_color("42").unwrap_err(),
            ResolveError::UnresolvedClassification {
                kind: ClassificationKind::Color,
                input: "42".to_string(),
            }
        );
        assert_eq!(lenient.resolve_color("42").unwrap(), None);
    }

    #[test]
    fn classify_prefers_feed_values() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        let route = RawRoute {
            short_code: "6".to_string(),
            long_name: Some("Custom".to_string()),
            color: Some("00ff00".to_string()),
        };
        let classification = resolver.classify(&route).unwrap();
        assert_eq!(classification.route_id, RouteId::new(6));
        assert_eq!(classification.long_name, "Custom");
        assert_eq!(classification.color, color("00FF00"));
    }

    #[test]
    fn classify_falls_back_to_rules() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Strict);
        let route = RawRoute {
            short_code: "6".to_string(),
            long_name: Some("  ".to_string()),
            color: Some("not-a-color".to_string()),
        };
        let classification = resolver.classify(&route).unwrap();
        assert_eq!(classification.long_name, "Hurdman - Tunney's Pasture");
        assert_eq!(classification.color, color("B31B18"));
    }

    #[test]
    fn classify_lenient_defaults() {
        let rules = current();
        let resolver = RouteMetadataResolver::new(&rules, Strictness::Lenient);
        let classification = resolver.classify(&RawRoute::new("250")).unwrap();
        assert_eq!(classification.long_name, "Route 250");
        assert_eq!(classification.color, color("8D188F"));
    }
}
