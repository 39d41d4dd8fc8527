//! Rule table error types.

use crate::domain::InvalidHexColor;

/// Errors raised while loading or validating rule tables.
///
/// Rule tables are validated once at construction, so a resolver holding a
/// `RuleTables` never has to re-check these conditions.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A stop band offset is not a positive multiple of the band width
    #[error("stop band {prefix:?}: {reason}")]
    InvalidBand { prefix: String, reason: &'static str },

    /// A later prefix can never match because an earlier one always does
    #[error("stop prefix {later:?} is shadowed by earlier prefix {earlier:?}")]
    ShadowedPrefix { earlier: String, later: String },

    /// A hard-coded stop id collides with a synthesized band
    #[error("stop exception {raw_id:?} ({stop_id}) falls inside band {prefix:?}")]
    ExceptionInBand {
        raw_id: String,
        stop_id: u32,
        prefix: String,
    },

    /// A color value is not six hex digits
    #[error("invalid color {value:?} in {table}: {source}")]
    InvalidColor {
        table: &'static str,
        value: String,
        #[source]
        source: InvalidHexColor,
    },

    /// A color band is empty or overlaps another
    #[error("color band {first}-{last}: {reason}")]
    InvalidColorBand {
        first: u32,
        last: u32,
        reason: &'static str,
    },

    /// The same key appears twice in a table
    #[error("duplicate {table} entry for {key}")]
    Duplicate { table: &'static str, key: String },

    /// A route alias is empty or numeric
    #[error("invalid route alias {code:?}: {reason}")]
    InvalidAlias { code: String, reason: &'static str },

    /// A headsign merge rule cannot be applied
    #[error("merge rule on route {route}: {reason}")]
    InvalidMergeRule { route: u32, reason: &'static str },

    /// Headsign cleaning rewrites a merge rule label, so the rule never matches
    #[error("merge rule on route {route}: {variant:?} is cleaned to {cleaned:?}")]
    UncleanMergeVariant {
        route: u32,
        variant: String,
        cleaned: String,
    },

    /// An anchor spec cannot disambiguate directions
    #[error("anchor spec on route {route}: {reason}")]
    InvalidAnchorSpec { route: u32, reason: &'static str },

    /// Failed to read a rule document from disk
    #[error("failed to read rule document: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a rule document
    #[error("failed to parse rule document: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RulesError::ShadowedPrefix {
            earlier: "SN".into(),
            later: "SNOW".into(),
        };
        assert_eq!(
            err.to_string(),
            "stop prefix \"SNOW\" is shadowed by earlier prefix \"SN\""
        );

        let err = RulesError::Duplicate {
            table: "long name",
            key: "14".into(),
        };
        assert_eq!(err.to_string(), "duplicate long name entry for 14");

        let err = RulesError::InvalidColorBand {
            first: 200,
            last: 100,
            reason: "first must not exceed last",
        };
        assert_eq!(
            err.to_string(),
            "color band 200-100: first must not exceed last"
        );
    }

    #[test]
    fn error_from_json() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: RulesError = result.unwrap_err().into();
        assert!(matches!(err, RulesError::Json(_)));
        assert!(err.to_string().starts_with("failed to parse rule document"));
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "rules.json");
        let err: RulesError = io_err.into();
        assert!(matches!(err, RulesError::Io(_)));
        assert!(err.to_string().contains("rules.json"));
    }
}
