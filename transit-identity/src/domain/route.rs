//! Route identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid route short code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route short code: {reason}")]
pub struct InvalidRouteShortCode {
    reason: &'static str,
}

impl InvalidRouteShortCode {
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A canonical numeric route identifier.
///
/// This is the key used by every per-route rule table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(u32);

impl RouteId {
    /// Wrap a raw route number.
    pub const fn new(id: u32) -> Self {
        RouteId(id)
    }

    /// Returns the route number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route short code as printed on the vehicle.
///
/// Most codes are plain route numbers. A handful of legacy codes are
/// non-numeric and must be mapped to a numeric id through an alias table.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::{RouteId, RouteShortCode};
///
/// assert_eq!(
///     RouteShortCode::parse("95").unwrap(),
///     RouteShortCode::Number(RouteId::new(95))
/// );
/// assert_eq!(
///     RouteShortCode::parse("R1").unwrap(),
///     RouteShortCode::Alias("R1".to_string())
/// );
/// assert!(RouteShortCode::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteShortCode {
    /// A pure-digit code, parsed as the route number.
    Number(RouteId),
    /// A non-numeric legacy code.
    Alias(String),
}

impl RouteShortCode {
    /// Parse a short code. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteShortCode> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidRouteShortCode {
                reason: "short code cannot be empty",
            });
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            let n = s.parse::<u32>().map_err(|_| InvalidRouteShortCode {
                reason: "route number out of range",
            })?;
            return Ok(RouteShortCode::Number(RouteId::new(n)));
        }
        Ok(RouteShortCode::Alias(s.to_string()))
    }
}

impl fmt::Display for RouteShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteShortCode::Number(id) => write!(f, "{id}"),
            RouteShortCode::Alias(code) => f.write_str(code),
        }
    }
}

/// A route record as supplied by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoute {
    pub short_code: String,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RawRoute {
    /// A route record with only a short code; name and color come from rules.
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            long_name: None,
            color: None,
        }
    }
}
