//! Stop identifier and raw stop record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical stop identifier.
///
/// Stop ids are either a rider-facing numeric stop code passed through
/// unchanged, or a value synthesized from a prefix band. They are stable
/// across runs for the same input and rule tables.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::StopId;
///
/// let id = StopId::new(101234);
/// assert_eq!(id.get(), 101234);
/// assert_eq!(id.to_string(), "101234");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(u32);

impl StopId {
    /// Wrap a raw integer as a stop id.
    pub const fn new(id: u32) -> Self {
        StopId(id)
    }

    /// Returns the integer value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stop record as supplied by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStop {
    /// Vendor-assigned stop identifier (alphanumeric, e.g. "EE1234").
    pub raw_id: String,
    /// Rider-facing stop code, usually numeric.
    #[serde(default)]
    pub code: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl RawStop {
    /// Create a stop record.
    pub fn new(raw_id: impl Into<String>, code: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            raw_id: raw_id.into(),
            code: code.map(str::to_string),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_id_accessors() {
        let id = StopId::new(3023);
        assert_eq!(id.get(), 3023);
        assert_eq!(format!("{}", id), "3023");
        assert_eq!(format!("{:?}", id), "StopId(3023)");
    }

    #[test]
    fn stop_id_ordering() {
        assert!(StopId::new(1) < StopId::new(100_000));
    }

    #[test]
    fn raw_stop_deserializes_without_code() {
        let stop: RawStop = serde_json::from_str(r#"{"raw_id": "EE1234"}"#).unwrap();
        assert_eq!(stop.raw_id, "EE1234");
        assert!(stop.code.is_none());
        assert!(stop.name.is_empty());
    }

    #[test]
    fn stop_id_serializes_as_integer() {
        let json = serde_json::to_string(&StopId::new(101234)).unwrap();
        assert_eq!(json, "101234");
    }
}
