//! Trip direction, headsign and raw trip record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a raw direction id is not 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction id {value}: must be 0 or 1")]
pub struct InvalidDirectionId {
    value: u8,
}

/// One of the two directions of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DirectionId {
    Zero,
    One,
}

impl DirectionId {
    /// Both directions, in id order.
    pub const ALL: [DirectionId; 2] = [DirectionId::Zero, DirectionId::One];

    /// Returns the numeric id (0 or 1).
    pub fn as_u8(self) -> u8 {
        match self {
            DirectionId::Zero => 0,
            DirectionId::One => 1,
        }
    }
}

impl TryFrom<u8> for DirectionId {
    type Error = InvalidDirectionId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DirectionId::Zero),
            1 => Ok(DirectionId::One),
            value => Err(InvalidDirectionId { value }),
        }
    }
}

impl From<DirectionId> for u8 {
    fn from(d: DirectionId) -> u8 {
        d.as_u8()
    }
}

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A rider-facing destination label for one direction of a route.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headsign(String);

impl Headsign {
    pub fn new(s: impl Into<String>) -> Self {
        Headsign(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Headsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Headsign({:?})", self.0)
    }
}

impl fmt::Display for Headsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trip record as supplied by the feed.
///
/// `route` is the short code of the trip's route, the same string the
/// route record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrip {
    pub trip_id: String,
    pub route: String,
    #[serde(default)]
    pub direction_id: Option<u8>,
    #[serde(default)]
    pub headsign: String,
    /// Raw stop ids in the order the feed lists them.
    #[serde(default)]
    pub stops: Vec<String>,
}

impl RawTrip {
    pub fn new(
        trip_id: impl Into<String>,
        route: impl Into<String>,
        direction_id: Option<u8>,
        headsign: impl Into<String>,
        stops: &[&str],
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            route: route.into(),
            direction_id,
            headsign: headsign.into(),
            stops: stops.iter().map(|s| s.to_string()).collect(),
        }
    }
}
