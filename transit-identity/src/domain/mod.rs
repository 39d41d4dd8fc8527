//! Domain types for transit feed identity resolution.
//!
//! This module contains the value types that flow between the feed, the
//! resolvers and the downstream consumers. Types enforce their invariants
//! at construction time, so code that receives them can trust their validity.

mod color;
mod error;
mod route;
mod stop;
mod trip;

pub use color::{HexColor, InvalidHexColor};
pub use error::{ClassificationKind, IdentifierKind, ResolveError};
pub use route::{InvalidRouteShortCode, RawRoute, RouteId, RouteShortCode};
pub use stop::{RawStop, StopId};
pub use trip::{DirectionId, Headsign, InvalidDirectionId, RawTrip};
