//! Resolvers that turn raw feed records into canonical identities.
//!
//! Every resolver borrows a `RuleTables` and is otherwise stateless.

mod direction;
mod headsign;
mod route;
mod stop_id;

pub use direction::{DirectionAssignment, TripDirectionSplitter};
pub use headsign::{HeadsignMergeResolver, clean_headsign};
pub use route::{RouteClassification, RouteMetadataResolver, Strictness};
pub use stop_id::StopIdResolver;
