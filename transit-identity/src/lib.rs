//! Canonical identity resolution for OC Transpo GTFS feeds.
//!
//! Assigns every stop, route and trip of a feed a stable identity and
//! classification: synthesized stop ids, route long names and colors,
//! merged direction headsigns, and anchor-based direction assignment for
//! routes whose raw direction data cannot be trusted.

pub mod domain;
pub mod engine;
pub mod resolve;
pub mod rules;
