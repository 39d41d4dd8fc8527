//! Resolution error types.
//!
//! Every variant carries the raw input that failed so the operator can add
//! the missing rule. None of these are retried or guessed around; the batch
//! driver decides whether to abort.

use std::fmt;

use super::RouteId;

/// What kind of identifier failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Stop,
    Route,
    Direction,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdentifierKind::Stop => "stop",
            IdentifierKind::Route => "route",
            IdentifierKind::Direction => "direction",
        })
    }
}

/// Which route classification failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationKind {
    LongName,
    Color,
}

impl fmt::Display for ClassificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassificationKind::LongName => "long name",
            ClassificationKind::Color => "color",
        })
    }
}

/// Errors raised while resolving feed records to canonical identities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Unknown stop prefix, unmapped route code, or out-of-range value.
    /// Always fatal.
    #[error("unresolved {kind} identifier {input:?}: {reason}")]
    UnresolvedIdentifier {
        kind: IdentifierKind,
        input: String,
        reason: &'static str,
    },

    /// No rule canonicalizes this headsign pair. Always fatal.
    #[error("cannot merge headsigns {first:?} and {second:?} on route {route}")]
    AmbiguousMerge {
        route: RouteId,
        first: String,
        second: String,
    },

    /// No long-name or color rule matched. Fatal in strict mode only.
    #[error("no {kind} rule for route {input:?}")]
    UnresolvedClassification {
        kind: ClassificationKind,
        input: String,
    },

    /// A trip on a direction-split route matched zero or both anchor sequences.
    #[error("trip {trip_id:?} on route {route} matches {matched} anchor sequences, expected exactly 1")]
    UnassignableTrip {
        route: RouteId,
        trip_id: String,
        matched: usize,
    },
}

impl ResolveError {
    pub(crate) fn stop(input: impl Into<String>, reason: &'static str) -> Self {
        ResolveError::UnresolvedIdentifier {
            kind: IdentifierKind::Stop,
            input: input.into(),
            reason,
        }
    }

    pub(crate) fn route(input: impl Into<String>, reason: &'static str) -> Self {
        ResolveError::UnresolvedIdentifier {
            kind: IdentifierKind::Route,
            input: input.into(),
            reason,
        }
    }
}
