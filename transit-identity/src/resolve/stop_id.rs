//! Canonical stop id synthesis.

use tracing::trace;

use crate::domain::{RawStop, ResolveError, StopId};
use crate::rules::{BAND_WIDTH, RuleTables};

/// Converts raw stop records into canonical integer stop ids.
///
/// Resolution order:
/// 1. An all-digit rider-facing stop code is used as-is.
/// 2. A raw id listed as a stop exception maps to its fixed id.
/// 3. Otherwise the first run of digits in the raw id is added to the
///    offset of the first prefix band whose prefix the raw id starts with.
///
/// # Examples
///
/// ```
/// use transit_identity::resolve::StopIdResolver;
/// use transit_identity::rules::{FeedRevision, RuleTables};
///
/// let rules = RuleTables::builtin(FeedRevision::Current).unwrap();
/// let resolver = StopIdResolver::new(&rules);
///
/// assert_eq!(resolver.resolve(Some("3011"), "AA010").unwrap().get(), 3011);
/// assert_eq!(resolver.resolve(None, "EE1234").unwrap().get(), 101_234);
/// assert!(resolver.resolve(None, "ZZ9").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StopIdResolver<'a> {
    rules: &'a RuleTables,
}

impl<'a> StopIdResolver<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// Resolve a stop from its optional stop code and its raw id.
    pub fn resolve(&self, code: Option<&str>, raw_id: &str) -> Result<StopId, ResolveError> {
        if let Some(code) = code.filter(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit())) {
            let id = code
                .parse::<u32>()
                .map_err(|_| ResolveError::stop(code, "stop code out of range"))?;
            return Ok(StopId::new(id));
        }

        if let Some(id) = self.rules.stop_exception(raw_id) {
            trace!(raw_id, %id, "Stop exception");
            return Ok(id);
        }

        let digits = leading_digit_run(raw_id)
            .ok_or_else(|| ResolveError::stop(raw_id, "no digits in raw stop id"))?;
        let suffix = digits
            .parse::<u32>()
            .ok()
            .filter(|&n| n < BAND_WIDTH)
            .ok_or_else(|| ResolveError::stop(raw_id, "numeric suffix does not fit in a band"))?;

        let band = self
            .rules
            .stop_bands()
            .iter()
            .find(|b| raw_id.starts_with(b.prefix()))
            .ok_or_else(|| ResolveError::stop(raw_id, "unknown stop prefix"))?;

        let id = StopId::new(band.offset() + suffix);
        trace!(raw_id, prefix = band.prefix(), %id, "Synthesized stop id");
        Ok(id)
    }

    /// Resolve a feed stop record.
    pub fn resolve_stop(&self, stop: &RawStop) -> Result<StopId, ResolveError> {
        self.resolve(stop.code.as_deref(), &stop.raw_id)
    }
}

/// The first run of ASCII digits anywhere in `s`.
fn leading_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
