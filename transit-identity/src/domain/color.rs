//! Route color type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {reason}")]
pub struct InvalidHexColor {
    reason: &'static str,
}

/// A 6-hex-digit RGB color, without a leading `#`.
///
/// Digits are normalized to uppercase on parse, so two colors that differ
/// only in case compare equal.
///
/// # Examples
///
/// ```
/// use transit_identity::domain::HexColor;
///
/// let red = HexColor::parse("b31b18").unwrap();
/// assert_eq!(red.as_str(), "B31B18");
///
/// assert!(HexColor::parse("#B31B18").is_err());
/// assert!(HexColor::parse("B31B1").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 6]);

impl HexColor {
    /// Parse a color from exactly six ASCII hex digits.
    pub fn parse(s: &str) -> Result<Self, InvalidHexColor> {
        let bytes = s.as_bytes();

        if bytes.len() != 6 {
            return Err(InvalidHexColor {
                reason: "must be exactly 6 characters",
            });
        }

        let mut out = [0u8; 6];
        for (slot, &b) in out.iter_mut().zip(bytes) {
            if !b.is_ascii_hexdigit() {
                return Err(InvalidHexColor {
                    reason: "must be hex digits 0-9 or A-F",
                });
            }
            *slot = b.to_ascii_uppercase();
        }

        Ok(HexColor(out))
    }

    /// Returns the color as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store ASCII hex digits
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexColor({})", self.as_str())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
