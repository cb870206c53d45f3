// ── MAC address handling ──
//
// Controllers key clients and devices by MAC but are picky about the
// format: lowercase, colon-separated. Callers pass whatever they have
// (colons, dashes, bare hex) and this normalizes it once at the edge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// MAC address, normalized to lowercase colon-separated format (`aa:bb:cc:dd:ee:ff`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    ///
    /// Accepts colon-separated, dash-separated, or bare hex. Bare hex is
    /// re-grouped into colon-separated pairs; anything else is lowercased
    /// with dashes swapped for colons.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lower = raw.as_ref().to_lowercase();
        if lower.len() == 12 && lower.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut grouped = String::with_capacity(17);
            for (i, c) in lower.chars().enumerate() {
                if i > 0 && i % 2 == 0 {
                    grouped.push(':');
                }
                grouped.push(c);
            }
            return Self(grouped);
        }
        Self(lower.replace('-', ":"))
    }

    /// Check whether a string looks like a MAC address in any accepted form.
    ///
    /// Commands use this to decide whether an identifier is a MAC or a
    /// client/device name to search for.
    pub fn looks_like(value: &str) -> bool {
        if value.len() == 12 {
            return value.chars().all(|c| c.is_ascii_hexdigit());
        }
        is_hex_pairs(value, ':') || is_hex_pairs(value, '-')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_hex_pairs(value: &str, sep: char) -> bool {
    let mut pairs = 0;
    for part in value.split(sep) {
        if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }
        pairs += 1;
    }
    pairs == 6
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_normalizes_case() {
        let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_normalizes_dashes() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_normalizes_bare_hex() {
        let mac = MacAddress::new("AABBCCDDEEFF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_already_canonical_is_unchanged() {
        let mac = MacAddress::new("aa:bb:cc:dd:ee:ff");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_from_str() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn looks_like_accepts_all_three_forms() {
        assert!(MacAddress::looks_like("AA:BB:CC:DD:EE:FF"));
        assert!(MacAddress::looks_like("aa-bb-cc-dd-ee-ff"));
        assert!(MacAddress::looks_like("AABBCCDDEEFF"));
    }

    #[test]
    fn looks_like_rejects_names_and_partials() {
        assert!(!MacAddress::looks_like("living-room-ap"));
        assert!(!MacAddress::looks_like("aa:bb:cc:dd:ee"));
        assert!(!MacAddress::looks_like("aa:bb:cc:dd:ee:ff:00"));
        assert!(!MacAddress::looks_like("zz:bb:cc:dd:ee:ff"));
        assert!(!MacAddress::looks_like("aabbccddee"));
    }

    #[test]
    fn mac_serializes_as_plain_string() {
        let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"aa:bb:cc:dd:ee:ff\"");
    }
}
