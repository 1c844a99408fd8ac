//! Row and column identifiers.
//!
//! Content JSON usually carries numeric ids (`"rowId": 1`), while ids
//! typed on the command line or echoed back from rendered cells are
//! strings (`"1"`). Both sides are normalized to one canonical form when
//! the id is built, so comparison is plain string equality afterwards.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::fmt;

/// Canonical row/column identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ItemId(String);

impl ItemId {
    /// Build an id from free text (trimmed, numeric text canonicalized)
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(integer) = canonical_integer(trimmed) {
            return Self(integer);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && !trimmed.is_empty() => Self::from_f64(n),
            _ => Self(trimmed.to_string()),
        }
    }

    /// Build an id from a floating point number.
    ///
    /// Integral values drop the fractional part (`2.0` -> `"2"`), so they
    /// match ids written as integers elsewhere.
    pub fn from_f64(n: f64) -> Self {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
            Self((n as i64).to_string())
        } else {
            Self(n.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Integer text with sign and leading zeros normalized, every digit kept
/// (`"+007"` -> `"7"`, `"-0"` -> `"0"`). None for anything else.
fn canonical_integer(s: &str) -> Option<String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (digits.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{}", digits),
        (false, false) => digits.to_string(),
    })
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&String> for ItemId {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}

impl From<&ItemId> for ItemId {
    fn from(id: &ItemId) -> Self {
        id.clone()
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl From<usize> for ItemId {
    fn from(n: usize) -> Self {
        Self(n.to_string())
    }
}

struct ItemIdVisitor;

impl<'de> Visitor<'de> for ItemIdVisitor {
    type Value = ItemId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric or string identifier")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemId, E> {
        Ok(ItemId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemId, E> {
        Ok(ItemId(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ItemId, E> {
        Ok(ItemId::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemId, E> {
        Ok(ItemId::parse(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ItemId, E> {
        Ok(ItemId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ItemIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_forms_match() {
        assert_eq!(ItemId::from(2i64), ItemId::from("2"));
        assert_eq!(ItemId::from(" 2 "), ItemId::from(2u32));
        assert_eq!(ItemId::from_f64(2.0), ItemId::from("2"));
        assert_eq!(ItemId::from("2.0"), ItemId::from(2i64));
    }

    #[test]
    fn test_non_numeric_kept_trimmed() {
        assert_eq!(ItemId::from("  level-a ").as_str(), "level-a");
        assert_ne!(ItemId::from("a"), ItemId::from("A"));
        assert_eq!(ItemId::from("NaN").as_str(), "NaN");
        assert_eq!(ItemId::from("").as_str(), "");
    }

    #[test]
    fn test_long_integer_text_keeps_every_digit() {
        let a = ItemId::from("10000000000000001");
        let b = ItemId::from("10000000000000000");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "10000000000000001");
        assert_eq!(
            ItemId::from("123456789012345678901234567890").as_str(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_integer_text_sign_and_zeros() {
        assert_eq!(ItemId::from("007").as_str(), "7");
        assert_eq!(ItemId::from("+7"), ItemId::from(7i64));
        assert_eq!(ItemId::from("-07").as_str(), "-7");
        assert_eq!(ItemId::from("-0").as_str(), "0");
        assert_eq!(ItemId::from("000").as_str(), "0");
        assert_eq!(ItemId::from("-").as_str(), "-");
    }

    #[test]
    fn test_fractional_numbers() {
        assert_eq!(ItemId::from_f64(1.5).as_str(), "1.5");
        assert_eq!(ItemId::from("1.50"), ItemId::from_f64(1.5));
    }

    #[test]
    fn test_deserialize_from_json() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[1, "1", 1.0, "x", true]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);
        assert_eq!(ids[3].as_str(), "x");
        assert_eq!(ids[4].as_str(), "true");
    }
}
