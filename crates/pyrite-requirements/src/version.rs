use crate::{RequirementError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted release version, compared numerically component by component.
///
/// Missing trailing components count as zero, so `1.0` equals `1.0.0` and
/// `1.2.10` orders after `1.2.9`. The original text is kept for display.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    raw: String,
}

impl Version {
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn padded(&self, len: usize) -> impl Iterator<Item = u64> + '_ {
        self.parts.iter().copied().chain(std::iter::repeat(0)).take(len)
    }
}

impl FromStr for Version {
    type Err = RequirementError;

    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RequirementError::InvalidVersion(text.to_string()));
        }
        let parts = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| RequirementError::InvalidVersion(text.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;
        Ok(Version {
            parts,
            raw: trimmed.to_string(),
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        self.padded(len).cmp(other.padded(len))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        text.parse().unwrap()
    }

    #[test]
    fn components_compare_numerically() {
        assert!(v("1.2.10") > v("1.2.9"));
        assert!(v("2.0") > v("1.99.99"));
        assert!(v("0.10") > v("0.9"));
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert!(v("1.0.1") > v("1.0"));
    }

    #[test]
    fn display_keeps_the_source_text() {
        assert_eq!(v("1.20.0").to_string(), "1.20.0");
        assert_eq!(v(" 1.2 ").to_string(), "1.2");
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert!(matches!(
            "1.2.3b1".parse::<Version>(),
            Err(RequirementError::InvalidVersion(_))
        ));
        assert!("".parse::<Version>().is_err());
        assert!("1..2".parse::<Version>().is_err());
    }
}
