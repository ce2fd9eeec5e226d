//! OSGi-style versions and version ranges
//!
//! Versions are major.minor.micro with an optional string qualifier.
//! Ranges use the interval notation `[1.0,2.0)`; a bare version parses as
//! the lower-bounded open range `[v, ∞)`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisorError, Result};

/// A major.minor.micro.qualifier version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub qualifier: String,
}

impl Version {
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Version {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| ProvisorError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = input.trim().splitn(4, '.');
        let major = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("empty version"))?
            .parse::<u32>()
            .map_err(|_| invalid("major segment is not a number"))?;
        let minor = match parts.next() {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| invalid("minor segment is not a number"))?,
            None => 0,
        };
        let micro = match parts.next() {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| invalid("micro segment is not a number"))?,
            None => 0,
        };
        let qualifier = parts.next().unwrap_or("").to_string();

        Ok(Version {
            major,
            minor,
            micro,
            qualifier,
        })
    }

    /// Next minor version, used as the exclusive upper bound of an
    /// "equivalent" match.
    pub fn next_minor(&self) -> Version {
        Version::new(self.major, self.minor + 1, 0)
    }

    /// Next major version, used as the exclusive upper bound of a
    /// "compatible" match.
    pub fn next_major(&self) -> Version {
        Version::new(self.major + 1, 0, 0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.micro)
            .cmp(&(other.major, other.minor, other.micro))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifier.is_empty() {
            write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
        } else {
            write!(
                f,
                "{}.{}.{}.{}",
                self.major, self.minor, self.micro, self.qualifier
            )
        }
    }
}

impl FromStr for Version {
    type Err = ProvisorError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = ProvisorError;

    fn try_from(value: String) -> Result<Self> {
        Version::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> String {
        version.to_string()
    }
}

/// Match rule for a feature entry's version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    Perfect,
    Equivalent,
    Compatible,
    GreaterOrEqual,
}

/// A version interval with inclusive or exclusive bounds.
///
/// `max` of `None` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    pub min: Version,
    pub include_min: bool,
    pub max: Option<Version>,
    pub include_max: bool,
}

impl VersionRange {
    /// The range accepting every version, `[0.0.0, ∞)`.
    pub fn any() -> Self {
        VersionRange {
            min: Version::zero(),
            include_min: true,
            max: None,
            include_max: false,
        }
    }

    /// The singleton range `[v, v]`.
    pub fn exact(version: Version) -> Self {
        VersionRange {
            min: version.clone(),
            include_min: true,
            max: Some(version),
            include_max: true,
        }
    }

    /// The open-ended range `[v, ∞)`.
    pub fn at_least(version: Version) -> Self {
        VersionRange {
            min: version,
            include_min: true,
            max: None,
            include_max: false,
        }
    }

    /// Translate a feature entry version plus match rule into a range:
    /// perfect → `[v, v]`, equivalent → `[v, v.minor+1)`,
    /// compatible → `[v, v.major+1)`, greaterOrEqual → `[v, ∞)`.
    pub fn from_match_rule(version: &Version, rule: MatchRule) -> Self {
        match rule {
            MatchRule::Perfect => VersionRange::exact(version.clone()),
            MatchRule::Equivalent => VersionRange {
                min: version.clone(),
                include_min: true,
                max: Some(version.next_minor()),
                include_max: false,
            },
            MatchRule::Compatible => VersionRange {
                min: version.clone(),
                include_min: true,
                max: Some(version.next_major()),
                include_max: false,
            },
            MatchRule::GreaterOrEqual => VersionRange::at_least(version.clone()),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| ProvisorError::InvalidVersionRange {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let first = trimmed.chars().next().ok_or_else(|| invalid("empty range"))?;
        if first != '[' && first != '(' {
            // A bare version is the open range [v, ∞).
            return Ok(VersionRange::at_least(Version::parse(trimmed)?));
        }

        let last = trimmed
            .chars()
            .last()
            .filter(|c| *c == ']' || *c == ')')
            .ok_or_else(|| invalid("interval must close with ']' or ')'"))?;
        let inner = &trimmed[1..trimmed.len() - 1];
        let (lo, hi) = inner
            .split_once(',')
            .ok_or_else(|| invalid("interval must contain ','"))?;

        Ok(VersionRange {
            min: Version::parse(lo)?,
            include_min: first == '[',
            max: Some(Version::parse(hi)?),
            include_max: last == ']',
        })
    }

    pub fn includes(&self, version: &Version) -> bool {
        let above_min = match version.cmp(&self.min) {
            Ordering::Greater => true,
            Ordering::Equal => self.include_min,
            Ordering::Less => false,
        };
        if !above_min {
            return false;
        }
        match &self.max {
            None => true,
            Some(max) => match version.cmp(max) {
                Ordering::Less => true,
                Ordering::Equal => self.include_max,
                Ordering::Greater => false,
            },
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            None if self.min == Version::zero() && self.include_min => write!(f, "0.0.0"),
            None => write!(f, "{}", self.min),
            Some(max) => write!(
                f,
                "{}{},{}{}",
                if self.include_min { '[' } else { '(' },
                self.min,
                max,
                if self.include_max { ']' } else { ')' },
            ),
        }
    }
}

impl TryFrom<String> for VersionRange {
    type Error = ProvisorError;

    fn try_from(value: String) -> Result<Self> {
        VersionRange::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> String {
        range.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let v = Version::parse("1.2.3.v20240101").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.micro, 3);
        assert_eq!(v.qualifier, "v20240101");
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("2.1").unwrap(), Version::new(2, 1, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("a.b.c").is_err());
        assert!(Version::parse("1.x").is_err());
    }

    #[test]
    fn test_ordering_ignores_then_uses_qualifier() {
        assert!(Version::parse("1.2.3").unwrap() < Version::parse("1.2.4").unwrap());
        assert!(Version::parse("1.2.3").unwrap() < Version::parse("1.2.3.a").unwrap());
        assert!(Version::parse("1.2.3.a").unwrap() < Version::parse("1.2.3.b").unwrap());
    }

    #[test]
    fn test_match_rule_compatible() {
        let v = Version::parse("1.2.3").unwrap();
        let range = VersionRange::from_match_rule(&v, MatchRule::Compatible);
        assert_eq!(range.to_string(), "[1.2.3,2.0.0)");
        assert!(range.includes(&Version::parse("1.9.9").unwrap()));
        assert!(!range.includes(&Version::parse("2.0.0").unwrap()));
    }

    #[test]
    fn test_match_rule_equivalent() {
        let v = Version::parse("1.2.3").unwrap();
        let range = VersionRange::from_match_rule(&v, MatchRule::Equivalent);
        assert_eq!(range.to_string(), "[1.2.3,1.3.0)");
        assert!(range.includes(&Version::parse("1.2.9").unwrap()));
        assert!(!range.includes(&Version::parse("1.3.0").unwrap()));
    }

    #[test]
    fn test_match_rule_perfect() {
        let v = Version::parse("1.2.3").unwrap();
        let range = VersionRange::from_match_rule(&v, MatchRule::Perfect);
        assert_eq!(range.to_string(), "[1.2.3,1.2.3]");
        assert!(range.includes(&v));
        assert!(!range.includes(&Version::parse("1.2.4").unwrap()));
    }

    #[test]
    fn test_match_rule_greater_or_equal() {
        let v = Version::parse("1.2.3").unwrap();
        let range = VersionRange::from_match_rule(&v, MatchRule::GreaterOrEqual);
        assert!(range.includes(&Version::parse("99.0.0").unwrap()));
        assert!(!range.includes(&Version::parse("1.2.2").unwrap()));
    }

    #[test]
    fn test_parse_interval() {
        let range = VersionRange::parse("[1.0.0,2.0.0)").unwrap();
        assert!(range.includes(&Version::parse("1.0.0").unwrap()));
        assert!(range.includes(&Version::parse("1.9.9").unwrap()));
        assert!(!range.includes(&Version::parse("2.0.0").unwrap()));
    }

    #[test]
    fn test_parse_bare_version_is_open_range() {
        let range = VersionRange::parse("3.1").unwrap();
        assert!(range.includes(&Version::parse("3.1.0").unwrap()));
        assert!(range.includes(&Version::parse("10.0.0").unwrap()));
        assert!(!range.includes(&Version::parse("3.0.9").unwrap()));
    }

    #[test]
    fn test_exclusive_lower_bound() {
        let range = VersionRange::parse("(1.0.0,2.0.0]").unwrap();
        assert!(!range.includes(&Version::parse("1.0.0").unwrap()));
        assert!(range.includes(&Version::parse("2.0.0").unwrap()));
    }

    #[test]
    fn test_serde_round_trip() {
        let range = VersionRange::parse("[1.2.3,2.0.0)").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"[1.2.3,2.0.0)\"");
        let back: VersionRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
