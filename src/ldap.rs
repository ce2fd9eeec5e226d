//! LDAP-style boolean filters over platform properties
//!
//! Installable units and requirements scope themselves to platforms with
//! filters like `(&(osgi.os=linux)(|(osgi.arch=x86)(osgi.arch=x86_64)))`.
//! This module builds those from feature entry selectors and evaluates them
//! against a property map.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisorError, Result};

/// A parsed LDAP filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Filter {
    Eq(String, String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Equality term `(key=value)`.
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(key.into(), value.into())
    }

    /// Conjunction, flattened: zero terms is no filter (callers drop it),
    /// one term is the term itself.
    pub fn and(mut terms: Vec<Filter>) -> Option<Filter> {
        match terms.len() {
            0 => None,
            1 => Some(terms.remove(0)),
            _ => Some(Filter::And(terms)),
        }
    }

    /// Disjunction, flattened like [`Filter::and`].
    pub fn or(mut terms: Vec<Filter>) -> Option<Filter> {
        match terms.len() {
            0 => None,
            1 => Some(terms.remove(0)),
            _ => Some(Filter::Or(terms)),
        }
    }

    /// Compile feature entry selectors into a filter: comma-separated values
    /// within one axis are ORed, the axes are ANDed. Empty axes contribute
    /// nothing; all-empty selectors produce no filter.
    pub fn from_selectors(
        os: Option<&str>,
        ws: Option<&str>,
        arch: Option<&str>,
        nl: Option<&str>,
    ) -> Option<Filter> {
        let axes = [
            ("osgi.os", os),
            ("osgi.ws", ws),
            ("osgi.arch", arch),
            ("osgi.nl", nl),
        ];
        let mut terms = Vec::new();
        for (key, selector) in axes {
            let Some(selector) = selector.filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            let values: Vec<Filter> = selector
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| Filter::eq(key, v))
                .collect();
            if let Some(axis) = Filter::or(values) {
                terms.push(axis);
            }
        }
        Filter::and(terms)
    }

    /// Evaluate against a property map. Missing keys fail equality terms.
    pub fn matches(&self, properties: &HashMap<String, String>) -> bool {
        match self {
            Filter::Eq(key, value) => properties.get(key).is_some_and(|v| v == value),
            Filter::And(terms) => terms.iter().all(|t| t.matches(properties)),
            Filter::Or(terms) => terms.iter().any(|t| t.matches(properties)),
            Filter::Not(term) => !term.matches(properties),
        }
    }

    pub fn parse(input: &str) -> Result<Filter> {
        let mut parser = Parser {
            input,
            chars: input.char_indices().peekable(),
        };
        let filter = parser.parse_filter()?;
        parser.skip_whitespace();
        if parser.chars.next().is_some() {
            return Err(parser.invalid("trailing characters after filter"));
        }
        Ok(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Eq(key, value) => write!(f, "({key}={value})"),
            Filter::And(terms) => {
                write!(f, "(&")?;
                for term in terms {
                    write!(f, "{term}")?;
                }
                write!(f, ")")
            }
            Filter::Or(terms) => {
                write!(f, "(|")?;
                for term in terms {
                    write!(f, "{term}")?;
                }
                write!(f, ")")
            }
            Filter::Not(term) => write!(f, "(!{term})"),
        }
    }
}

impl TryFrom<String> for Filter {
    type Error = ProvisorError;

    fn try_from(value: String) -> Result<Self> {
        Filter::parse(&value)
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> String {
        filter.to_string()
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn invalid(&self, reason: &str) -> ProvisorError {
        ProvisorError::InvalidFilter {
            input: self.input.to_string(),
            reason: reason.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            _ => Err(self.invalid(&format!("expected '{expected}'"))),
        }
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        self.expect('(')?;
        self.skip_whitespace();
        let filter = match self.chars.peek() {
            Some((_, '&')) => {
                self.chars.next();
                Filter::And(self.parse_operands()?)
            }
            Some((_, '|')) => {
                self.chars.next();
                Filter::Or(self.parse_operands()?)
            }
            Some((_, '!')) => {
                self.chars.next();
                Filter::Not(Box::new(self.parse_filter()?))
            }
            Some(_) => self.parse_equality()?,
            None => return Err(self.invalid("unterminated filter")),
        };
        self.expect(')')?;
        Ok(filter)
    }

    fn parse_operands(&mut self) -> Result<Vec<Filter>> {
        let mut operands = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                Some((_, '(')) => operands.push(self.parse_filter()?),
                _ if operands.is_empty() => {
                    return Err(self.invalid("operator needs at least one operand"));
                }
                _ => return Ok(operands),
            }
        }
    }

    fn parse_equality(&mut self) -> Result<Filter> {
        let mut key = String::new();
        let mut value = String::new();
        let mut in_value = false;
        while let Some((_, c)) = self.chars.peek().copied() {
            match c {
                ')' => break,
                '=' if !in_value => {
                    in_value = true;
                    self.chars.next();
                }
                _ => {
                    if in_value {
                        value.push(c);
                    } else {
                        key.push(c);
                    }
                    self.chars.next();
                }
            }
        }
        if !in_value || key.trim().is_empty() {
            return Err(self.invalid("expected key=value term"));
        }
        Ok(Filter::eq(key.trim(), value.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_selectors_single_axis() {
        let filter = Filter::from_selectors(Some("linux"), None, None, None).unwrap();
        assert_eq!(filter.to_string(), "(osgi.os=linux)");
    }

    #[test]
    fn test_selectors_or_within_axis_and_across_axes() {
        let filter =
            Filter::from_selectors(Some("linux"), None, Some("x86,x86_64"), None).unwrap();
        assert_eq!(
            filter.to_string(),
            "(&(osgi.os=linux)(|(osgi.arch=x86)(osgi.arch=x86_64)))"
        );
        assert!(filter.matches(&props(&[("osgi.os", "linux"), ("osgi.arch", "x86_64")])));
        assert!(!filter.matches(&props(&[("osgi.os", "linux"), ("osgi.arch", "arm64")])));
        assert!(!filter.matches(&props(&[("osgi.os", "win32"), ("osgi.arch", "x86")])));
    }

    #[test]
    fn test_selectors_all_empty() {
        assert!(Filter::from_selectors(None, None, None, None).is_none());
        assert!(Filter::from_selectors(Some(""), Some("  "), None, None).is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        let text = "(&(osgi.os=linux)(|(osgi.arch=x86)(osgi.arch=x86_64)))";
        let filter = Filter::parse(text).unwrap();
        assert_eq!(filter.to_string(), text);
    }

    #[test]
    fn test_parse_not() {
        let filter = Filter::parse("(!(osgi.os=macosx))").unwrap();
        assert!(filter.matches(&props(&[("osgi.os", "linux")])));
        assert!(!filter.matches(&props(&[("osgi.os", "macosx")])));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Filter::parse("").is_err());
        assert!(Filter::parse("(osgi.os=linux").is_err());
        assert!(Filter::parse("(&)").is_err());
        assert!(Filter::parse("(osgi.os=linux))").is_err());
    }

    #[test]
    fn test_missing_key_fails_equality() {
        let filter = Filter::parse("(osgi.nl=en_US)").unwrap();
        assert!(!filter.matches(&props(&[("osgi.os", "linux")])));
    }
}
