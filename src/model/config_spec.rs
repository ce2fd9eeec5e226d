//! Platform config specs (ws.os.arch triples)

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisorError, Result};

/// Wildcard segment value matching any queried value.
pub const ANY: &str = "ANY";

/// A ws.os.arch triple identifying a target platform combination.
///
/// Segments may be the wildcard `ANY`, so `win32.ANY.ANY` applies to every
/// win32 windowing-system platform regardless of OS and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigSpec {
    pub ws: String,
    pub os: String,
    pub arch: String,
}

impl ConfigSpec {
    pub fn new(ws: impl Into<String>, os: impl Into<String>, arch: impl Into<String>) -> Self {
        ConfigSpec {
            ws: ws.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The fully wildcarded spec `ANY.ANY.ANY`.
    pub fn any() -> Self {
        ConfigSpec::new(ANY, ANY, ANY)
    }

    /// Parse a `ws.os.arch` triple. One or two segments are padded with
    /// `ANY` on the right, matching how partial specs are written.
    pub fn parse(input: &str) -> Result<Self> {
        let segments: Vec<&str> = input.split('.').collect();
        if segments.len() > 3 || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ProvisorError::InvalidConfigSpec {
                input: input.to_string(),
            });
        }
        let get = |i: usize| segments.get(i).map_or(ANY, |s| s.trim()).to_string();
        Ok(ConfigSpec {
            ws: get(0),
            os: get(1),
            arch: get(2),
        })
    }

    /// Whether this spec (the advice side) applies to a queried spec.
    /// An `ANY` segment on either side matches anything; two concretely
    /// set segments must be equal.
    pub fn matches(&self, query: &ConfigSpec) -> bool {
        segment_matches(&self.ws, &query.ws)
            && segment_matches(&self.os, &query.os)
            && segment_matches(&self.arch, &query.arch)
    }

    /// Environment properties for LDAP filter evaluation.
    pub fn environment(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        for (key, value) in [
            ("osgi.ws", &self.ws),
            ("osgi.os", &self.os),
            ("osgi.arch", &self.arch),
        ] {
            if value != ANY {
                env.insert(key.to_string(), value.clone());
            }
        }
        env
    }
}

impl Default for ConfigSpec {
    fn default() -> Self {
        ConfigSpec::any()
    }
}

fn segment_matches(advice: &str, query: &str) -> bool {
    advice == ANY || query == ANY || advice == query
}

impl fmt::Display for ConfigSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.ws, self.os, self.arch)
    }
}

impl FromStr for ConfigSpec {
    type Err = ProvisorError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigSpec::parse(s)
    }
}

impl TryFrom<String> for ConfigSpec {
    type Error = ProvisorError;

    fn try_from(value: String) -> Result<Self> {
        ConfigSpec::parse(&value)
    }
}

impl From<ConfigSpec> for String {
    fn from(spec: ConfigSpec) -> String {
        spec.to_string()
    }
}
