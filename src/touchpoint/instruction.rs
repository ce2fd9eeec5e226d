//! Touchpoint instruction parsing
//!
//! An instruction is a `;`-separated sequence of action invocations in the
//! form `actionId(param:value,param:value)`. Values run to the next `,` or
//! the closing `)`; parameter tokens like `@artifact` pass through
//! untouched and are resolved later against the operand.

use std::collections::BTreeMap;

use crate::error::{ProvisorError, Result};

/// One parsed action invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub action_id: String,
    pub params: BTreeMap<String, String>,
}

/// Parse a full instruction into its invocations.
pub fn parse(instruction: &str) -> Result<Vec<Invocation>> {
    let invalid = |reason: String| ProvisorError::ActionFailed {
        action: "parse".to_string(),
        message: format!("malformed instruction '{instruction}': {reason}"),
    };

    let mut invocations = Vec::new();
    for piece in instruction.split(';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let open = piece
            .find('(')
            .ok_or_else(|| invalid(format!("missing '(' in '{piece}'")))?;
        if !piece.ends_with(')') {
            return Err(invalid(format!("missing ')' in '{piece}'")));
        }
        let action_id = piece[..open].trim();
        if action_id.is_empty() {
            return Err(invalid(format!("missing action id in '{piece}'")));
        }
        let body = &piece[open + 1..piece.len() - 1];

        let mut params = BTreeMap::new();
        for pair in body.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .split_once(':')
                .ok_or_else(|| invalid(format!("parameter '{pair}' has no ':'")))?;
            params.insert(key.trim().to_string(), value.trim().to_string());
        }
        invocations.push(Invocation {
            action_id: action_id.to_string(),
            params,
        });
    }
    Ok(invocations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_invocation() {
        let parsed = parse("setStartLevel(startLevel:2)").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].action_id, "setStartLevel");
        assert_eq!(parsed[0].params.get("startLevel").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_parse_sequence() {
        let parsed =
            parse("installBundle(bundle:@artifact);setStartLevel(startLevel:2);markStarted(started:true);")
                .unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].params.get("bundle").map(String::as_str), Some("@artifact"));
    }

    #[test]
    fn test_parse_multiple_params() {
        let parsed = parse("setProgramProperty(propName:eclipse.ignoreApp,propValue:true)").unwrap();
        let params = &parsed[0].params;
        assert_eq!(params.get("propName").map(String::as_str), Some("eclipse.ignoreApp"));
        assert_eq!(params.get("propValue").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let parsed = parse("setProgramProperty(propName:key,propValue:)").unwrap();
        assert_eq!(parsed[0].params.get("propValue").map(String::as_str), Some(""));
    }

    #[test]
    fn test_no_params() {
        let parsed = parse("mkdir()").unwrap();
        assert!(parsed[0].params.is_empty());
    }

    #[test]
    fn test_malformed_inputs_fail() {
        assert!(parse("setStartLevel startLevel:2").is_err());
        assert!(parse("setStartLevel(startLevel:2").is_err());
        assert!(parse("(startLevel:2)").is_err());
        assert!(parse("mkdir(pathonly)").is_err());
    }

    #[test]
    fn test_empty_instruction_yields_nothing() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  ;  ; ").unwrap().is_empty());
    }
}
