//! Touchpoint types and phase instructions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// The touchpoint a unit is handled by (e.g. the OSGi touchpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchpointType {
    pub id: String,
    pub version: Version,
}

impl TouchpointType {
    pub fn osgi() -> Self {
        TouchpointType {
            id: "org.eclipse.equinox.p2.osgi".to_string(),
            version: Version::new(1, 0, 0),
        }
    }

    pub fn native() -> Self {
        TouchpointType {
            id: "org.eclipse.equinox.p2.native".to_string(),
            version: Version::new(1, 0, 0),
        }
    }
}

/// Phase-keyed instruction strings (`configure`, `unconfigure`, `install`,
/// `uninstall`, ...). Each instruction is a `;`-separated sequence of
/// touchpoint action invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchpointData {
    instructions: BTreeMap<String, String>,
}

impl TouchpointData {
    pub fn new() -> Self {
        TouchpointData::default()
    }

    /// Merge an instruction into a phase. An existing instruction for the
    /// phase is kept and the new one appended after it.
    pub fn add_instruction(&mut self, phase: &str, instruction: &str) {
        let instruction = instruction.trim().trim_end_matches(';');
        if instruction.is_empty() {
            return;
        }
        match self.instructions.get_mut(phase) {
            Some(existing) if !existing.is_empty() => {
                existing.push(';');
                existing.push_str(instruction);
            }
            _ => {
                self.instructions
                    .insert(phase.to_string(), instruction.to_string());
            }
        }
    }

    /// Merge another data block phase by phase.
    pub fn merge(&mut self, other: &TouchpointData) {
        for (phase, instruction) in &other.instructions {
            self.add_instruction(phase, instruction);
        }
    }

    pub fn instruction(&self, phase: &str) -> Option<&str> {
        self.instructions.get(phase).map(String::as_str)
    }

    pub fn phases(&self) -> impl Iterator<Item = &str> {
        self.instructions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_instruction_merges_by_phase() {
        let mut data = TouchpointData::new();
        data.add_instruction("configure", "setStartLevel(startLevel:2)");
        data.add_instruction("configure", "markStarted(started:true)");
        assert_eq!(
            data.instruction("configure"),
            Some("setStartLevel(startLevel:2);markStarted(started:true)")
        );
    }

    #[test]
    fn test_trailing_semicolons_are_normalized() {
        let mut data = TouchpointData::new();
        data.add_instruction("install", "installBundle(bundle:@artifact);");
        data.add_instruction("install", "setStartLevel(startLevel:1);");
        assert_eq!(
            data.instruction("install"),
            Some("installBundle(bundle:@artifact);setStartLevel(startLevel:1)")
        );
    }

    #[test]
    fn test_merge_keeps_unrelated_phases() {
        let mut a = TouchpointData::new();
        a.add_instruction("install", "mkdir(path:x)");
        let mut b = TouchpointData::new();
        b.add_instruction("uninstall", "rmdir(path:x)");
        a.merge(&b);
        assert_eq!(a.phases().count(), 2);
    }

    #[test]
    fn test_empty_instruction_is_dropped() {
        let mut data = TouchpointData::new();
        data.add_instruction("configure", "   ");
        assert!(data.is_empty());
    }
}
