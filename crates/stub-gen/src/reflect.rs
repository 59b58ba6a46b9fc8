//! The reflected-module snapshot contract.
//!
//! The host binding module exposes no static type metadata, so a trivial
//! dump script running inside the host's embedded interpreter serializes
//! the module's object graph to JSON: every member tagged with a closed
//! category set, functions carrying their self-describing signature
//! docstrings verbatim. Unknown categories deserialize to `Unknown` and
//! are skipped by the extractor — never a crash.

use serde::Deserialize;

use crate::error::{Result, StubError};

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedModule {
    pub name: String,
    #[serde(default)]
    pub members: Vec<ReflectedMember>,
}

impl ReflectedModule {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StubError::Snapshot(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReflectedMember {
    Function(ReflectedFunction),
    Class(ReflectedClass),
    Enum(ReflectedEnum),
    Property(ReflectedProperty),
    #[serde(other)]
    Unknown,
}

impl ReflectedMember {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(f) => Some(&f.name),
            Self::Class(c) => Some(&c.name),
            Self::Enum(e) => Some(&e.name),
            Self::Property(p) => Some(&p.name),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedFunction {
    pub name: String,
    /// The signature-grammar docstring. Absent means the function
    /// contributes zero overloads.
    #[serde(default)]
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedClass {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub members: Vec<ReflectedMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ReflectedEnumValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedEnumValue {
    pub name: String,
    /// Native ordinal.
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectedProperty {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub docstring: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_roundtrip() {
        let json = r#"{
            "name": "pyfbsdk",
            "members": [
                {"kind": "function", "name": "FBSystem", "docstring": "FBSystem() -> FBSystem"},
                {"kind": "class", "name": "FBModel", "parents": ["FBBox"], "members": [
                    {"kind": "property", "name": "Show", "type": "bool"}
                ]},
                {"kind": "enum", "name": "FBPlayMode", "values": [
                    {"name": "kPlayModeLoop", "value": 0},
                    {"name": "kPlayModeOnce", "value": 1}
                ]}
            ]
        }"#;
        let module = ReflectedModule::from_json(json).unwrap();
        assert_eq!(module.name, "pyfbsdk");
        assert_eq!(module.members.len(), 3);
        assert_eq!(module.members[0].name(), Some("FBSystem"));
        match &module.members[2] {
            ReflectedMember::Enum(e) => {
                assert_eq!(e.values[1].name, "kPlayModeOnce");
                assert_eq!(e.values[1].value, 1);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_degrades() {
        let json = r#"{
            "name": "pyfbsdk",
            "members": [{"kind": "descriptor", "name": "weird"}]
        }"#;
        let module = ReflectedModule::from_json(json).unwrap();
        assert!(matches!(module.members[0], ReflectedMember::Unknown));
    }

    #[test]
    fn test_invalid_snapshot_is_an_error() {
        let err = ReflectedModule::from_json("not json").unwrap_err();
        assert!(matches!(err, StubError::Snapshot(_)));
    }
}
