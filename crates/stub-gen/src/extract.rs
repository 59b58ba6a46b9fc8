//! The reflective extractor: snapshot -> provisional stub model.
//!
//! Walks the reflected member graph in snapshot order and produces the
//! three top-level sequences (enum types, classes, free functions). Any
//! member that fails to classify is logged and skipped — extraction is
//! never fatal for a single member.

use indexmap::IndexMap;

use crate::model::{
    ENUM_BASE, FunctionGroup, ModuleModel, StubClass, StubFunction, StubParameter, StubProperty,
};
use crate::reflect::{ReflectedClass, ReflectedEnum, ReflectedFunction, ReflectedMember, ReflectedModule};
use crate::signature::parse_signature_docstring;

/// Names kept even when the immediate parent also has them: the
/// constructor, index access, and the property wrappers' data accessor.
pub const KEEP_ALWAYS: &[&str] = &["__init__", "__getitem__", "Data"];

pub fn extract_module(module: &ReflectedModule) -> ModuleModel {
    let class_index: IndexMap<&str, &ReflectedClass> = module
        .members
        .iter()
        .filter_map(|m| match m {
            ReflectedMember::Class(c) => Some((c.name.as_str(), c)),
            _ => None,
        })
        .collect();

    let mut model = ModuleModel {
        name: module.name.clone(),
        ..Default::default()
    };

    for member in &module.members {
        match member {
            ReflectedMember::Enum(e) => {
                if is_private(&e.name) {
                    continue;
                }
                model.enums.push(enum_class(e));
            }
            ReflectedMember::Class(c) => {
                if is_private(&c.name) {
                    continue;
                }
                model.classes.push(extract_class(c, &class_index));
            }
            ReflectedMember::Function(f) => {
                if is_private(&f.name) {
                    continue;
                }
                match function_group(f, false) {
                    Some(group) => merge_group(&mut model.functions, group),
                    None => {
                        tracing::debug!(function = %f.name, "no parseable signature, skipping");
                    }
                }
            }
            ReflectedMember::Property(p) => {
                tracing::debug!(name = %p.name, "skipping module-level property");
            }
            ReflectedMember::Unknown => {
                tracing::debug!("skipping member of unknown category");
            }
        }
    }

    model
}

/// An enum type, emitted as a class under the synthetic `Enumeration` base.
/// Every member is a property typed as the enum's own name; the enum
/// normalizer plugin later rewrites these to int literals.
fn enum_class(reflected: &ReflectedEnum) -> StubClass {
    let mut class = StubClass::new(&reflected.name);
    class.parents.push(ENUM_BASE.to_string());
    for value in &reflected.values {
        let mut prop = StubProperty::new(&value.name, Some(reflected.name.clone()));
        prop.value = Some(value.value.to_string());
        class.properties.push(prop);
    }
    class
}

fn extract_class(
    reflected: &ReflectedClass,
    class_index: &IndexMap<&str, &ReflectedClass>,
) -> StubClass {
    let mut class = StubClass::new(&reflected.name);
    class.parents = reflected.parents.clone();

    // Class-own members of the immediate parent; used to keep only
    // overrides and new members.
    let parent_members: Vec<&str> = reflected
        .parents
        .first()
        .and_then(|p| class_index.get(p.as_str()))
        .map(|parent| {
            parent
                .members
                .iter()
                .filter_map(ReflectedMember::name)
                .collect()
        })
        .unwrap_or_default();

    for member in &reflected.members {
        let Some(name) = member.name() else {
            tracing::debug!(class = %reflected.name, "skipping class member of unknown category");
            continue;
        };
        if is_private(name) {
            continue;
        }
        if parent_members.contains(&name) && !KEEP_ALWAYS.contains(&name) {
            continue;
        }

        match member {
            ReflectedMember::Property(p) => {
                let mut prop = StubProperty::new(&p.name, p.type_name.clone());
                prop.doc = p.docstring.clone().unwrap_or_default();
                class.properties.push(prop);
            }
            ReflectedMember::Function(f) => {
                if let Some(group) = function_group(f, true) {
                    merge_group(&mut class.groups, group);
                } else {
                    tracing::debug!(
                        class = %reflected.name,
                        method = %f.name,
                        "no parseable signature, skipping"
                    );
                }
            }
            ReflectedMember::Enum(e) => class.nested_enums.push(enum_class(e)),
            ReflectedMember::Class(inner) => {
                class.nested_enums.push(extract_class(inner, class_index));
            }
            ReflectedMember::Unknown => {}
        }
    }

    class
}

fn function_group(reflected: &ReflectedFunction, is_method: bool) -> Option<FunctionGroup> {
    let mut overloads = parse_signature_docstring(&reflected.name, reflected.docstring.as_deref());
    if overloads.is_empty() {
        return None;
    }
    if is_method {
        for overload in &mut overloads {
            make_method(overload);
        }
    }
    let mut group = FunctionGroup::new(&reflected.name);
    group.overloads = overloads;
    Some(group)
}

/// Rebind the first signature parameter as the instance. The binding's
/// signature strings spell it as an opaque `(object)arg1`.
fn make_method(function: &mut StubFunction) {
    function.is_method = true;
    match function.parameters.first_mut() {
        Some(first) => *first = StubParameter::instance(),
        None => function.parameters.insert(0, StubParameter::instance()),
    }
}

fn merge_group(groups: &mut Vec<FunctionGroup>, group: FunctionGroup) {
    match groups.iter_mut().find(|g| g.name == group.name) {
        Some(existing) => existing.overloads.extend(group.overloads),
        None => groups.push(group),
    }
}

/// Leading-underscore names are private, except dunders — those carry
/// protocol semantics the stub must keep.
fn is_private(name: &str) -> bool {
    name.starts_with('_') && !(name.len() > 4 && name.starts_with("__") && name.ends_with("__"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamDefault;
    use crate::reflect::ReflectedModule;

    fn module(json: &str) -> ModuleModel {
        extract_module(&ReflectedModule::from_json(json).unwrap())
    }

    #[test]
    fn test_private_names_excluded_dunders_kept() {
        assert!(is_private("_internal"));
        assert!(is_private("__cached"));
        assert!(!is_private("__init__"));
        assert!(!is_private("__getitem__"));
        assert!(!is_private("Show"));
    }

    #[test]
    fn test_enum_synthesis() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "enum", "name": "FBPlayMode", "values": [
                    {"name": "kPlayModeLoop", "value": 0},
                    {"name": "kPlayModeOnce", "value": 1}
                ]}
            ]}"#,
        );
        assert_eq!(model.enums.len(), 1);
        let e = &model.enums[0];
        assert_eq!(e.parents, vec![ENUM_BASE.to_string()]);
        assert_eq!(e.properties.len(), 2);
        assert_eq!(e.properties[0].type_name.as_deref(), Some("FBPlayMode"));
        assert_eq!(e.properties[0].value.as_deref(), Some("0"));
        assert_eq!(e.properties[1].value.as_deref(), Some("1"));
    }

    #[test]
    fn test_parent_diff_keeps_only_unique_members() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "class", "name": "FBBox", "members": [
                    {"kind": "property", "name": "Name", "type": "str"},
                    {"kind": "function", "name": "__init__", "docstring": "__init__( (object)arg1) -> None"}
                ]},
                {"kind": "class", "name": "FBModel", "parents": ["FBBox"], "members": [
                    {"kind": "property", "name": "Name", "type": "str"},
                    {"kind": "property", "name": "Show", "type": "bool"},
                    {"kind": "function", "name": "__init__", "docstring": "__init__( (object)arg1, (str)pName) -> None"}
                ]}
            ]}"#,
        );
        let fbmodel = &model.classes[1];
        // "Name" shadows the parent and is dropped; "Show" is unique;
        // "__init__" survives via the allow-list.
        assert!(fbmodel.property("Name").is_none());
        assert!(fbmodel.property("Show").is_some());
        assert!(fbmodel.group("__init__").is_some());
    }

    #[test]
    fn test_methods_get_instance_parameter() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "class", "name": "FBModel", "members": [
                    {"kind": "function", "name": "Pick", "docstring": "Pick( (object)arg1, (int)pIndex) -> bool"}
                ]}
            ]}"#,
        );
        let pick = &model.classes[0].group("Pick").unwrap().overloads[0];
        assert!(pick.is_method);
        assert_eq!(pick.parameters[0].name, "self");
        assert_eq!(pick.parameters[0].type_name, None);
        assert_eq!(pick.real_parameters().len(), 1);
        assert_eq!(pick.real_parameters()[0].name, "pIndex");
    }

    #[test]
    fn test_function_without_docstring_skipped() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "function", "name": "Mystery"},
                {"kind": "function", "name": "FBSystem", "docstring": "FBSystem() -> FBSystem"}
            ]}"#,
        );
        assert_eq!(model.functions.len(), 1);
        assert_eq!(model.functions[0].name, "FBSystem");
    }

    #[test]
    fn test_multi_line_docstring_builds_overload_group() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "class", "name": "FBModel", "members": [
                    {"kind": "function", "name": "Pick",
                     "docstring": "Pick( (object)arg1, (int)pIndex) -> bool\nPick( (object)arg1, (str)pName) -> bool"}
                ]}
            ]}"#,
        );
        let group = model.classes[0].group("Pick").unwrap();
        assert!(group.is_overloaded());
        assert_eq!(group.overloads.len(), 2);
    }

    #[test]
    fn test_optional_params_carry_sentinel() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "function", "name": "Make",
                 "docstring": "Make( (str)pName [, (bool)pShow]) -> FBModel"}
            ]}"#,
        );
        let f = &model.functions[0].overloads[0];
        assert_eq!(f.parameters[0].default, ParamDefault::Required);
        assert_eq!(f.parameters[1].default, ParamDefault::Unspecified);
    }

    #[test]
    fn test_nested_enum_becomes_inner_class() {
        let model = module(
            r#"{"name": "pyfbsdk", "members": [
                {"kind": "class", "name": "FBCamera", "members": [
                    {"kind": "enum", "name": "EViewType", "values": [{"name": "kPerspective", "value": 0}]}
                ]}
            ]}"#,
        );
        let camera = &model.classes[0];
        assert_eq!(camera.nested_enums.len(), 1);
        assert_eq!(camera.nested_enums[0].parents, vec![ENUM_BASE.to_string()]);
    }
}
