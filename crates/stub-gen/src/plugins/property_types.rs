//! Property-wrapper translation.
//!
//! The native SDK exposes class attributes through `FBProperty*` wrapper
//! objects. Reading a plain (non-animatable) wrapper yields the underlying
//! Python value directly, so those properties are retyped to the underlying
//! type. Animatable wrappers stay wrapper-typed on read but accept the
//! underlying value on assignment, which becomes a union setter type.
//! The wrapper classes themselves get a matching `Data` attribute type.

use crate::error::Result;
use crate::model::StubClass;
use crate::plugins::{Plugin, PluginContext};

pub struct PropertyTypes;

impl Plugin for PropertyTypes {
    fn name(&self) -> &'static str {
        "property-types"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn patch_class(&self, ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        if let Some(underlying) = underlying_type(&class.name, ctx)
            && let Some(data) = class.property_mut("Data")
        {
            data.type_name = Some(underlying);
        }

        for prop in &mut class.properties {
            let Some(wrapper) = prop.type_name.clone() else {
                continue;
            };
            let Some(underlying) = underlying_type(&wrapper, ctx) else {
                continue;
            };
            if wrapper.starts_with("FBPropertyAnimatable") {
                prop.setter_type = Some(format!("{underlying} | {wrapper}"));
            } else {
                prop.type_name = Some(underlying);
            }
        }
        Ok(())
    }
}

/// The Python-side value type behind a wrapper class name, if the name
/// follows the `FBProperty[Animatable]<Kind>` convention. List wrappers are
/// a different shape and handled by their own pass.
fn underlying_type(wrapper: &str, ctx: &PluginContext) -> Option<String> {
    let rest = wrapper.strip_prefix("FBProperty")?;
    if rest.starts_with("List") {
        return None;
    }
    let kind = rest.strip_prefix("Animatable").unwrap_or(rest);
    let builtin = match kind {
        "Bool" => "bool",
        "Int" | "Int64" | "UInt64" | "Enum" => "int",
        "Double" | "Float" => "float",
        "String" => "str",
        _ => "",
    };
    if !builtin.is_empty() {
        return Some(builtin.to_string());
    }
    let class_name = format!("FB{kind}");
    if ctx.class_names.contains(&class_name) {
        Some(class_name)
    } else {
        None
    }
}
