//! `FBPropertyList*` container classes.
//!
//! A list wrapper named `FBPropertyListModel` holds `FBModel` elements, so
//! its accessors are retyped in element terms: `__getitem__` and `pop`
//! return the element, `append`/`remove`/`insert` take one named after it,
//! and `__setitem__` is dropped because the host rejects item assignment.

use crate::error::Result;
use crate::model::StubClass;
use crate::plugins::{Plugin, PluginContext};

pub struct ListWrappers;

impl Plugin for ListWrappers {
    fn name(&self) -> &'static str {
        "list-wrappers"
    }

    fn priority(&self) -> u32 {
        30
    }

    fn patch_class(&self, ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        let Some(rest) = class.name.strip_prefix("FBPropertyList") else {
            return Ok(());
        };
        let candidate = format!("FB{rest}");
        let element = if ctx.class_names.contains(&candidate) {
            candidate
        } else {
            "object".to_string()
        };

        for name in ["__getitem__", "pop"] {
            if let Some(group) = class.group_mut(name) {
                for overload in &mut group.overloads {
                    overload.return_type = Some(element.clone());
                }
            }
        }

        class.remove_group("__setitem__");

        let param_name = element_param_name(&element);
        for name in ["append", "remove", "insert"] {
            if let Some(group) = class.group_mut(name) {
                for overload in &mut group.overloads {
                    // `insert` takes the index first; the element is the
                    // last real parameter in every case.
                    if let Some(param) = overload.real_parameters_mut().last_mut() {
                        param.name = param_name.clone();
                        param.type_name = Some(element.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

/// `FBModel` -> `model`, unknown element -> `item`.
fn element_param_name(element: &str) -> String {
    if element == "object" {
        return "item".to_string();
    }
    let bare = element.strip_prefix("FB").unwrap_or(element);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => "item".to_string(),
    }
}
