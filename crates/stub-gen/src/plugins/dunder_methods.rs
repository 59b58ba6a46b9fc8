//! Dunder-method return types and iteration support.
//!
//! Arithmetic operators on SDK value types return the owning type, but the
//! bindings rarely declare it, so those overloads default to the class name
//! with a small table of exceptions. Container classes that expose
//! `__getitem__` without `__iter__` still iterate at runtime through the
//! sequence protocol; an `__iter__` stub is synthesized so type checkers
//! agree.

use crate::error::Result;
use crate::model::{FunctionGroup, StubClass, StubFunction, StubParameter, UNKNOWN_TYPE};
use crate::plugins::{Plugin, PluginContext};

/// Operators that return the owning type unless declared otherwise.
const SELF_TYPED: &[&str] = &[
    "__add__",
    "__sub__",
    "__mul__",
    "__truediv__",
    "__radd__",
    "__rsub__",
    "__rmul__",
    "__iadd__",
    "__isub__",
    "__imul__",
    "__itruediv__",
    "__neg__",
];

/// (class, operator) pairs whose runtime return differs from the owner.
const RETURN_EXCEPTIONS: &[(&str, &str, &str)] = &[
    ("FBTime", "__truediv__", "float"),
    ("FBVector3d", "__mul__", "float"),
];

pub struct DunderMethods;

impl Plugin for DunderMethods {
    fn name(&self) -> &'static str {
        "dunder-methods"
    }

    fn priority(&self) -> u32 {
        40
    }

    fn patch_class(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        for group in &mut class.groups {
            if !SELF_TYPED.contains(&group.name.as_str()) {
                continue;
            }
            let target = return_type_for(&class.name, &group.name);
            for overload in &mut group.overloads {
                if !has_usable_return(overload) {
                    overload.return_type = Some(target.clone());
                }
            }
        }

        if let Some(element) = getitem_element(class)
            && class.group("__iter__").is_none()
        {
            class.groups.push(make_iter(element));
        }
        Ok(())
    }
}

fn return_type_for(class_name: &str, op: &str) -> String {
    RETURN_EXCEPTIONS
        .iter()
        .find(|(class, name, _)| *class == class_name && *name == op)
        .map(|(_, _, ret)| (*ret).to_string())
        .unwrap_or_else(|| class_name.to_string())
}

fn has_usable_return(f: &StubFunction) -> bool {
    matches!(&f.return_type, Some(t) if t != UNKNOWN_TYPE && t != "None")
}

fn getitem_element(class: &StubClass) -> Option<String> {
    class
        .group("__getitem__")?
        .overloads
        .first()?
        .return_type
        .clone()
}

fn make_iter(element: String) -> FunctionGroup {
    let mut f = StubFunction::new("__iter__");
    f.is_method = true;
    f.parameters.push(StubParameter::instance());
    f.return_type = Some(format!("Iterator[{element}]"));
    let mut group = FunctionGroup::new("__iter__");
    group.overloads.push(f);
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleModel;

    fn ctx() -> PluginContext {
        PluginContext::snapshot(&ModuleModel::default(), 2025)
    }

    fn op_group(name: &str, return_type: Option<&str>) -> FunctionGroup {
        let mut f = StubFunction::new(name);
        f.is_method = true;
        f.parameters.push(StubParameter::instance());
        f.parameters
            .push(StubParameter::new("other", Some("object".to_string())));
        f.return_type = return_type.map(str::to_string);
        let mut group = FunctionGroup::new(name);
        group.overloads.push(f);
        group
    }

    #[test]
    fn test_operator_defaults_to_owner() {
        let mut class = StubClass::new("FBVector4d");
        class.groups.push(op_group("__add__", Some("object")));
        DunderMethods.patch_class(&ctx(), &mut class).unwrap();
        assert_eq!(
            class.group("__add__").unwrap().overloads[0]
                .return_type
                .as_deref(),
            Some("FBVector4d")
        );
    }

    #[test]
    fn test_declared_return_kept() {
        let mut class = StubClass::new("FBVector4d");
        class.groups.push(op_group("__sub__", Some("FBVector3d")));
        DunderMethods.patch_class(&ctx(), &mut class).unwrap();
        assert_eq!(
            class.group("__sub__").unwrap().overloads[0]
                .return_type
                .as_deref(),
            Some("FBVector3d")
        );
    }

    /// Dividing two times yields a plain ratio, not a time.
    #[test]
    fn test_exception_table() {
        let mut class = StubClass::new("FBTime");
        class.groups.push(op_group("__truediv__", None));
        DunderMethods.patch_class(&ctx(), &mut class).unwrap();
        assert_eq!(
            class.group("__truediv__").unwrap().overloads[0]
                .return_type
                .as_deref(),
            Some("float")
        );
    }

    #[test]
    fn test_iter_synthesized_from_getitem() {
        let mut class = StubClass::new("FBPropertyListModel");
        class.groups.push(op_group("__getitem__", Some("FBModel")));
        DunderMethods.patch_class(&ctx(), &mut class).unwrap();

        let iter = class.group("__iter__").unwrap();
        assert_eq!(
            iter.overloads[0].return_type.as_deref(),
            Some("Iterator[FBModel]")
        );
        assert_eq!(iter.overloads[0].parameters.len(), 1);
    }

    #[test]
    fn test_existing_iter_not_replaced() {
        let mut class = StubClass::new("FBPropertyListModel");
        class.groups.push(op_group("__getitem__", Some("FBModel")));
        class.groups.push(op_group("__iter__", Some("object")));
        DunderMethods.patch_class(&ctx(), &mut class).unwrap();
        assert_eq!(class.group("__iter__").unwrap().overloads.len(), 1);
        assert_eq!(
            class.group("__iter__").unwrap().overloads[0]
                .return_type
                .as_deref(),
            Some("object")
        );
    }
}
