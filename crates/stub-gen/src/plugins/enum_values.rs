//! Enum members reflect with their own enum as the value type; the stub
//! convention types them as plain `int` so the ordinal literal reads as an
//! assignment, matching how the host compares enum values.

use crate::error::Result;
use crate::model::StubClass;
use crate::plugins::{Plugin, PluginContext};

pub struct EnumValues;

impl Plugin for EnumValues {
    fn name(&self) -> &'static str {
        "enum-values"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn patch_enum(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        retype_members(class);
        Ok(())
    }

    fn patch_class(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        for nested in &mut class.nested_enums {
            retype_members(nested);
        }
        Ok(())
    }
}

fn retype_members(class: &mut StubClass) {
    for prop in &mut class.properties {
        prop.type_name = Some("int".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ENUM_BASE, StubProperty};

    fn sample_enum() -> StubClass {
        let mut e = StubClass::new("FBPlayMode");
        e.parents.push(ENUM_BASE.to_string());
        let mut prop = StubProperty::new("kFBPlayModeLoop", Some("FBPlayMode".into()));
        prop.value = Some("0".to_string());
        e.properties.push(prop);
        e
    }

    #[test]
    fn test_enum_members_become_int() {
        let mut e = sample_enum();
        EnumValues.patch_enum(&PluginContext::snapshot(&Default::default(), 2025), &mut e).unwrap();
        assert_eq!(e.properties[0].type_name.as_deref(), Some("int"));
        assert_eq!(e.properties[0].value.as_deref(), Some("0"));
    }

    #[test]
    fn test_nested_enums_patched_via_owning_class() {
        let mut class = StubClass::new("FBModel");
        class.nested_enums.push(sample_enum());
        EnumValues
            .patch_class(&PluginContext::snapshot(&Default::default(), 2025), &mut class)
            .unwrap();
        assert_eq!(
            class.nested_enums[0].properties[0].type_name.as_deref(),
            Some("int")
        );
    }
}
