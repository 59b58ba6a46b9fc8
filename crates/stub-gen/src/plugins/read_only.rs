//! Marks properties whose documentation opens with a read-only notice, so
//! the renderer emits a getter without a setter.

use crate::error::Result;
use crate::model::StubClass;
use crate::plugins::{Plugin, PluginContext};

pub struct ReadOnlyDocs;

impl Plugin for ReadOnlyDocs {
    fn name(&self) -> &'static str {
        "read-only-docs"
    }

    fn priority(&self) -> u32 {
        60
    }

    fn patch_class(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        for prop in &mut class.properties {
            if let Some(first) = prop.doc.lines().next() {
                let first = first.trim().to_lowercase();
                if first.starts_with("read only property") || first.starts_with("read-only property")
                {
                    prop.read_only = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleModel, StubProperty};

    fn patched(doc: &str) -> bool {
        let mut class = StubClass::new("FBModel");
        let mut prop = StubProperty::new("Parent", Some("FBModel".into()));
        prop.doc = doc.to_string();
        class.properties.push(prop);
        ReadOnlyDocs
            .patch_class(&PluginContext::snapshot(&ModuleModel::default(), 2025), &mut class)
            .unwrap();
        class.properties[0].read_only
    }

    #[test]
    fn test_read_only_notice_detected() {
        assert!(patched("Read Only Property: the parent model."));
        assert!(patched("read-only property. Current take."));
        assert!(!patched("The parent model. Read only in some modes."));
        assert!(!patched(""));
    }
}
