//! Patch plugins: ordered, targeted fixups applied after reconciliation.
//!
//! Each plugin declares a priority; plugins run one at a time in ascending
//! priority order, and within a plugin every top-level item (enum, class,
//! free-function group) is patched on its own scoped thread. A plugin sees
//! a read-only [`PluginContext`] snapshot taken before its pass starts, so
//! per-item mutation never races with name lookups.

use std::collections::HashSet;

use crate::error::{Result, StubError};
use crate::model::{FunctionGroup, ModuleModel, StubClass};
use crate::reconcile::known_names;
use crate::translate::KnownNames;

mod dunder_methods;
mod enum_values;
mod event_types;
mod list_wrappers;
mod property_types;
mod read_only;

pub use dunder_methods::DunderMethods;
pub use enum_values::EnumValues;
pub use event_types::EventTypes;
pub use list_wrappers::ListWrappers;
pub use property_types::PropertyTypes;
pub use read_only::ReadOnlyDocs;

/// Read-only view of the module taken before one plugin's pass.
pub struct PluginContext {
    pub known: KnownNames,
    pub class_names: HashSet<String>,
    /// Target product release year.
    pub version: u32,
}

impl PluginContext {
    pub fn snapshot(model: &ModuleModel, version: u32) -> Self {
        Self {
            known: known_names(model),
            class_names: model.classes.iter().map(|c| c.name.clone()).collect(),
            version,
        }
    }
}

pub trait Plugin: Sync {
    fn name(&self) -> &'static str;

    /// Lower runs earlier.
    fn priority(&self) -> u32;

    fn patch_enum(&self, _ctx: &PluginContext, _class: &mut StubClass) -> Result<()> {
        Ok(())
    }

    fn patch_class(&self, _ctx: &PluginContext, _class: &mut StubClass) -> Result<()> {
        Ok(())
    }

    fn patch_function_group(&self, _ctx: &PluginContext, _group: &mut FunctionGroup) -> Result<()> {
        Ok(())
    }
}

/// The standard plugin set, in priority order.
pub fn default_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(EnumValues),
        Box::new(PropertyTypes),
        Box::new(ListWrappers),
        Box::new(DunderMethods),
        Box::new(EventTypes),
        Box::new(ReadOnlyDocs),
    ]
}

/// Run every plugin over the model. A failing item does not stop the rest
/// of that plugin's pass; all failures of one pass are aggregated into a
/// single error.
pub fn run_plugins(
    model: &mut ModuleModel,
    plugins: &[Box<dyn Plugin>],
    version: u32,
) -> Result<()> {
    let mut order: Vec<&dyn Plugin> = plugins.iter().map(AsRef::as_ref).collect();
    order.sort_by_key(|p| p.priority());

    for plugin in order {
        let ctx = PluginContext::snapshot(model, version);
        tracing::debug!(plugin = plugin.name(), "running patch pass");
        if let Err(failures) = apply_plugin(model, plugin, &ctx) {
            return Err(StubError::PluginPass {
                plugin: plugin.name().to_string(),
                failures,
            });
        }
    }
    Ok(())
}

fn apply_plugin(
    model: &mut ModuleModel,
    plugin: &dyn Plugin,
    ctx: &PluginContext,
) -> std::result::Result<(), Vec<String>> {
    let mut failures = Vec::new();

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for class in &mut model.enums {
            let item = class.name.clone();
            handles.push((item, scope.spawn(move || plugin.patch_enum(ctx, class))));
        }
        for class in &mut model.classes {
            let item = class.name.clone();
            handles.push((item, scope.spawn(move || plugin.patch_class(ctx, class))));
        }
        for group in &mut model.functions {
            let item = group.name.clone();
            handles.push((
                item,
                scope.spawn(move || plugin.patch_function_group(ctx, group)),
            ));
        }
        for (item, handle) in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(format!("{item}: {e}")),
                Err(_) => failures.push(format!("{item}: patch panicked")),
            }
        }
    });

    if failures.is_empty() { Ok(()) } else { Err(failures) }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        priority: u32,
        tag: &'static str,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn patch_class(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
            class.doc.push_str(self.tag);
            Ok(())
        }
    }

    struct Failing;

    impl Plugin for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn priority(&self) -> u32 {
            1
        }

        fn patch_class(&self, _ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
            Err(StubError::Other(format!("cannot patch {}", class.name)))
        }
    }

    fn model_with_classes(names: &[&str]) -> ModuleModel {
        let mut model = ModuleModel {
            name: "pyfbsdk".into(),
            ..Default::default()
        };
        for name in names {
            model.classes.push(StubClass::new(*name));
        }
        model
    }

    /// Plugins run in ascending priority order regardless of list order.
    #[test]
    fn test_priority_ordering() {
        let mut model = model_with_classes(&["FBModel"]);
        let plugins: Vec<Box<dyn Plugin>> = vec![
            Box::new(Recorder { priority: 20, tag: "b" }),
            Box::new(Recorder { priority: 10, tag: "a" }),
        ];
        run_plugins(&mut model, &plugins, 2025).unwrap();
        assert_eq!(model.classes[0].doc, "ab");
    }

    /// One failing item does not stop the pass; every failure is reported.
    #[test]
    fn test_failures_aggregate() {
        let mut model = model_with_classes(&["FBModel", "FBCamera"]);
        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(Failing)];
        let err = run_plugins(&mut model, &plugins, 2025).unwrap_err();
        match err {
            StubError::PluginPass { plugin, failures } => {
                assert_eq!(plugin, "failing");
                assert_eq!(failures.len(), 2);
                assert!(failures.iter().any(|f| f.contains("FBModel")));
                assert!(failures.iter().any(|f| f.contains("FBCamera")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_context_snapshot() {
        let model = model_with_classes(&["FBModel"]);
        let ctx = PluginContext::snapshot(&model, 2024);
        assert!(ctx.class_names.contains("FBModel"));
        assert!(ctx.known.contains("FBModel"));
        assert_eq!(ctx.version, 2024);
    }
}
