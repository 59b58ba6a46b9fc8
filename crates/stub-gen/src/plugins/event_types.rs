//! Event-source typing.
//!
//! `On*` attributes reflect as bare `FBPropertyEvent` objects. Callbacks
//! registered on them receive `(source, event)` arguments whose event type
//! depends on which attribute it is, so each one is rewritten to the
//! generic `FBEventSource[owner, payload]` form using a fixed payload
//! table. Unlisted attributes carry the base `FBEvent` payload.

use crate::error::Result;
use crate::model::StubClass;
use crate::plugins::{Plugin, PluginContext};

const EVENT_WRAPPER: &str = "FBPropertyEvent";
const DEFAULT_PAYLOAD: &str = "FBEvent";

/// (owning class, attribute) -> callback payload type.
const PAYLOADS: &[(&str, &str, &str)] = &[
    ("FBApplication", "OnFileNew", "FBEvent"),
    ("FBApplication", "OnFileOpenCompleted", "FBEvent"),
    ("FBScene", "OnChange", "FBEventSceneChange"),
    ("FBScene", "OnTakeChange", "FBEventTakeChange"),
    ("FBPlayerControl", "OnChange", "FBEventPlayerControlChange"),
    ("FBSystem", "OnConnectionNotify", "FBEventConnectionNotify"),
    ("FBSystem", "OnConnectionDataNotify", "FBEventConnectionDataNotify"),
    ("FBSystem", "OnUIIdle", "FBEvent"),
    ("FBSystem", "OnVideoFrameRendering", "FBEventVideoFrameRendering"),
];

pub struct EventTypes;

impl Plugin for EventTypes {
    fn name(&self) -> &'static str {
        "event-types"
    }

    fn priority(&self) -> u32 {
        50
    }

    fn patch_class(&self, ctx: &PluginContext, class: &mut StubClass) -> Result<()> {
        let owner = class.name.clone();
        for prop in &mut class.properties {
            if prop.type_name.as_deref() == Some(EVENT_WRAPPER) {
                let payload = payload_for(ctx, &owner, &prop.name);
                prop.type_name = Some(format!("FBEventSource[{owner}, {payload}]"));
            }
        }

        if owner.starts_with("FBEvent") {
            // Event classes reflect a `Type` attribute whose native type
            // never resolves; leave it untyped rather than wrong.
            if let Some(prop) = class.property_mut("Type") {
                prop.type_name = None;
            }
        }
        if owner == "FBEventSceneChange" {
            // Reflected but not actually exposed by the host.
            class.properties.retain(|p| p.name != "Why");
        }
        Ok(())
    }
}

fn payload_for(ctx: &PluginContext, owner: &str, attribute: &str) -> String {
    let listed = PAYLOADS
        .iter()
        .find(|(class, name, _)| *class == owner && *name == attribute)
        .map(|(_, _, payload)| *payload);
    match listed {
        Some(payload) if ctx.class_names.contains(payload) => payload.to_string(),
        _ => DEFAULT_PAYLOAD.to_string(),
    }
}
