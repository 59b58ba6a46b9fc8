//! Static `.pyi` stub generation for the MotionBuilder Python SDK.
//!
//! The generator consumes a reflected-module snapshot (JSON captured inside
//! the host application), optionally reconciles it against the online SDK
//! documentation, repairs known binding quirks through an ordered plugin
//! set, sorts definitions so every name is defined before use, and renders
//! a single stub file.
//!
//! The crate splits along pipeline stages:
//!
//! - [`reflect`]: the snapshot data contract
//! - [`model`]: the mutable stub model every later stage works on
//! - [`signature`] / [`translate`]: native docstring-signature parsing and
//!   type/default translation
//! - [`extract`]: snapshot -> model
//! - [`reconcile`]: documentation merge and type degradation
//! - [`plugins`]: ordered patch passes
//! - [`sort`] / [`render`]: definition ordering and `.pyi` text
//! - [`pipeline`]: the orchestrator behind the `pyfbsdk-stubgen` binary

pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod plugins;
pub mod reconcile;
pub mod reflect;
pub mod render;
pub mod signature;
pub mod sort;
pub mod translate;

pub use error::{Result, StubError};
pub use model::ModuleModel;
pub use pipeline::{Generator, GeneratorConfig};
pub use reflect::ReflectedModule;
