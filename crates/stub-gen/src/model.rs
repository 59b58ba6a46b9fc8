//! The in-memory stub model.
//!
//! Everything is built fresh per generation run from the reflected module,
//! mutated in place by reconciliation and the plugin passes, and discarded
//! after rendering. Classes reference their parents by name, never by
//! object, so the graph stays acyclic in ownership terms and ordering is
//! resolved at sort time.

/// Synthetic base every reflected enum type is parented under.
pub const ENUM_BASE: &str = "Enumeration";

/// Fallback type for anything that cannot be resolved to a known name.
pub const UNKNOWN_TYPE: &str = "object";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamDefault {
    /// No default: the parameter is required.
    Required,
    /// Optional, but the concrete default is not recoverable — renders `...`.
    Unspecified,
    /// A literal default, stored as stub source text.
    Literal(String),
}

impl ParamDefault {
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubParameter {
    pub name: String,
    pub type_name: Option<String>,
    pub default: ParamDefault,
}

impl StubParameter {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
            default: ParamDefault::Required,
        }
    }

    /// The bound-instance parameter of a method.
    pub fn instance() -> Self {
        Self::new("self", None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubFunction {
    pub name: String,
    pub parameters: Vec<StubParameter>,
    pub return_type: Option<String>,
    pub is_method: bool,
    pub is_static: bool,
    pub doc: String,
}

impl StubFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            is_method: false,
            is_static: false,
            doc: String::new(),
        }
    }

    /// Parameters excluding the bound instance. The first parameter of a
    /// method is the instance and never takes part in defaults-count or
    /// doc-matching logic.
    pub fn real_parameters(&self) -> &[StubParameter] {
        if self.is_method && !self.parameters.is_empty() {
            &self.parameters[1..]
        } else {
            &self.parameters
        }
    }

    pub fn real_parameters_mut(&mut self) -> &mut [StubParameter] {
        if self.is_method && !self.parameters.is_empty() {
            &mut self.parameters[1..]
        } else {
            &mut self.parameters
        }
    }
}

/// All overloads sharing one name, rendered together.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionGroup {
    pub name: String,
    pub overloads: Vec<StubFunction>,
}

impl FunctionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    pub fn is_overloaded(&self) -> bool {
        self.overloads.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubProperty {
    pub name: String,
    /// `None` renders as the unknown-type sentinel.
    pub type_name: Option<String>,
    /// Distinct setter type, when assignment accepts more than the getter
    /// returns. Forces getter/setter rendering.
    pub setter_type: Option<String>,
    /// Literal value source text (enum ordinals).
    pub value: Option<String>,
    pub doc: String,
    pub read_only: bool,
}

impl StubProperty {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
            setter_type: None,
            value: None,
            doc: String::new(),
            read_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubClass {
    pub name: String,
    /// Parent class names. Strings, not references — resolved at sort time.
    pub parents: Vec<String>,
    pub properties: Vec<StubProperty>,
    pub groups: Vec<FunctionGroup>,
    /// Inner enum types, emitted as nested classes.
    pub nested_enums: Vec<StubClass>,
    pub doc: String,
}

impl StubClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            properties: Vec::new(),
            groups: Vec::new(),
            nested_enums: Vec::new(),
            doc: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.groups.is_empty()
            && self.nested_enums.is_empty()
            && self.doc.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&StubProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut StubProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&FunctionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut FunctionGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    pub fn remove_group(&mut self, name: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.name != name);
        self.groups.len() != before
    }
}

/// The full model for one generation run.
#[derive(Debug, Clone, Default)]
pub struct ModuleModel {
    pub name: String,
    pub enums: Vec<StubClass>,
    pub classes: Vec<StubClass>,
    pub functions: Vec<FunctionGroup>,
}
