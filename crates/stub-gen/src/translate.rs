//! Native-type and default-value translation tables.
//!
//! The documentation declares types in the native C++ vocabulary; the stub
//! speaks Python's. These are explicit immutable lookup tables, applied
//! during reconciliation. Class names that the reflected module does not
//! actually expose degrade to the unknown-type sentinel so the emitted stub
//! never references an undefined name.

use std::collections::HashSet;

use crate::model::{ENUM_BASE, UNKNOWN_TYPE};

/// Names the reflected module actually exposes. Built once per run.
#[derive(Debug, Default, Clone)]
pub struct KnownNames {
    pub classes: HashSet<String>,
    pub enums: HashSet<String>,
}

impl KnownNames {
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains(name) || self.enums.contains(name) || name == ENUM_BASE
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }
}

/// Fixed native-to-stub type table. Returns `None` for names that are not
/// primitives (candidate class names).
pub fn primitive_stub_type(native: &str) -> Option<&'static str> {
    match native {
        "bool" | "kBool" => Some("bool"),
        "int" | "long" | "short" | "unsigned" | "unsigned int" | "unsigned long" | "enum"
        | "kInt" | "kLong" | "kULong" | "kShort" => Some("int"),
        "float" | "double" | "kFloat" | "kDouble" | "time_t" => Some("float"),
        "str" | "string" | "char" | "char *" | "const char *" | "FBString" | "kString" => {
            Some("str")
        }
        "void" | "None" | "null" => Some("None"),
        "object" | "kReference" => Some(UNKNOWN_TYPE),
        "list" => Some("list"),
        _ => None,
    }
}

/// Full normalization of a native type string into the stub vocabulary:
/// strip C++ qualifiers, map primitives, map array-likes to `list[T]`, keep
/// reflected class names, degrade anything else to the unknown sentinel.
pub fn normalize_type(native: &str, known: &KnownNames) -> String {
    let cleaned = strip_cpp_noise(native);
    if cleaned.is_empty() {
        return UNKNOWN_TYPE.to_string();
    }

    if let Some(element) = array_element(&cleaned) {
        return format!("list[{}]", normalize_type(element, known));
    }

    if let Some(primitive) = primitive_stub_type(&cleaned) {
        return primitive.to_string();
    }

    if known.contains(&cleaned) {
        return cleaned;
    }

    tracing::trace!(native = %native, "type not exposed by the module, degrading");
    UNKNOWN_TYPE.to_string()
}

/// `FBArrayTemplate< FBModel >` / `FBVector< float >` style array types.
fn array_element(cleaned: &str) -> Option<&str> {
    for wrapper in ["FBArrayTemplate", "FBVector", "FBPropertyBaseList"] {
        if let Some(rest) = cleaned.strip_prefix(wrapper) {
            let rest = rest.trim();
            if let Some(inner) = rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
                return Some(inner.trim());
            }
        }
    }
    None
}

fn strip_cpp_noise(native: &str) -> String {
    let mut s = native.trim();
    for prefix in ["const ", "struct ", "class ", "virtual "] {
        s = s.strip_prefix(prefix).unwrap_or(s);
    }
    let s = s.trim_end_matches(['&', '*', ' ']);
    // Qualified names keep their last segment, except template forms where
    // the angle brackets must survive.
    if s.contains('<') {
        s.to_string()
    } else {
        s.rsplit("::").next().unwrap_or(s).trim().to_string()
    }
}

/// Result of normalizing a documented default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDefault {
    /// Usable literal source text.
    Literal(String),
    /// The default referenced something the module doesn't expose; treat
    /// the parameter as optional-without-value.
    Dropped,
}

/// Normalize a documented default value into stub source text.
///
/// Booleans and NULL map to Python literals; enum-typed defaults lacking a
/// qualifier are qualified as `<EnumType>.<Value>`; a default that textually
/// names a class absent from the model collapses to `Dropped` rather than
/// dangling.
pub fn normalize_default(raw: &str, param_type: Option<&str>, known: &KnownNames) -> NormalizedDefault {
    let raw = raw.trim();
    if raw.is_empty() {
        return NormalizedDefault::Dropped;
    }

    match raw {
        "true" => return NormalizedDefault::Literal("True".into()),
        "false" => return NormalizedDefault::Literal("False".into()),
        "NULL" | "Null" | "nullptr" | "0L" => return NormalizedDefault::Literal("None".into()),
        _ => {}
    }

    if raw.parse::<f64>().is_ok() {
        return NormalizedDefault::Literal(raw.to_string());
    }
    if raw.starts_with('"') || raw.starts_with('\'') {
        return NormalizedDefault::Literal(raw.to_string());
    }

    // Enum-typed parameter: qualify bare constants with the enum type name.
    if let Some(ty) = param_type
        && known.is_enum(ty)
    {
        if raw.contains('.') {
            return NormalizedDefault::Literal(raw.to_string());
        }
        return NormalizedDefault::Literal(format!("{ty}.{raw}"));
    }

    // A value naming a class: keep it only when the class is exposed.
    let head: &str = raw
        .split(['(', '.', ' '])
        .next()
        .unwrap_or(raw);
    if known.contains(head) {
        return NormalizedDefault::Literal(raw.to_string());
    }

    NormalizedDefault::Dropped
}
