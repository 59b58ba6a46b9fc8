//! Stub-text rendering.
//!
//! Takes the finished model and writes `.pyi` source. The model arrives
//! fully sorted and patched; rendering makes no semantic decisions beyond
//! formatting rules (one-liners for undocumented members, `@overload`
//! stacking, getter/setter expansion for split-typed properties).

use std::fmt::Write as _;

use crate::model::{
    FunctionGroup, ModuleModel, ParamDefault, StubClass, StubFunction, StubProperty, UNKNOWN_TYPE,
};

/// Opening block of every generated stub: future import, typing names, and
/// the two synthetic bases the module's classes are expressed against.
pub const DEFAULT_PREAMBLE: &str = r#"# This file is generated. Manual edits will be lost.
from __future__ import annotations

from typing import Callable, Generic, Iterator, TypeVar, overload

_S = TypeVar("_S")
_E = TypeVar("_E")

class Enumeration(int): ...

class FBEventSource(Generic[_S, _E]):
    def Add(self, callback: Callable[[_S, _E], None]) -> None: ...
    def Remove(self, callback: Callable[[_S, _E], None]) -> None: ...
"#;

const INDENT: &str = "    ";

pub fn render_module(model: &ModuleModel, preamble: &str) -> String {
    let mut out = String::new();
    out.push_str(preamble);
    if !preamble.ends_with('\n') {
        out.push('\n');
    }

    for e in &model.enums {
        out.push('\n');
        render_class(&mut out, e, 0);
    }
    for class in &model.classes {
        out.push('\n');
        render_class(&mut out, class, 0);
    }
    for group in &model.functions {
        out.push('\n');
        render_group(&mut out, group, 0);
    }
    out
}

fn render_class(out: &mut String, class: &StubClass, depth: usize) {
    let pad = INDENT.repeat(depth);
    let head = if class.parents.is_empty() {
        format!("class {}:", class.name)
    } else {
        format!("class {}({}):", class.name, class.parents.join(", "))
    };

    if class.is_empty() {
        let _ = writeln!(out, "{pad}{head} ...");
        return;
    }
    let _ = writeln!(out, "{pad}{head}");
    if !class.doc.is_empty() {
        render_docstring(out, &class.doc, depth + 1);
    }
    for nested in &class.nested_enums {
        render_class(out, nested, depth + 1);
    }
    for prop in &class.properties {
        render_property(out, prop, depth + 1);
    }
    for group in &class.groups {
        render_group(out, group, depth + 1);
    }
}

fn render_property(out: &mut String, prop: &StubProperty, depth: usize) {
    let pad = INDENT.repeat(depth);
    let type_name = prop.type_name.as_deref().unwrap_or(UNKNOWN_TYPE);

    if prop.read_only || prop.setter_type.is_some() {
        let _ = writeln!(out, "{pad}@property");
        if prop.doc.is_empty() {
            let _ = writeln!(out, "{pad}def {}(self) -> {type_name}: ...", prop.name);
        } else {
            let _ = writeln!(out, "{pad}def {}(self) -> {type_name}:", prop.name);
            render_docstring(out, &prop.doc, depth + 1);
            let _ = writeln!(out, "{pad}{INDENT}...");
        }
        if !prop.read_only {
            let setter = prop.setter_type.as_deref().unwrap_or(type_name);
            let _ = writeln!(out, "{pad}@{}.setter", prop.name);
            let _ = writeln!(
                out,
                "{pad}def {}(self, value: {setter}) -> None: ...",
                prop.name
            );
        }
        return;
    }

    match &prop.value {
        Some(value) => {
            let _ = writeln!(out, "{pad}{}: {type_name} = {value}", prop.name);
        }
        None => {
            let _ = writeln!(out, "{pad}{}: {type_name}", prop.name);
        }
    }
    if !prop.doc.is_empty() {
        render_docstring(out, &prop.doc, depth);
    }
}

fn render_group(out: &mut String, group: &FunctionGroup, depth: usize) {
    let overloaded = group.is_overloaded();
    for overload in &group.overloads {
        render_function(out, overload, depth, overloaded);
    }
}

fn render_function(out: &mut String, f: &StubFunction, depth: usize, overloaded: bool) {
    let pad = INDENT.repeat(depth);
    if overloaded {
        let _ = writeln!(out, "{pad}@overload");
    }
    if f.is_static {
        let _ = writeln!(out, "{pad}@staticmethod");
    }

    let params = render_params(f);
    let ret = f.return_type.as_deref().unwrap_or("None");
    if f.doc.is_empty() {
        let _ = writeln!(out, "{pad}def {}({params}) -> {ret}: ...", f.name);
    } else {
        let _ = writeln!(out, "{pad}def {}({params}) -> {ret}:", f.name);
        render_docstring(out, &f.doc, depth + 1);
        let _ = writeln!(out, "{pad}{INDENT}...");
    }
}

fn render_params(f: &StubFunction) -> String {
    let mut pieces = Vec::with_capacity(f.parameters.len());
    let mut defaults_started = false;
    for param in &f.parameters {
        let mut piece = param.name.clone();
        if let Some(t) = &param.type_name {
            piece.push_str(": ");
            piece.push_str(t);
        }
        match &param.default {
            ParamDefault::Literal(value) => {
                defaults_started = true;
                piece.push_str(if param.type_name.is_some() { " = " } else { "=" });
                piece.push_str(value);
            }
            ParamDefault::Unspecified => {
                defaults_started = true;
                piece.push_str(if param.type_name.is_some() { " = " } else { "=" });
                piece.push_str("...");
            }
            ParamDefault::Required => {
                // Python rejects a required parameter after a defaulted
                // one, which the native overloads can produce.
                if defaults_started && param.name != "self" {
                    piece.push_str(if param.type_name.is_some() { " = " } else { "=" });
                    piece.push_str("...");
                }
            }
        }
        pieces.push(piece);
    }
    pieces.join(", ")
}

fn render_docstring(out: &mut String, doc: &str, depth: usize) {
    let pad = INDENT.repeat(depth);
    let mut lines = doc.lines();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    if rest.is_empty() {
        let _ = writeln!(out, "{pad}\"\"\"{first}\"\"\"");
        return;
    }
    let _ = writeln!(out, "{pad}\"\"\"{first}");
    for line in rest {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{pad}{line}");
        }
    }
    let _ = writeln!(out, "{pad}\"\"\"");
}
