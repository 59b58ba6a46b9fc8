//! The reconciliation engine: merges documentation records onto the
//! reflection-derived model.
//!
//! For each function group the engine looks up candidates by exact name
//! (falling back to the `FB`-prefixed documented alias), scores candidates
//! against each overload by positional type agreement, and copies names,
//! types, defaults, and docstrings from the best unused match. Ties keep
//! the first-seen candidate — a documented, deterministic rule, not an
//! accident of iteration order.

use std::sync::LazyLock;

use regex::Regex;

use mobu_docs::{DocLibrary, DocMember, DocPage, MODULE_PAGE_NAME};

use crate::model::{
    FunctionGroup, ModuleModel, ParamDefault, StubClass, StubFunction, UNKNOWN_TYPE,
};
use crate::translate::{KnownNames, NormalizedDefault, normalize_default, normalize_type};

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid regex"));

/// Names the model exposes, for type degradation and default collapsing.
pub fn known_names(model: &ModuleModel) -> KnownNames {
    let mut known = KnownNames::default();
    for class in &model.classes {
        known.classes.insert(class.name.clone());
        for nested in &class.nested_enums {
            known.enums.insert(nested.name.clone());
        }
    }
    for e in &model.enums {
        known.enums.insert(e.name.clone());
    }
    known
}

pub fn reconcile_module(model: &mut ModuleModel, docs: &DocLibrary) {
    let known = known_names(model);

    for class in &mut model.classes {
        let Some(page) = page_for(docs, &class.name) else {
            tracing::debug!(class = %class.name, "no documentation page");
            continue;
        };
        reconcile_class(class, page, &known);
    }

    if let Some(page) = docs.page(MODULE_PAGE_NAME) {
        for group in &mut model.functions {
            reconcile_group(group, page, &known);
        }
    }
}

/// Classes are conventionally documented under their `FB`-prefixed alias.
fn page_for<'a>(docs: &'a DocLibrary, name: &str) -> Option<&'a DocPage> {
    docs.page(name).or_else(|| docs.page(&format!("FB{name}")))
}

fn reconcile_class(class: &mut StubClass, page: &DocPage, known: &KnownNames) {
    for prop in &mut class.properties {
        let candidates = find_members(page, &prop.name);
        let Some(member) = candidates.first() else {
            continue;
        };
        if !member.type_name.is_empty() {
            prop.type_name = Some(normalize_type(&member.type_name, known));
        }
        if !member.doc.is_empty() {
            prop.doc = member.doc.clone();
        }
    }
    for group in &mut class.groups {
        reconcile_group(group, page, known);
    }
}

fn reconcile_group(group: &mut FunctionGroup, page: &DocPage, known: &KnownNames) {
    let candidates = find_members(page, &group.name);
    if candidates.is_empty() {
        return;
    }
    let mut used = vec![false; candidates.len()];

    if group.overloads.len() == 1 {
        used[0] = true;
        merge(&mut group.overloads[0], candidates[0], known);
        return;
    }

    for overload in &mut group.overloads {
        if let Some(idx) = pick_candidate(overload, &candidates, &used, known) {
            used[idx] = true;
            merge(overload, candidates[idx], known);
        }
    }
}

/// Member candidates on a page: exact name first, then the documented
/// `FB`-prefixed alias.
fn find_members<'a>(page: &'a DocPage, name: &str) -> Vec<&'a DocMember> {
    let exact: Vec<_> = page.members_named(name).collect();
    if !exact.is_empty() {
        return exact;
    }
    let prefixed = format!("FB{name}");
    page.members_named(&prefixed).collect()
}

/// Best unused candidate by positional type agreement, strict-greater
/// comparison so equal scores keep the first-seen candidate.
fn pick_candidate(
    overload: &StubFunction,
    candidates: &[&DocMember],
    used: &[bool],
    known: &KnownNames,
) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let score = score_candidate(overload, candidate, known);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

fn score_candidate(overload: &StubFunction, candidate: &DocMember, known: &KnownNames) -> usize {
    overload
        .real_parameters()
        .iter()
        .zip(&candidate.params)
        .filter(|(param, doc_param)| {
            param.type_name.as_deref() == Some(normalize_type(&doc_param.type_name, known).as_str())
        })
        .count()
}

fn merge(overload: &mut StubFunction, member: &DocMember, known: &KnownNames) {
    let mut renames: Vec<(String, String)> = Vec::new();

    for (param, doc_param) in overload.real_parameters_mut().iter_mut().zip(&member.params) {
        let nice = nice_name(&doc_param.name);
        if !nice.is_empty() {
            if nice != doc_param.name {
                renames.push((doc_param.name.clone(), nice.clone()));
            }
            param.name = nice;
        }
        if !doc_param.type_name.is_empty() {
            param.type_name = Some(normalize_type(&doc_param.type_name, known));
        }
        if let Some(raw) = &doc_param.default {
            param.default = match normalize_default(raw, param.type_name.as_deref(), known) {
                NormalizedDefault::Literal(text) => ParamDefault::Literal(text),
                NormalizedDefault::Dropped => ParamDefault::Unspecified,
            };
        }
    }

    if !member.type_name.is_empty() {
        let ret = normalize_type(&member.type_name, known);
        // Don't let an unresolvable documented type clobber a return type
        // the binding itself declared.
        if ret != UNKNOWN_TYPE || overload.return_type.is_none() {
            overload.return_type = Some(ret);
        }
    }

    if !member.doc.is_empty() {
        overload.doc = patch_docstring(&member.doc, &renames, overload.real_parameters().len());
    }
}

/// Nice name: strip the conventional `p` prefix and lowercase the head.
/// `pIndex` -> `index`, `pModelList` -> `modelList`.
pub fn nice_name(raw: &str) -> String {
    let raw = raw.trim();
    let stripped = match raw.strip_prefix('p') {
        Some(rest) if rest.starts_with(char::is_uppercase) => rest,
        _ => raw,
    };
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Rewrite documentation prose for one function: substitute documented
/// parameter names with their nice stub names, and prune trailing bullet
/// lines in the parameters section when the documentation lists more
/// parameters than the binding actually exposes.
fn patch_docstring(doc: &str, renames: &[(String, String)], real_count: usize) -> String {
    let mut text = doc.to_string();
    for (old, new) in renames {
        if IDENT_RE.is_match(old) {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(old)));
            if let Ok(pattern) = pattern {
                text = pattern.replace_all(&text, new.as_str()).into_owned();
            }
        }
    }

    let mut out: Vec<&str> = Vec::new();
    let mut in_params = false;
    let mut bullets = 0usize;
    for line in text.lines() {
        if line.starts_with("### ") {
            in_params = line.trim() == "### Parameters";
            bullets = 0;
            out.push(line);
            continue;
        }
        if in_params && line.starts_with("- ") {
            bullets += 1;
            if bullets > real_count {
                continue;
            }
        }
        out.push(line);
    }
    out.join("\n")
}

/// Final sanitation pass, applied with or without documentation: any type
/// that names something the module does not expose renders as the unknown
/// sentinel, never as an undefined name.
pub fn degrade_unknown_types(model: &mut ModuleModel) {
    let known = known_names(model);

    for class in model.classes.iter_mut().chain(model.enums.iter_mut()) {
        degrade_class(class, &known);
    }
    for group in &mut model.functions {
        degrade_group(group, &known);
    }
}

fn degrade_class(class: &mut StubClass, known: &KnownNames) {
    for prop in &mut class.properties {
        if let Some(t) = &prop.type_name {
            prop.type_name = Some(degrade(t, known));
        }
    }
    for group in &mut class.groups {
        degrade_group(group, known);
    }
    for nested in &mut class.nested_enums {
        degrade_class(nested, known);
    }
}

fn degrade_group(group: &mut FunctionGroup, known: &KnownNames) {
    for overload in &mut group.overloads {
        for param in overload.real_parameters_mut() {
            if let Some(t) = &param.type_name {
                param.type_name = Some(degrade(t, known));
            }
        }
        if let Some(t) = &overload.return_type {
            overload.return_type = Some(degrade(t, known));
        }
    }
}

fn degrade(type_name: &str, known: &KnownNames) -> String {
    if let Some(inner) = type_name
        .strip_prefix("list[")
        .and_then(|r| r.strip_suffix(']'))
    {
        return format!("list[{}]", degrade(inner, known));
    }
    match type_name {
        "bool" | "int" | "float" | "str" | "None" | "object" | "list" => type_name.to_string(),
        other if known.contains(other) => other.to_string(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}
