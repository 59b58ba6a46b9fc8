//! Definition-order sorting.
//!
//! A class must appear after every name it depends on: its parent classes,
//! and any class invoked in a parameter default literal. Sorting runs as a
//! relocation loop over a work queue, pushing a class back when one of its
//! requirements has not been placed yet. The loop is capped at `n*n + n`
//! dequeues; hitting the cap means the remaining classes form a cycle, and
//! that is reported rather than emitting a stub that fails to import.

use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StubError};
use crate::model::{ModuleModel, ParamDefault, StubClass};

static CLASS_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bFB[A-Za-z0-9_]+").expect("valid regex"));

pub fn sort_classes(model: &mut ModuleModel) -> Result<()> {
    let class_names: HashSet<String> = model.classes.iter().map(|c| c.name.clone()).collect();

    let mut pending: VecDeque<StubClass> = model.classes.drain(..).collect();
    let mut placed: Vec<StubClass> = Vec::with_capacity(pending.len());
    let mut placed_names: HashSet<String> = HashSet::with_capacity(pending.len());

    let cap = pending.len() * pending.len() + pending.len();
    let mut dequeues = 0usize;

    while let Some(class) = pending.pop_front() {
        dequeues += 1;
        if dequeues > cap {
            let mut names: Vec<String> = std::iter::once(class.name.clone())
                .chain(pending.iter().map(|c| c.name.clone()))
                .collect();
            names.sort();
            return Err(StubError::DependencyCycle {
                iterations: cap,
                names,
            });
        }
        if requirements(&class, &class_names)
            .iter()
            .all(|r| placed_names.contains(r))
        {
            placed_names.insert(class.name.clone());
            placed.push(class);
        } else {
            pending.push_back(class);
        }
    }

    model.classes = placed;
    Ok(())
}

/// Class names that must be defined before this class.
fn requirements(class: &StubClass, class_names: &HashSet<String>) -> HashSet<String> {
    let mut reqs: HashSet<String> = class
        .parents
        .iter()
        .filter(|p| class_names.contains(*p) && **p != class.name)
        .cloned()
        .collect();

    for group in &class.groups {
        for overload in &group.overloads {
            for param in overload.real_parameters() {
                if let ParamDefault::Literal(text) = &param.default {
                    for m in CLASS_REF_RE.find_iter(text) {
                        let name = m.as_str();
                        if class_names.contains(name) && name != class.name {
                            reqs.insert(name.to_string());
                        }
                    }
                }
            }
        }
    }
    reqs
}
