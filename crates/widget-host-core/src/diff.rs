//! Reference-identity diffing of widget inputs.
//!
//! Nothing here inspects value contents. An input counts as changed only when
//! its handle was reallocated, so callers that rebuild equal values on every
//! pass will see them pushed on every pass.

use std::rc::Rc;

use crate::props::Props;
use crate::value::Value;

/// Bindings to push for a props change, in incoming order.
///
/// Names present in `next` whose handle differs from `last` (or that are new)
/// come first; names that disappeared follow as [`Value::Undefined`]. An
/// absent name and an undefined one are the same input.
pub fn diff_props(last: &Props, next: &Props) -> Vec<(Rc<str>, Value)> {
    let mut changes = Vec::new();
    for (name, value) in next.entries() {
        // A missing name reads as undefined.
        let unchanged = last.get(name).unwrap_or(&Value::Undefined).same(value);
        if !unchanged {
            changes.push((Rc::clone(name), value.clone()));
        }
    }
    for (name, value) in last.entries() {
        if !next.contains(name) && !value.is_undefined() {
            changes.push((Rc::clone(name), Value::Undefined));
        }
    }
    changes
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChildrenChange {
    Unchanged,
    /// The number of children differs.
    Resized { from: usize, to: usize },
    /// Same count; `index` is the first position whose handle differs.
    Replaced { index: usize },
}

/// Compares children as a unit. The element scan stops at the first
/// difference.
pub fn diff_children(last: &[Value], next: &[Value]) -> ChildrenChange {
    if last.len() != next.len() {
        return ChildrenChange::Resized {
            from: last.len(),
            to: next.len(),
        };
    }
    match last.iter().zip(next).position(|(a, b)| !a.same(b)) {
        Some(index) => ChildrenChange::Replaced { index },
        None => ChildrenChange::Unchanged,
    }
}

pub fn children_changed(last: &[Value], next: &[Value]) -> bool {
    diff_children(last, next) != ChildrenChange::Unchanged
}
