#![forbid(unsafe_code)]

//! Attribute application policy.
//!
//! Writing a declared [`Attribute`] to a live element is not a single host
//! call: class lists merge, interactive state routes to element properties
//! instead of the attribute map, and boolean attributes follow the
//! `key="key"` convention. This module owns that dispatch so builder and
//! reconciler share one behavior.
//!
//! Priority order, first match wins:
//! 1. string-valued `class` — class-list union plus removal of stale
//!    classes (a boolean-valued `class` falls through to rule 3);
//! 2. `(tag, key)` found in [`is_property`] — direct property assignment
//!    on the live element;
//! 3. everything else by kind: `Text` sets the attribute verbatim,
//!    `Flag(true)` sets it to its own key name, `Flag(false)` removes it
//!    only while its current value still equals the key name.

use crate::attr::Attribute;
use crate::dom::{Dom, NodeRef};
use crate::tag::Tag;

/// Interactive state owned by the live element rather than its attribute
/// map, keyed by tag. Writes to these keys go through property assignment.
const PROPERTY_KEYS: &[(Tag, &[&str])] = &[
    (
        Tag::Input,
        &["checked", "indeterminate", "value", "readonly", "disabled"],
    ),
    (Tag::Option, &["selected", "disabled"]),
    (Tag::Select, &["value", "disabled"]),
    (Tag::Textarea, &["value", "readonly", "disabled"]),
    (Tag::Button, &["disabled"]),
];

/// Whether `key` names interactive live-element state on `tag`.
#[must_use]
pub fn is_property(tag: Tag, key: &str) -> bool {
    PROPERTY_KEYS
        .iter()
        .find(|(t, _)| *t == tag)
        .is_some_and(|(_, keys)| keys.contains(&key))
}

/// Write one declared attribute to a live element.
pub fn apply_attribute<D: Dom>(dom: &mut D, node: NodeRef, tag: Tag, attr: &Attribute) {
    match attr {
        Attribute::Text { key, value } if key == "class" => {
            apply_class_list(dom, node, value);
        }
        Attribute::Text { key, value } if is_property(tag, key) => {
            dom.set_text_property(node, key, value);
        }
        Attribute::Flag { key, value } if is_property(tag, key) => {
            dom.set_bool_property(node, key, *value);
        }
        Attribute::Text { key, value } => {
            dom.set_attribute(node, key, value);
        }
        Attribute::Flag { key, value: true } => {
            dom.set_attribute(node, key, key);
        }
        Attribute::Flag { key, value: false } => {
            // Only undo our own `key="key"` convention; a host-mutated
            // value is left alone.
            if dom.attribute(node, key).as_deref() == Some(key.as_str()) {
                dom.remove_attribute(node, key);
            }
        }
    }
}

/// Undo a declared attribute that no longer appears in the description.
///
/// Clearing works through the attribute mechanism only: interactive
/// properties assigned by rule 2 are never reset here.
pub fn clear_attribute<D: Dom>(dom: &mut D, node: NodeRef, key: &str) {
    if key == "class" {
        for class in dom.classes(node) {
            dom.remove_class(node, &class);
        }
    } else {
        dom.remove_attribute(node, key);
    }
}

/// Union the declared class list into the element, then drop classes the
/// declaration no longer carries.
fn apply_class_list<D: Dom>(dom: &mut D, node: NodeRef, value: &str) {
    let next: Vec<&str> = value.split_whitespace().collect();
    for class in &next {
        dom.add_class(node, class);
    }
    for current in dom.classes(node) {
        if !next.iter().any(|c| *c == current) {
            dom.remove_class(node, &current);
        }
    }
}
