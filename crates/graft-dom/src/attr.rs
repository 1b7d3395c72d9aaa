#![forbid(unsafe_code)]

//! Attribute values for element descriptions.
//!
//! An attribute is either string-valued or boolean-valued; the kind is
//! authoritative for how the value is serialized and applied to a live
//! element. Two attributes are equal only when kind, key, and value all
//! agree.

/// A single attribute on an element description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// String-valued attribute, written verbatim.
    Text { key: String, value: String },
    /// Boolean-valued attribute; `true` is present, `false` absent.
    Flag { key: String, value: bool },
}

impl Attribute {
    /// A string-valued attribute.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A boolean-valued attribute.
    pub fn flag(key: impl Into<String>, value: bool) -> Self {
        Self::Flag {
            key: key.into(),
            value,
        }
    }

    /// The attribute key, independent of kind.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Text { key, .. } | Self::Flag { key, .. } => key,
        }
    }
}

/// An arbitrary string-valued attribute.
pub fn text(key: impl Into<String>, value: impl Into<String>) -> Attribute {
    Attribute::text(key, value)
}

/// An arbitrary boolean-valued attribute.
pub fn flag(key: impl Into<String>, value: bool) -> Attribute {
    Attribute::flag(key, value)
}

/// `class="…"` — space-separated class list.
pub fn class(value: impl Into<String>) -> Attribute {
    Attribute::text("class", value)
}

/// `id="…"`.
pub fn id(value: impl Into<String>) -> Attribute {
    Attribute::text("id", value)
}

/// Current content of a text control (`value`).
pub fn value(value: impl Into<String>) -> Attribute {
    Attribute::text("value", value)
}

/// Placeholder text for an empty control.
pub fn placeholder(value: impl Into<String>) -> Attribute {
    Attribute::text("placeholder", value)
}

/// Input control type (`type="checkbox"`, `type="text"`, …).
pub fn input_type(value: impl Into<String>) -> Attribute {
    Attribute::text("type", value)
}

/// `for="…"` — the control a label describes.
pub fn for_control(value: impl Into<String>) -> Attribute {
    Attribute::text("for", value)
}

/// Checked state of a toggle control.
pub fn checked(on: bool) -> Attribute {
    Attribute::flag("checked", on)
}

/// Disabled state of an interactive control.
pub fn disabled(on: bool) -> Attribute {
    Attribute::flag("disabled", on)
}

/// Selected state of an option.
pub fn selected(on: bool) -> Attribute {
    Attribute::flag("selected", on)
}

/// Read-only state of a text control.
pub fn readonly(on: bool) -> Attribute {
    Attribute::flag("readonly", on)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_matching_kind() {
        assert_ne!(
            Attribute::text("checked", "checked"),
            Attribute::flag("checked", true)
        );
    }

    #[test]
    fn equality_requires_matching_value() {
        assert_eq!(Attribute::text("a", "1"), Attribute::text("a", "1"));
        assert_ne!(Attribute::text("a", "1"), Attribute::text("a", "2"));
        assert_ne!(Attribute::flag("a", true), Attribute::flag("a", false));
    }

    #[test]
    fn key_is_kind_independent() {
        assert_eq!(class("x").key(), "class");
        assert_eq!(checked(true).key(), "checked");
    }

    #[test]
    fn named_helpers_build_expected_kinds() {
        assert_eq!(value("Ada"), Attribute::text("value", "Ada"));
        assert_eq!(readonly(false), Attribute::flag("readonly", false));
        assert_eq!(input_type("checkbox"), Attribute::text("type", "checkbox"));
    }
}
