#![forbid(unsafe_code)]

//! Closed vocabulary of element kinds.
//!
//! The tree model only describes elements it understands; arbitrary tag
//! strings are unrepresentable by construction, so an unsupported element
//! is a compile-time error rather than a runtime one.

use std::fmt;

/// An element kind the tree model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    A,
    Br,
    Button,
    Div,
    Em,
    Footer,
    Form,
    H1,
    H2,
    H3,
    Header,
    Hr,
    Img,
    Input,
    Label,
    Li,
    Main,
    Nav,
    Ol,
    Option,
    P,
    Section,
    Select,
    Span,
    Strong,
    Textarea,
    Ul,
}

/// Void elements: no children, no closing tag in markup.
const VOID_TAGS: &[Tag] = &[Tag::Br, Tag::Hr, Tag::Img, Tag::Input];

impl Tag {
    /// Lowercase markup name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::Br => "br",
            Self::Button => "button",
            Self::Div => "div",
            Self::Em => "em",
            Self::Footer => "footer",
            Self::Form => "form",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::Header => "header",
            Self::Hr => "hr",
            Self::Img => "img",
            Self::Input => "input",
            Self::Label => "label",
            Self::Li => "li",
            Self::Main => "main",
            Self::Nav => "nav",
            Self::Ol => "ol",
            Self::Option => "option",
            Self::P => "p",
            Self::Section => "section",
            Self::Select => "select",
            Self::Span => "span",
            Self::Strong => "strong",
            Self::Textarea => "textarea",
            Self::Ul => "ul",
        }
    }

    /// Whether this element kind is a void element.
    ///
    /// Serializers emit neither children nor a closing tag for void
    /// elements, and tree descriptions should not nest children under them.
    #[must_use]
    pub fn is_void(self) -> bool {
        VOID_TAGS.contains(&self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
