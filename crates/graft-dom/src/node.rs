#![forbid(unsafe_code)]

//! The declarative tree description.
//!
//! A [`Node`] is a pure value: every `view` evaluation produces a fresh
//! tree, and nothing in it refers to live presentation state. Construction
//! is builder-style and infallible — an ill-formed tree is unrepresentable
//! rather than a runtime error.
//!
//! Cloning shares event converters (they live behind `Rc`), so `Node<M>`
//! is `Clone` without requiring `M: Clone`.

use std::fmt;

use crate::attr::Attribute;
use crate::event::EventDescriptor;
use crate::tag::Tag;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of a tree description: an element or a text run.
pub enum Node<M> {
    Element(Element<M>),
    Text(String),
}

impl<M> Node<M> {
    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// The element inside, when this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element<M>> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl<M> Clone for Node<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Element(el) => Self::Element(el.clone()),
            Self::Text(content) => Self::Text(content.clone()),
        }
    }
}

impl<M> fmt::Debug for Node<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(el) => el.fmt(f),
            Self::Text(content) => f.debug_tuple("Text").field(content).finish(),
        }
    }
}

impl<M> From<Element<M>> for Node<M> {
    fn from(el: Element<M>) -> Self {
        Self::Element(el)
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// An element description: tag, attributes, event subscriptions, children.
///
/// Attribute and child order is meaningful — attributes apply and serialize
/// in declaration order, children pair positionally during reconciliation.
pub struct Element<M> {
    pub tag: Tag,
    pub attrs: Vec<Attribute>,
    pub events: Vec<EventDescriptor<M>>,
    pub children: Vec<Node<M>>,
}

impl<M> Element<M> {
    #[must_use]
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            events: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append one attribute.
    #[must_use]
    pub fn attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Append every attribute in order.
    #[must_use]
    pub fn attrs(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Subscribe to an event.
    #[must_use]
    pub fn on(mut self, descriptor: EventDescriptor<M>) -> Self {
        self.events.push(descriptor);
        self
    }

    /// Append one child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Node<M>>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append every child in order.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node<M>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::text(content))
    }
}

impl<M> Clone for Element<M> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            attrs: self.attrs.clone(),
            events: self.events.clone(),
            children: self.children.clone(),
        }
    }
}

impl<M> fmt::Debug for Element<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("events", &self.events)
            .field("children", &self.children)
            .finish()
    }
}
