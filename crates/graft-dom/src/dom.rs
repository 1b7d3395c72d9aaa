#![forbid(unsafe_code)]

//! The presentation-surface boundary.
//!
//! [`Dom`] is the only seam between the reconciliation engine and a live
//! tree. Builder, reconciler, and hydrator speak exclusively through it, so
//! any host that can create nodes, splice children, write attributes and
//! properties, and register native listeners can present a program — a real
//! browser binding or the in-memory [`MemoryDom`](crate::memory::MemoryDom)
//! alike.
//!
//! Host primitives are treated as infallible: every operation either takes
//! effect or (for the documented cases) is a defined no-op. Handles are
//! opaque and only meaningful to the host that issued them.

use crate::event::UiEvent;
use crate::tag::Tag;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque handle to a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u32);

/// Opaque handle to a native listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRef(pub u32);

/// What a live node is, for identity checks during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element(Tag),
    Text,
}

/// Callback registered on a live node.
///
/// Hosts arm listeners to fire **at most once**; the runtime re-registers
/// on every patch cycle.
pub type EventListener = Box<dyn FnMut(&UiEvent)>;

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// Host operations a presentation surface must provide.
pub trait Dom {
    /// Create a detached element node.
    fn create_element(&mut self, tag: Tag) -> NodeRef;

    /// Create a detached text node.
    fn create_text(&mut self, content: &str) -> NodeRef;

    /// What `node` is, or `None` for a handle this host never issued.
    fn node_kind(&self, node: NodeRef) -> Option<NodeKind>;

    /// Append `child` as the last child of `parent`.
    ///
    /// A child already attached elsewhere is reparented.
    fn append_child(&mut self, parent: NodeRef, child: NodeRef);

    /// Replace `old` with `new` in `old`'s parent.
    ///
    /// No-op when `old` is detached.
    fn replace_node(&mut self, old: NodeRef, new: NodeRef);

    /// Remove the child at `index` from `parent`.
    fn remove_child_at(&mut self, parent: NodeRef, index: usize);

    /// Number of live children under `node`.
    fn child_count(&self, node: NodeRef) -> usize;

    /// The child at `index`, if present.
    fn child_at(&self, node: NodeRef, index: usize) -> Option<NodeRef>;

    /// Set a string attribute verbatim.
    fn set_attribute(&mut self, node: NodeRef, key: &str, value: &str);

    /// Remove an attribute; no-op when absent.
    fn remove_attribute(&mut self, node: NodeRef, key: &str);

    /// Current attribute value, if set.
    fn attribute(&self, node: NodeRef, key: &str) -> Option<String>;

    /// Add one class to the element's class set; duplicates collapse.
    fn add_class(&mut self, node: NodeRef, class: &str);

    /// Remove one class from the element's class set; no-op when absent.
    fn remove_class(&mut self, node: NodeRef, class: &str);

    /// The element's classes, in insertion order.
    fn classes(&self, node: NodeRef) -> Vec<String>;

    /// Assign a string-valued interactive property on the live element.
    fn set_text_property(&mut self, node: NodeRef, key: &str, value: &str);

    /// Assign a boolean-valued interactive property on the live element.
    fn set_bool_property(&mut self, node: NodeRef, key: &str, on: bool);

    /// Register `listener` for `event` on `node`, armed to fire at most
    /// once.
    fn attach(&mut self, node: NodeRef, event: &str, listener: EventListener) -> ListenerRef;

    /// Unregister a listener.
    ///
    /// No-op for a handle that already fired or was never issued — stale
    /// handles from a previous cycle are expected callers.
    fn detach(&mut self, listener: ListenerRef);
}
