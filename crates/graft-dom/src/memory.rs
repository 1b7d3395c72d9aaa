#![forbid(unsafe_code)]

//! Headless presentation surface for CI testing.
//!
//! `MemoryDom` implements [`Dom`] over an in-memory node arena so the
//! builder, reconciler, and runtime can be exercised without a browser. It
//! is designed for:
//!
//! - **CI environments** where no real presentation surface exists
//! - **Write-counting assertions** via a journal of every host call
//! - **Markup snapshots** with human-readable mismatch output
//!
//! Listeners are armed to fire at most once, exactly as the live-host
//! contract demands, so subscription lifecycle bugs show up here first.
//!
//! # Example
//!
//! ```
//! use graft_dom::dom::Dom;
//! use graft_dom::memory::MemoryDom;
//! use graft_dom::tag::Tag;
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.create_element(Tag::Div);
//! let text = dom.create_text("hello");
//! dom.append_child(root, text);
//! assert_eq!(dom.outer_html(root), "<div>hello</div>");
//! ```

use crate::dom::{Dom, EventListener, ListenerRef, NodeKind, NodeRef};
use crate::event::UiEvent;
use crate::html::{escape_attr, escape_text};
use crate::tag::Tag;

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// One mutating host call, recorded in issue order.
///
/// The journal records calls, not effects: an idempotent `add_class` or a
/// removal of an absent attribute still appears. Write-free assertions are
/// therefore assertions about what the engine *issued*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    CreateElement { node: NodeRef, tag: Tag },
    CreateText { node: NodeRef },
    AppendChild { parent: NodeRef, child: NodeRef },
    ReplaceNode { old: NodeRef, new: NodeRef },
    RemoveChild { parent: NodeRef, index: usize },
    SetAttribute { node: NodeRef, key: String },
    RemoveAttribute { node: NodeRef, key: String },
    SetTextProperty { node: NodeRef, key: String },
    SetBoolProperty { node: NodeRef, key: String },
    AddClass { node: NodeRef, class: String },
    RemoveClass { node: NodeRef, class: String },
    Attach { node: NodeRef, event: String },
    Detach { listener: ListenerRef },
}

impl WriteOp {
    /// Whether this op is listener bookkeeping rather than a tree write.
    #[must_use]
    pub const fn is_subscription(&self) -> bool {
        matches!(self, Self::Attach { .. } | Self::Detach { .. })
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Interactive property value on a live element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PropValue {
    Text(String),
    Bool(bool),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
    text: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    props: Vec<(String, PropValue)>,
}

impl NodeData {
    fn element(tag: Tag) -> Self {
        Self {
            kind: NodeKind::Element(tag),
            parent: None,
            children: Vec::new(),
            text: String::new(),
            attrs: Vec::new(),
            classes: Vec::new(),
            props: Vec::new(),
        }
    }

    fn text(content: &str) -> Self {
        Self {
            kind: NodeKind::Text,
            parent: None,
            children: Vec::new(),
            text: content.to_owned(),
            attrs: Vec::new(),
            classes: Vec::new(),
            props: Vec::new(),
        }
    }
}

struct ListenerSlot {
    node: NodeRef,
    event: String,
    /// `None` once fired or detached.
    callback: Option<EventListener>,
}

// ---------------------------------------------------------------------------
// MemoryDom
// ---------------------------------------------------------------------------

/// In-memory [`Dom`] with a write journal and one-shot listener slab.
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    listeners: Vec<ListenerSlot>,
    writes: Vec<WriteOp>,
    attach_count: usize,
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            listeners: Vec::new(),
            writes: Vec::new(),
            attach_count: 0,
        }
    }

    // --- Journal ---

    /// Every mutating host call since construction or [`clear_writes`].
    ///
    /// [`clear_writes`]: Self::clear_writes
    #[must_use]
    pub fn writes(&self) -> &[WriteOp] {
        &self.writes
    }

    /// Forget the journal; node and listener state is untouched.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Total `attach` calls ever made. Monotonic, never reset.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    // --- Events ---

    /// Deliver `event` to every armed listener for its name on `node`.
    ///
    /// Each listener is disarmed *before* its callback runs, so a single
    /// registration observes at most one delivery. Returns the number of
    /// listeners that fired.
    pub fn fire(&mut self, node: NodeRef, event: &UiEvent) -> usize {
        let name = event.name();
        let mut fired = 0;
        for i in 0..self.listeners.len() {
            let armed = {
                let slot = &self.listeners[i];
                slot.node == node && slot.event == name && slot.callback.is_some()
            };
            if armed {
                if let Some(mut callback) = self.listeners[i].callback.take() {
                    callback(event);
                    fired += 1;
                }
            }
        }
        fired
    }

    /// How many registrations for `event` on `node` are still armed.
    #[must_use]
    pub fn armed_count(&self, node: NodeRef, event: &str) -> usize {
        self.listeners
            .iter()
            .filter(|slot| slot.node == node && slot.event == event && slot.callback.is_some())
            .count()
    }

    // --- Inspection ---

    /// Text-node content, when `node` is a text node.
    #[must_use]
    pub fn text_of(&self, node: NodeRef) -> Option<&str> {
        let data = self.node(node)?;
        match data.kind {
            NodeKind::Text => Some(&data.text),
            NodeKind::Element(_) => None,
        }
    }

    /// Concatenated text of `node` and all its descendants, in order.
    #[must_use]
    pub fn text_content(&self, node: NodeRef) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// The live children of `node`, in order.
    #[must_use]
    pub fn children_of(&self, node: NodeRef) -> Vec<NodeRef> {
        self.node(node).map(|d| d.children.clone()).unwrap_or_default()
    }

    /// Walk child indices from `root`; `&[]` is `root` itself.
    #[must_use]
    pub fn node_at_path(&self, root: NodeRef, path: &[usize]) -> Option<NodeRef> {
        let mut current = root;
        for &index in path {
            current = self.child_at(current, index)?;
        }
        Some(current)
    }

    /// Current string-property value, if one was ever assigned.
    #[must_use]
    pub fn text_property(&self, node: NodeRef, key: &str) -> Option<String> {
        match self.prop(node, key)? {
            PropValue::Text(value) => Some(value.clone()),
            PropValue::Bool(_) => None,
        }
    }

    /// Current boolean-property value, if one was ever assigned.
    #[must_use]
    pub fn bool_property(&self, node: NodeRef, key: &str) -> Option<bool> {
        match self.prop(node, key)? {
            PropValue::Text(_) => None,
            PropValue::Bool(on) => Some(*on),
        }
    }

    // --- Markup ---

    /// Serialize the live subtree under `node` as markup.
    ///
    /// Attribute order is canonical: `class` first, then attributes in
    /// insertion order, then interactive properties in assignment order
    /// (`true` booleans as `key="key"`, `false` omitted). A tree built from
    /// a description serializes identically to rendering that description
    /// with [`render_to_string`](crate::html::render_to_string).
    #[must_use]
    pub fn outer_html(&self, node: NodeRef) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Assert the subtree's markup matches `expected` exactly.
    ///
    /// # Panics
    ///
    /// Panics with the serialized markup and the column of the first
    /// difference when it does not match.
    pub fn assert_html(&self, node: NodeRef, expected: &str) {
        let actual = self.outer_html(node);
        if actual != expected {
            let col = actual
                .chars()
                .zip(expected.chars())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| actual.len().min(expected.len()));
            panic!(
                "MemoryDom: markup mismatch\n  got:  {actual:?}\n  want: {expected:?}\n  first difference at column {col}",
            );
        }
    }

    // --- Internals ---

    fn node(&self, node: NodeRef) -> Option<&NodeData> {
        self.nodes.get(node.0 as usize)
    }

    fn node_mut(&mut self, node: NodeRef) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0 as usize)
    }

    fn prop(&self, node: NodeRef, key: &str) -> Option<&PropValue> {
        self.node(node)?
            .props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn push_node(&mut self, data: NodeData) -> NodeRef {
        let node = NodeRef(self.nodes.len() as u32);
        self.nodes.push(data);
        node
    }

    /// Unhook `node` from its current parent, if any.
    fn detach_from_parent(&mut self, node: NodeRef) {
        let Some(parent) = self.node(node).and_then(|d| d.parent) else {
            return;
        };
        if let Some(parent_data) = self.node_mut(parent) {
            parent_data.children.retain(|c| *c != node);
        }
        if let Some(data) = self.node_mut(node) {
            data.parent = None;
        }
    }

    fn collect_text(&self, node: NodeRef, out: &mut String) {
        let Some(data) = self.node(node) else { return };
        match data.kind {
            NodeKind::Text => out.push_str(&data.text),
            NodeKind::Element(_) => {
                for child in data.children.clone() {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn write_html(&self, node: NodeRef, out: &mut String) {
        let Some(data) = self.node(node) else { return };
        let tag = match data.kind {
            NodeKind::Text => {
                out.push_str(&escape_text(&data.text));
                return;
            }
            NodeKind::Element(tag) => tag,
        };

        out.push('<');
        out.push_str(tag.as_str());
        if !data.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(&data.classes.join(" ")));
            out.push('"');
        }
        for (key, value) in &data.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        for (key, value) in &data.props {
            match value {
                PropValue::Text(value) => {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                PropValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(key);
                    out.push('"');
                }
                PropValue::Bool(false) => {}
            }
        }
        out.push('>');

        if tag.is_void() {
            return;
        }
        for child in &data.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(tag.as_str());
        out.push('>');
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("writes", &self.writes.len())
            .finish()
    }
}

impl Dom for MemoryDom {
    fn create_element(&mut self, tag: Tag) -> NodeRef {
        let node = self.push_node(NodeData::element(tag));
        self.writes.push(WriteOp::CreateElement { node, tag });
        node
    }

    fn create_text(&mut self, content: &str) -> NodeRef {
        let node = self.push_node(NodeData::text(content));
        self.writes.push(WriteOp::CreateText { node });
        node
    }

    fn node_kind(&self, node: NodeRef) -> Option<NodeKind> {
        self.node(node).map(|d| d.kind)
    }

    fn append_child(&mut self, parent: NodeRef, child: NodeRef) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach_from_parent(child);
        if let Some(parent_data) = self.node_mut(parent) {
            parent_data.children.push(child);
        }
        if let Some(child_data) = self.node_mut(child) {
            child_data.parent = Some(parent);
        }
        self.writes.push(WriteOp::AppendChild { parent, child });
    }

    fn replace_node(&mut self, old: NodeRef, new: NodeRef) {
        let Some(parent) = self.node(old).and_then(|d| d.parent) else {
            return;
        };
        self.detach_from_parent(new);
        let Some(parent_data) = self.node_mut(parent) else {
            return;
        };
        if let Some(slot) = parent_data.children.iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        if let Some(new_data) = self.node_mut(new) {
            new_data.parent = Some(parent);
        }
        if let Some(old_data) = self.node_mut(old) {
            old_data.parent = None;
        }
        self.writes.push(WriteOp::ReplaceNode { old, new });
    }

    fn remove_child_at(&mut self, parent: NodeRef, index: usize) {
        let Some(parent_data) = self.node_mut(parent) else {
            return;
        };
        if index >= parent_data.children.len() {
            return;
        }
        let child = parent_data.children.remove(index);
        if let Some(child_data) = self.node_mut(child) {
            child_data.parent = None;
        }
        self.writes.push(WriteOp::RemoveChild { parent, index });
    }

    fn child_count(&self, node: NodeRef) -> usize {
        self.node(node).map_or(0, |d| d.children.len())
    }

    fn child_at(&self, node: NodeRef, index: usize) -> Option<NodeRef> {
        self.node(node)?.children.get(index).copied()
    }

    fn set_attribute(&mut self, node: NodeRef, key: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            // Mirror a live surface: writing `class` replaces the class set.
            if key == "class" {
                data.classes = value.split_whitespace().map(str::to_owned).collect();
            } else if let Some(entry) = data.attrs.iter_mut().find(|(k, _)| k == key) {
                entry.1 = value.to_owned();
            } else {
                data.attrs.push((key.to_owned(), value.to_owned()));
            }
            self.writes.push(WriteOp::SetAttribute {
                node,
                key: key.to_owned(),
            });
        }
    }

    fn remove_attribute(&mut self, node: NodeRef, key: &str) {
        if let Some(data) = self.node_mut(node) {
            if key == "class" {
                data.classes.clear();
            } else {
                data.attrs.retain(|(k, _)| k != key);
            }
            self.writes.push(WriteOp::RemoveAttribute {
                node,
                key: key.to_owned(),
            });
        }
    }

    fn attribute(&self, node: NodeRef, key: &str) -> Option<String> {
        let data = self.node(node)?;
        if key == "class" {
            if data.classes.is_empty() {
                return None;
            }
            return Some(data.classes.join(" "));
        }
        data.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn add_class(&mut self, node: NodeRef, class: &str) {
        if let Some(data) = self.node_mut(node) {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_owned());
            }
            self.writes.push(WriteOp::AddClass {
                node,
                class: class.to_owned(),
            });
        }
    }

    fn remove_class(&mut self, node: NodeRef, class: &str) {
        if let Some(data) = self.node_mut(node) {
            data.classes.retain(|c| c != class);
            self.writes.push(WriteOp::RemoveClass {
                node,
                class: class.to_owned(),
            });
        }
    }

    fn classes(&self, node: NodeRef) -> Vec<String> {
        self.node(node).map(|d| d.classes.clone()).unwrap_or_default()
    }

    fn set_text_property(&mut self, node: NodeRef, key: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            let next = PropValue::Text(value.to_owned());
            if let Some(entry) = data.props.iter_mut().find(|(k, _)| k == key) {
                entry.1 = next;
            } else {
                data.props.push((key.to_owned(), next));
            }
            self.writes.push(WriteOp::SetTextProperty {
                node,
                key: key.to_owned(),
            });
        }
    }

    fn set_bool_property(&mut self, node: NodeRef, key: &str, on: bool) {
        if let Some(data) = self.node_mut(node) {
            let next = PropValue::Bool(on);
            if let Some(entry) = data.props.iter_mut().find(|(k, _)| k == key) {
                entry.1 = next;
            } else {
                data.props.push((key.to_owned(), next));
            }
            self.writes.push(WriteOp::SetBoolProperty {
                node,
                key: key.to_owned(),
            });
        }
    }

    fn attach(&mut self, node: NodeRef, event: &str, listener: EventListener) -> ListenerRef {
        let listener_ref = ListenerRef(self.listeners.len() as u32);
        self.listeners.push(ListenerSlot {
            node,
            event: event.to_owned(),
            callback: Some(listener),
        });
        self.attach_count += 1;
        self.writes.push(WriteOp::Attach {
            node,
            event: event.to_owned(),
        });
        listener_ref
    }

    fn detach(&mut self, listener: ListenerRef) {
        if let Some(slot) = self.listeners.get_mut(listener.0 as usize) {
            slot.callback = None;
        }
        self.writes.push(WriteOp::Detach { listener });
    }
}
