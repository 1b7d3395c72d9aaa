#![forbid(unsafe_code)]

//! Tree construction, reconciliation, and hydration.
//!
//! The [`Reconciler`] drives every live-tree mutation in the system. It
//! owns no state of its own beyond borrowed collaborators: a host surface,
//! a [`Dispatcher`] for wiring listeners, and the [`ListenerTable`] that
//! tracks native registrations per live node.
//!
//! Patch policy, in order:
//!
//! 1. Node kinds differ (text vs element, or different tags): discard the
//!    live subtree — purging its listener registrations — build the new
//!    description fresh, and splice it in place.
//! 2. Both text with equal content: no write at all.
//! 3. Same-tag elements: re-subscribe listeners unconditionally, apply a
//!    symmetric attribute diff (equal values issue no writes), then recurse
//!    into children by position and trim trailing live children.
//!
//! Children pair **by position only**. A mid-list insertion or removal
//! therefore diffs every later sibling against the wrong counterpart and
//! pays for it in rebuilds; callers that need cheap list edits restructure
//! the view instead.
//!
//! Native listeners fire at most once. Rule 3's unconditional
//! re-subscription is what re-arms them every cycle; stale handles from a
//! fired listener detach as no-ops. Any change to this scheme has to keep
//! the two halves in agreement.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::apply::{apply_attribute, clear_attribute};
use crate::dom::{Dom, EventListener, ListenerRef, NodeKind, NodeRef};
use crate::event::{Dispatcher, EventDescriptor, UiEvent};
use crate::node::{Element, Node};

// ---------------------------------------------------------------------------
// ListenerTable
// ---------------------------------------------------------------------------

type Handles = SmallVec<[ListenerRef; 2]>;

/// Side table of native listener registrations, keyed by live node.
///
/// The tree description stays immutable; what the engine needs to remember
/// between cycles — which registrations belong to which live node — lives
/// here. Entries are recorded at attach time, taken (and detached) when the
/// node is next patched, and purged when its subtree is discarded.
#[derive(Debug, Default)]
pub struct ListenerTable {
    entries: FxHashMap<NodeRef, Handles>,
}

impl ListenerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes with at least one recorded registration.
    #[must_use]
    pub fn tracked_nodes(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, node: NodeRef, handle: ListenerRef) {
        self.entries.entry(node).or_default().push(handle);
    }

    /// Remove and return every handle recorded for `node`.
    fn take(&mut self, node: NodeRef) -> Handles {
        self.entries.remove(&node).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// PatchReport
// ---------------------------------------------------------------------------

/// Counts of what one patch pass did. Observability only — no behavior
/// depends on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    /// Subtrees discarded and rebuilt.
    pub replaced: usize,
    /// Same-tag elements updated in place.
    pub patched: usize,
    /// Children built for positions with no live counterpart.
    pub added: usize,
    /// Trailing live children removed.
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Builds, patches, and hydrates live trees from descriptions.
pub struct Reconciler<'a, M, D: Dom> {
    dom: &'a mut D,
    dispatcher: Dispatcher<M>,
    listeners: &'a mut ListenerTable,
}

impl<'a, M: 'static, D: Dom> Reconciler<'a, M, D> {
    pub fn new(
        dom: &'a mut D,
        dispatcher: Dispatcher<M>,
        listeners: &'a mut ListenerTable,
    ) -> Self {
        Self {
            dom,
            dispatcher,
            listeners,
        }
    }

    /// Build a live subtree for `node` and return its root.
    ///
    /// Elements wire up listeners first, then children in order, then
    /// attributes; the returned root is detached until the caller splices
    /// it somewhere.
    pub fn build(&mut self, node: &Node<M>) -> NodeRef {
        match node {
            Node::Text(content) => self.dom.create_text(content),
            Node::Element(el) => {
                let live = self.dom.create_element(el.tag);
                for descriptor in &el.events {
                    self.attach(live, descriptor);
                }
                for child in &el.children {
                    let built = self.build(child);
                    self.dom.append_child(live, built);
                }
                for attr in &el.attrs {
                    apply_attribute(self.dom, live, el.tag, attr);
                }
                live
            }
        }
    }

    /// Bring the live tree rooted at `live` (built from `prev`) in line
    /// with `next`.
    ///
    /// Returns the live root afterwards — a fresh node when the root itself
    /// was replaced — plus the pass's [`PatchReport`].
    pub fn patch(
        &mut self,
        prev: &Node<M>,
        next: &Node<M>,
        live: NodeRef,
    ) -> (NodeRef, PatchReport) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("patch").entered();

        let mut report = PatchReport::default();
        let root = self.patch_node(prev, next, live, &mut report);
        (root, report)
    }

    /// Attach listeners for `node`'s descriptors onto an existing live
    /// tree, without touching structure or attributes.
    ///
    /// Children recurse by index; an index with no live child is skipped.
    /// Structural agreement between description and live tree is a
    /// precondition — debug builds assert node kinds line up, release
    /// builds mis-attach silently.
    pub fn hydrate(&mut self, node: &Node<M>, live: NodeRef) {
        match node {
            Node::Text(_) => {
                debug_assert!(
                    matches!(self.dom.node_kind(live), Some(NodeKind::Text)),
                    "hydrate: live node {live:?} is not a text node",
                );
            }
            Node::Element(el) => {
                debug_assert!(
                    matches!(
                        self.dom.node_kind(live),
                        Some(NodeKind::Element(tag)) if tag == el.tag
                    ),
                    "hydrate: live node {live:?} does not carry tag {}",
                    el.tag,
                );
                for descriptor in &el.events {
                    self.attach(live, descriptor);
                }
                for (index, child) in el.children.iter().enumerate() {
                    if let Some(live_child) = self.dom.child_at(live, index) {
                        self.hydrate(child, live_child);
                    }
                }
            }
        }
    }

    // --- Internals ---

    fn patch_node(
        &mut self,
        prev: &Node<M>,
        next: &Node<M>,
        live: NodeRef,
        report: &mut PatchReport,
    ) -> NodeRef {
        match (prev, next) {
            (Node::Text(a), Node::Text(b)) => {
                if a == b {
                    live
                } else {
                    self.rebuild(next, live, report)
                }
            }
            (Node::Element(p), Node::Element(n)) if p.tag == n.tag => {
                self.patch_element(p, n, live, report);
                live
            }
            _ => self.rebuild(next, live, report),
        }
    }

    /// Discard the live subtree and splice in a fresh build of `next`.
    fn rebuild(&mut self, next: &Node<M>, live: NodeRef, report: &mut PatchReport) -> NodeRef {
        self.purge(live);
        let fresh = self.build(next);
        self.dom.replace_node(live, fresh);
        report.replaced += 1;
        fresh
    }

    fn patch_element(
        &mut self,
        prev: &Element<M>,
        next: &Element<M>,
        live: NodeRef,
        report: &mut PatchReport,
    ) {
        // Listeners are one-shot on the host side, so every patch re-arms
        // them: detach whatever was recorded, then attach the new set.
        for handle in self.listeners.take(live) {
            self.dom.detach(handle);
        }
        for descriptor in &next.events {
            self.attach(live, descriptor);
        }

        self.patch_attrs(prev, next, live);

        for (index, next_child) in next.children.iter().enumerate() {
            match self.dom.child_at(live, index) {
                Some(live_child) => match prev.children.get(index) {
                    Some(prev_child) => {
                        self.patch_node(prev_child, next_child, live_child, report);
                    }
                    // A live child the previous description never knew
                    // about; rebuild it in place rather than trusting it.
                    None => {
                        self.rebuild(next_child, live_child, report);
                    }
                },
                None => {
                    let built = self.build(next_child);
                    self.dom.append_child(live, built);
                    report.added += 1;
                }
            }
        }

        // Trailing removal: the live child count ends at exactly the new
        // description's child count.
        let target = next.children.len();
        while self.dom.child_count(live) > target {
            let index = self.dom.child_count(live) - 1;
            if let Some(child) = self.dom.child_at(live, index) {
                self.purge(child);
            }
            self.dom.remove_child_at(live, index);
            report.removed += 1;
        }

        report.patched += 1;
    }

    /// Symmetric key diff: equal declarations issue no host call.
    fn patch_attrs(&mut self, prev: &Element<M>, next: &Element<M>, live: NodeRef) {
        for attr in &next.attrs {
            match prev.attrs.iter().find(|p| p.key() == attr.key()) {
                Some(unchanged) if unchanged == attr => {}
                _ => apply_attribute(self.dom, live, next.tag, attr),
            }
        }
        for attr in &prev.attrs {
            if !next.attrs.iter().any(|n| n.key() == attr.key()) {
                clear_attribute(self.dom, live, attr.key());
            }
        }
    }

    /// Detach every registration recorded anywhere in the live subtree.
    fn purge(&mut self, live: NodeRef) {
        for handle in self.listeners.take(live) {
            self.dom.detach(handle);
        }
        let count = self.dom.child_count(live);
        for index in 0..count {
            if let Some(child) = self.dom.child_at(live, index) {
                self.purge(child);
            }
        }
    }

    fn attach(&mut self, live: NodeRef, descriptor: &EventDescriptor<M>) {
        let dispatcher = self.dispatcher.clone();
        let convert = descriptor.converter();
        let listener: EventListener = Box::new(move |event: &UiEvent| {
            dispatcher.send(convert(event));
        });
        let handle = self.dom.attach(live, descriptor.name(), listener);
        self.listeners.record(live, handle);
    }
}
