#![forbid(unsafe_code)]

//! Tree model, reconciler, and hydration for Graft.
//!
//! # Role in Graft
//! `graft-dom` is the presentation kernel. It owns the declarative tree
//! description, the host-surface boundary, and every algorithm that touches
//! a live tree: build, diff/patch, hydrate, and static rendering. It knows
//! nothing about application state or the message loop.
//!
//! # Primary responsibilities
//! - **Node / Element**: immutable tree descriptions built by `view`.
//! - **Dom**: the host trait any presentation surface implements.
//! - **Reconciler**: positional diff/patch with one-shot listener re-arming.
//! - **Hydration**: adopting server-rendered trees by attaching listeners.
//! - **MemoryDom**: headless host with a write journal, for CI.
//!
//! # How it fits in the system
//! The runtime (`graft-runtime`) evaluates an application's `view` into a
//! `Node` tree and hands it to this crate's `Reconciler` against whatever
//! `Dom` the host provides. Everything here is synchronous and
//! deterministic; the same inputs produce the same host calls.

pub mod apply;
pub mod attr;
pub mod dom;
pub mod event;
pub mod html;
pub mod memory;
pub mod node;
pub mod reconcile;
pub mod tag;

pub use attr::Attribute;
pub use dom::{Dom, EventListener, ListenerRef, NodeKind, NodeRef};
pub use event::{Dispatcher, EventDescriptor, UiEvent, on_change, on_click, on_input, on_keydown};
pub use html::{materialize, render_to_string};
pub use memory::{MemoryDom, WriteOp};
pub use node::{Element, Node};
pub use reconcile::{ListenerTable, PatchReport, Reconciler};
pub use tag::Tag;
