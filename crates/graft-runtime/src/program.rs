#![forbid(unsafe_code)]

//! Elm-style dispatch loop for Graft applications.
//!
//! The program runtime manages the update/view cycle: it holds the
//! application state, feeds it messages one at a time, and reconciles the
//! live tree after every update. State (the [`Application`]) is separated
//! from presentation (the `Dom` host), with a command pattern for effects.
//!
//! # Example
//!
//! ```
//! use graft_dom::{Dom, Element, MemoryDom, Node, Tag, UiEvent, on_click};
//! use graft_runtime::program::{Application, Cmd, Program};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! #[derive(Clone)]
//! enum Msg {
//!     Increment,
//! }
//!
//! impl Application for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => self.count += 1,
//!         }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self) -> Node<Msg> {
//!         Element::new(Tag::Button)
//!             .on(on_click(Msg::Increment))
//!             .text(format!("count: {}", self.count))
//!             .into()
//!     }
//! }
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.create_element(Tag::Div);
//! let mut program = Program::mount(dom, Counter { count: 0 }, Some(container));
//!
//! let button = program.root().unwrap();
//! program.dom_mut().fire(button, &UiEvent::Click);
//! program.pump();
//! assert_eq!(program.app().count, 1);
//! ```

use std::sync::mpsc;
use std::time::Duration;

use graft_dom::dom::{Dom, NodeRef};
use graft_dom::event::Dispatcher;
use graft_dom::node::Node;
use graft_dom::reconcile::{ListenerTable, PatchReport, Reconciler};
use tracing::{debug, info, warn};
use web_time::Instant;

/// The Application trait defines model state and behavior.
///
/// The implementing value *is* the model: `update` replaces state in
/// place, `view` derives a fresh tree description from it.
pub trait Application: Sized {
    /// The message type for this application.
    type Message: 'static;

    /// Initialize with startup commands.
    ///
    /// Called once on a successful mount or hydrate, never on a detached
    /// program.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns a command for
    /// any effect that should follow.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Derive the current tree description from the model.
    ///
    /// Called after every update; the result is reconciled against the
    /// live tree.
    fn view(&self) -> Node<Self::Message>;
}

/// Commands represent effects returned from `init()` and `update()`.
///
/// A command never runs inside the update that produced it: messages are
/// enqueued for a full cycle of their own, delays go onto the timer list.
/// Updates themselves stay pure state transitions.
#[derive(Debug, Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Enqueue a message for the next pump, behind anything already queued.
    Msg(M),
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Deliver `msg` once at least `after` has elapsed.
    ///
    /// There is no cancellation: once scheduled, the message will be
    /// delivered by the tick that first observes its deadline.
    Delay { after: Duration, msg: M },
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        if cmds.is_empty() {
            Self::None
        } else if cmds.len() == 1 {
            cmds.into_iter().next().unwrap_or(Self::None)
        } else {
            Self::Batch(cmds)
        }
    }

    /// Create a delayed message command.
    #[inline]
    pub fn delay(after: Duration, msg: M) -> Self {
        Self::Delay { after, msg }
    }
}

/// A scheduled future message.
struct Timer<M> {
    due: Instant,
    msg: M,
}

/// Where the program is in its lifecycle.
enum Phase<M> {
    /// No live tree; messages are dropped and the model stays frozen.
    Detached,
    /// Mounted or hydrated, with the description the live tree was last
    /// reconciled against and the live root itself.
    Running { previous: Node<M>, root: NodeRef },
}

/// The program runtime that owns the application, its host surface, and
/// the dispatch loop.
///
/// Everything is single-threaded and strictly sequential: a dispatch
/// cycle runs update, effects, view, and patch to completion before the
/// next message is looked at. `&mut self` on every entry point makes
/// reentrant dispatch unrepresentable.
pub struct Program<A: Application, D: Dom> {
    /// The application model.
    app: A,
    /// The live presentation surface.
    dom: D,
    /// Native listener registrations, keyed by live node.
    listeners: ListenerTable,
    /// Sending half of the inbox; cloned into every wired listener.
    dispatcher: Dispatcher<A::Message>,
    /// Receiving half of the inbox.
    inbox: mpsc::Receiver<A::Message>,
    /// Scheduled delays, in insertion order.
    timers: Vec<Timer<A::Message>>,
    /// Lifecycle phase.
    phase: Phase<A::Message>,
    /// Report from the most recent patch.
    last_report: PatchReport,
}

impl<A: Application, D: Dom> Program<A, D> {
    /// Build the application's view into `container` and start running.
    ///
    /// `container: None` models a failed mount-point lookup: the program
    /// is constructed detached — `init` never runs, the model stays at its
    /// initial value, and every dispatched message is dropped. The miss is
    /// reported once via `tracing`.
    pub fn mount(dom: D, app: A, container: Option<NodeRef>) -> Self {
        let mut program = Self::detached(dom, app);
        let Some(container) = container else {
            warn!("mount container not found; program stays detached");
            return program;
        };

        let cmd = program.app.init();
        program.execute_cmd(cmd, Instant::now());

        let tree = program.app.view();
        let root = {
            let mut reconciler = Reconciler::new(
                &mut program.dom,
                program.dispatcher.clone(),
                &mut program.listeners,
            );
            reconciler.build(&tree)
        };
        program.dom.append_child(container, root);
        info!(root = root.0, "program mounted");
        program.phase = Phase::Running {
            previous: tree,
            root,
        };
        program
    }

    /// Adopt an existing live tree at `root` by attaching listeners.
    ///
    /// The live tree must structurally agree with the application's
    /// current view — the usual source is markup produced by
    /// `render_to_string` on the same view. No structural writes are
    /// issued. `root: None` behaves exactly like a failed mount.
    pub fn hydrate(dom: D, app: A, root: Option<NodeRef>) -> Self {
        let mut program = Self::detached(dom, app);
        let Some(root) = root else {
            warn!("hydration root not found; program stays detached");
            return program;
        };

        let cmd = program.app.init();
        program.execute_cmd(cmd, Instant::now());

        let tree = program.app.view();
        {
            let mut reconciler = Reconciler::new(
                &mut program.dom,
                program.dispatcher.clone(),
                &mut program.listeners,
            );
            reconciler.hydrate(&tree, root);
        }
        info!(root = root.0, "program hydrated");
        program.phase = Phase::Running {
            previous: tree,
            root,
        };
        program
    }

    fn detached(dom: D, app: A) -> Self {
        let (tx, inbox) = mpsc::channel();
        Self {
            app,
            dom,
            listeners: ListenerTable::new(),
            dispatcher: Dispatcher::new(tx),
            inbox,
            timers: Vec::new(),
            phase: Phase::Detached,
            last_report: PatchReport::default(),
        }
    }

    /// Run one full cycle for `msg`: update, effects, view, patch.
    ///
    /// On a detached program the message is dropped.
    pub fn dispatch(&mut self, msg: A::Message) {
        self.dispatch_at(msg, Instant::now());
    }

    /// [`dispatch`](Self::dispatch) with an explicit clock, for
    /// deterministic scheduling in tests.
    pub fn dispatch_at(&mut self, msg: A::Message, now: Instant) {
        match std::mem::replace(&mut self.phase, Phase::Detached) {
            Phase::Detached => {
                debug!("message dropped: program detached");
            }
            Phase::Running { previous, root } => {
                let cmd = self.app.update(msg);
                self.execute_cmd(cmd, now);

                let next = self.app.view();
                let (root, report) = {
                    let mut reconciler = Reconciler::new(
                        &mut self.dom,
                        self.dispatcher.clone(),
                        &mut self.listeners,
                    );
                    reconciler.patch(&previous, &next, root)
                };
                debug!(
                    replaced = report.replaced,
                    patched = report.patched,
                    added = report.added,
                    removed = report.removed,
                    "patch applied"
                );
                self.last_report = report;
                self.phase = Phase::Running {
                    previous: next,
                    root,
                };
            }
        }
    }

    /// Drain the inbox, one full dispatch cycle per message, in arrival
    /// order. Messages enqueued during a cycle are drained by the same
    /// call. Returns the number of messages drained.
    pub fn pump(&mut self) -> usize {
        self.pump_at(Instant::now())
    }

    /// [`pump`](Self::pump) with an explicit clock.
    pub fn pump_at(&mut self, now: Instant) -> usize {
        let mut drained = 0;
        while let Ok(msg) = self.inbox.try_recv() {
            self.dispatch_at(msg, now);
            drained += 1;
        }
        drained
    }

    /// Fire every timer that is due, oldest deadline first, then pump.
    ///
    /// Returns the number of timers fired. Timers with equal deadlines
    /// fire in scheduling order.
    pub fn tick(&mut self) -> usize {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit clock.
    pub fn tick_at(&mut self, now: Instant) -> usize {
        let mut due = Vec::new();
        let mut pending = Vec::new();
        for timer in self.timers.drain(..) {
            if timer.due <= now {
                due.push(timer);
            } else {
                pending.push(timer);
            }
        }
        self.timers = pending;

        // Stable by deadline; insertion order breaks ties.
        due.sort_by_key(|timer| timer.due);
        let fired = due.len();
        for timer in due {
            self.dispatcher.send(timer.msg);
        }
        if fired > 0 {
            debug!(fired, "timers fired");
        }
        self.pump_at(now);
        fired
    }

    /// Earliest timer deadline, for host scheduling.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    /// Number of scheduled delays that have not fired yet.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn execute_cmd(&mut self, cmd: Cmd<A::Message>, now: Instant) {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(msg) => {
                // Behind already-queued messages, so each one still gets a
                // complete cycle in arrival order.
                self.dispatcher.send(msg);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_cmd(cmd, now);
                }
            }
            Cmd::Delay { after, msg } => {
                self.timers.push(Timer {
                    due: now + after,
                    msg,
                });
            }
        }
    }

    /// Get a reference to the application.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Get a mutable reference to the application.
    ///
    /// State changed this way is not re-rendered until the next dispatch.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Get a reference to the host surface.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Get a mutable reference to the host surface.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// The live root, when mounted or hydrated.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef> {
        match &self.phase {
            Phase::Detached => None,
            Phase::Running { root, .. } => Some(*root),
        }
    }

    /// Whether the program holds a live tree.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Report from the most recent patch.
    #[must_use]
    pub fn last_report(&self) -> PatchReport {
        self.last_report
    }
}
