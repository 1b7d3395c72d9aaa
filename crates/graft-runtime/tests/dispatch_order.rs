//! Property-based ordering invariants for the dispatch loop.
//!
//! These must hold for **any** message sequence, not just the curated
//! cycles in the unit suite:
//!
//! 1. Dispatching a sequence leaves the model equal to a direct fold of
//!    the same messages over `update`.
//! 2. The live surface always serializes like a fresh render of the
//!    folded model.
//! 3. A command burst pumps into the same state as one-at-a-time
//!    dispatch: every enqueued message gets its own cycle, in order.
//! 4. A detached program ignores every message.

use graft_dom::{Dom, Element, MemoryDom, Node, Tag, render_to_string};
use graft_runtime::{Application, Cmd, Program};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Add(i32),
    Negate,
    Reset,
    Burst(Vec<Op>),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Tally {
    total: i64,
    history: Vec<i64>,
}

/// The oracle: what one message must do to the model.
fn fold(tally: &mut Tally, op: &Op) {
    match op {
        Op::Add(v) => {
            tally.total = tally.total.saturating_add(i64::from(*v));
            tally.history.push(tally.total);
        }
        Op::Negate => {
            tally.total = -tally.total;
            tally.history.push(tally.total);
        }
        Op::Reset => {
            tally.total = 0;
            tally.history.clear();
        }
        Op::Burst(ops) => {
            for op in ops {
                fold(tally, op);
            }
        }
    }
}

impl Application for Tally {
    type Message = Op;

    fn update(&mut self, msg: Op) -> Cmd<Op> {
        match msg {
            Op::Burst(ops) => {
                return Cmd::batch(ops.into_iter().map(Cmd::msg).collect());
            }
            op => fold(self, &op),
        }
        Cmd::none()
    }

    fn view(&self) -> Node<Op> {
        let mut history = Element::new(Tag::Ol);
        for entry in &self.history {
            history = history.child(Element::new(Tag::Li).text(entry.to_string()));
        }
        Element::new(Tag::Div)
            .child(Element::new(Tag::P).text(self.total.to_string()))
            .child(history)
            .into()
    }
}

fn mounted() -> Program<Tally, MemoryDom> {
    let mut dom = MemoryDom::new();
    let container = dom.create_element(Tag::Main);
    Program::mount(dom, Tally::default(), Some(container))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1000i32..1000).prop_map(Op::Add),
        1 => Just(Op::Negate),
        1 => Just(Op::Reset),
    ]
}

fn op_sequence() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..24)
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Dispatch is a fold, and the surface tracks it
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dispatch_matches_a_direct_fold(ops in op_sequence()) {
        let mut program = mounted();
        let mut expected = Tally::default();

        for op in &ops {
            fold(&mut expected, op);
            program.dispatch(op.clone());
        }

        prop_assert_eq!(program.app(), &expected);

        let root = program.root().expect("mounted program has a root");
        prop_assert_eq!(
            program.dom().outer_html(root),
            render_to_string(&expected.view()),
            "live surface diverged from a fresh render of the folded model"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Command bursts preserve order, one cycle per message
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn a_pumped_burst_equals_sequential_dispatch(ops in op_sequence()) {
        let mut sequential = mounted();
        for op in &ops {
            sequential.dispatch(op.clone());
        }

        let mut burst = mounted();
        burst.dispatch(Op::Burst(ops.clone()));
        let drained = burst.pump();

        prop_assert_eq!(drained, ops.len(), "one inbox cycle per burst entry");
        prop_assert_eq!(burst.app(), sequential.app());

        let root = burst.root().expect("mounted program has a root");
        let want = sequential.root().expect("mounted program has a root");
        prop_assert_eq!(
            burst.dom().outer_html(root),
            sequential.dom().outer_html(want)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Detached programs ignore everything
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn a_detached_program_ignores_every_message(ops in op_sequence()) {
        let mut program = Program::mount(MemoryDom::new(), Tally::default(), None);

        for op in &ops {
            program.dispatch(op.clone());
        }

        prop_assert_eq!(program.app(), &Tally::default());
        prop_assert!(program.root().is_none());
        prop_assert!(!program.is_mounted());
    }
}
