#![forbid(unsafe_code)]

//! End-to-end form flow through a mounted program.
//!
//! Drives the canonical name-collecting form: a text input bound to the
//! draft name, a commit button, and a checkbox list of collected names.
//! Events fire on the live surface, the pump dispatches them, and every
//! assertion reads either the model or the patched markup.

use graft_dom::{
    Dom, Element, MemoryDom, Node, NodeRef, Tag, UiEvent, attr, on_change, on_click, on_input,
};
use graft_runtime::{Application, Cmd, Program};

// ============================================================================
// Helper: the name book application
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Msg {
    NameEdited(String),
    CommitName,
    NameToggled(String, bool),
}

#[derive(Default)]
struct NameBook {
    current_name: String,
    names: Vec<String>,
    checked_names: Vec<String>,
}

impl Application for NameBook {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::NameEdited(name) => self.current_name = name,
            Msg::CommitName => {
                if !self.current_name.is_empty() {
                    let name = std::mem::take(&mut self.current_name);
                    if !self.names.contains(&name) {
                        self.checked_names.push(name.clone());
                        self.names.push(name);
                    }
                }
            }
            Msg::NameToggled(name, on) => {
                if on {
                    if !self.checked_names.contains(&name) {
                        self.checked_names.push(name);
                    }
                } else {
                    self.checked_names.retain(|checked| *checked != name);
                }
            }
        }
        Cmd::none()
    }

    fn view(&self) -> Node<Msg> {
        let mut list = Element::new(Tag::Ul).attr(attr::class("names"));
        for name in &self.names {
            let checked = self.checked_names.contains(name);
            let toggled = {
                let name = name.clone();
                move |on| Msg::NameToggled(name.clone(), on)
            };
            list = list.child(
                Element::new(Tag::Li)
                    .child(
                        Element::new(Tag::Input)
                            .attr(attr::input_type("checkbox"))
                            .attr(attr::checked(checked))
                            .on(on_change(toggled)),
                    )
                    .text(name.clone()),
            );
        }
        Element::new(Tag::Div)
            .attr(attr::class("name-book"))
            .child(
                Element::new(Tag::Input)
                    .attr(attr::placeholder("name"))
                    .attr(attr::value(self.current_name.clone()))
                    .on(on_input(Msg::NameEdited)),
            )
            .child(
                Element::new(Tag::Button)
                    .on(on_click(Msg::CommitName))
                    .text("add"),
            )
            .child(list)
            .into()
    }
}

fn mounted() -> Program<NameBook, MemoryDom> {
    let mut dom = MemoryDom::new();
    let container = dom.create_element(Tag::Main);
    Program::mount(dom, NameBook::default(), Some(container))
}

fn root(program: &Program<NameBook, MemoryDom>) -> NodeRef {
    program.root().expect("program is mounted")
}

/// Child paths under the form root.
const DRAFT_INPUT: &[usize] = &[0];
const ADD_BUTTON: &[usize] = &[1];
const NAME_LIST: &[usize] = &[2];

fn node_at(program: &Program<NameBook, MemoryDom>, path: &[usize]) -> NodeRef {
    program
        .dom()
        .node_at_path(root(program), path)
        .expect("path resolves to a live node")
}

/// Labels of the list entries whose checkbox is currently checked.
fn checked_labels(program: &Program<NameBook, MemoryDom>) -> Vec<String> {
    let dom = program.dom();
    let list = node_at(program, NAME_LIST);
    let mut labels = Vec::new();
    for entry in dom.children_of(list) {
        let checkbox = dom.child_at(entry, 0).expect("entry checkbox");
        if dom.bool_property(checkbox, "checked") == Some(true) {
            labels.push(dom.text_content(entry));
        }
    }
    labels
}

fn type_name(program: &mut Program<NameBook, MemoryDom>, name: &str) {
    let input = node_at(program, DRAFT_INPUT);
    assert_eq!(program.dom_mut().fire(input, &UiEvent::input(name)), 1);
    program.pump();
}

fn click_add(program: &mut Program<NameBook, MemoryDom>) {
    let button = node_at(program, ADD_BUTTON);
    assert_eq!(program.dom_mut().fire(button, &UiEvent::Click), 1);
    program.pump();
}

// ============================================================================
// The commit flow
// ============================================================================

#[test]
fn commit_flow_collects_and_checks_the_name() {
    let mut program = mounted();
    program.dom().assert_html(
        root(&program),
        "<div class=\"name-book\">\
         <input placeholder=\"name\" value=\"\">\
         <button>add</button>\
         <ul class=\"names\"></ul></div>",
    );

    type_name(&mut program, "Ada");
    assert_eq!(program.app().current_name, "Ada");

    click_add(&mut program);
    assert_eq!(program.app().current_name, "");
    assert_eq!(program.app().names, vec!["Ada".to_owned()]);
    assert_eq!(program.app().checked_names, vec!["Ada".to_owned()]);

    assert_eq!(checked_labels(&program), vec!["Ada".to_owned()]);
    program.dom().assert_html(
        root(&program),
        "<div class=\"name-book\">\
         <input placeholder=\"name\" value=\"\">\
         <button>add</button>\
         <ul class=\"names\"><li><input type=\"checkbox\" checked=\"checked\">Ada</li></ul>\
         </div>",
    );
}

#[test]
fn toggling_unchecks_the_entry_without_removing_it() {
    let mut program = mounted();
    type_name(&mut program, "Ada");
    click_add(&mut program);

    let checkbox = node_at(&program, &[2, 0, 0]);
    assert_eq!(
        program
            .dom_mut()
            .fire(checkbox, &UiEvent::Toggle { checked: false }),
        1
    );
    program.pump();

    assert_eq!(program.app().names, vec!["Ada".to_owned()]);
    assert!(program.app().checked_names.is_empty());
    assert!(checked_labels(&program).is_empty());

    let checkbox = node_at(&program, &[2, 0, 0]);
    assert_eq!(
        program.dom().bool_property(checkbox, "checked"),
        Some(false),
        "unchecking flips the property rather than dropping the entry"
    );
    assert_eq!(program.dom().child_count(node_at(&program, NAME_LIST)), 1);
}

#[test]
fn empty_commit_changes_nothing() {
    let mut program = mounted();
    let before = program.dom().outer_html(root(&program));

    click_add(&mut program);

    assert!(program.app().names.is_empty());
    let report = program.last_report();
    assert_eq!(report.replaced, 0);
    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(program.dom().outer_html(root(&program)), before);
}

#[test]
fn duplicate_commit_keeps_a_single_entry() {
    let mut program = mounted();
    type_name(&mut program, "Ada");
    click_add(&mut program);
    type_name(&mut program, "Ada");
    click_add(&mut program);

    assert_eq!(program.app().names, vec!["Ada".to_owned()]);
    assert_eq!(program.app().checked_names, vec!["Ada".to_owned()]);
    assert_eq!(program.dom().child_count(node_at(&program, NAME_LIST)), 1);
}

// ============================================================================
// One-shot listeners across dispatch cycles
// ============================================================================

#[test]
fn every_cycle_rearms_the_form() {
    let mut program = mounted();

    for (cycle, name) in ["Ada", "Grace", "Edsger"].iter().enumerate() {
        let attaches_before = program.dom().attach_count();

        let input = node_at(&program, DRAFT_INPUT);
        assert_eq!(program.dom_mut().fire(input, &UiEvent::input(*name)), 1);
        assert_eq!(
            program.dom().armed_count(input, "input"),
            0,
            "cycle {cycle}: a fired listener stays disarmed until the patch"
        );
        program.pump();

        let input = node_at(&program, DRAFT_INPUT);
        assert_eq!(
            program.dom().armed_count(input, "input"),
            1,
            "cycle {cycle}: the patch re-subscribes the input"
        );
        assert!(
            program.dom().attach_count() > attaches_before,
            "cycle {cycle}: re-subscription registers fresh listeners"
        );

        click_add(&mut program);
    }

    assert_eq!(
        program.app().names,
        vec!["Ada".to_owned(), "Grace".to_owned(), "Edsger".to_owned()]
    );
    assert_eq!(program.dom().child_count(node_at(&program, NAME_LIST)), 3);
}
