#![forbid(unsafe_code)]

//! Static markup rendering and host materialization.
//!
//! [`render_to_string`] turns a tree description into markup without any
//! host, for server-side rendering and snapshot tests. It honors the same
//! attribute-vs-property routing, class-list merging, and boolean-attribute
//! conventions as live application, and emits attributes in the canonical
//! order [`MemoryDom`](crate::memory::MemoryDom) serializes with: `class`
//! first, plain attributes in declaration order, interactive properties
//! last. Building a description into a host therefore produces a tree whose
//! `outer_html` equals rendering the description directly — the agreement
//! hydration relies on.
//!
//! [`materialize`] is the host-side counterpart: it builds the structural
//! equivalent of parsing that markup into a host, attaching no listeners —
//! the seed for hydration targets in tests.

use crate::apply::{apply_attribute, is_property};
use crate::attr::Attribute;
use crate::dom::{Dom, NodeRef};
use crate::node::{Element, Node};

/// Render a tree description as markup.
#[must_use]
pub fn render_to_string<M>(node: &Node<M>) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Build the live structure `render_to_string` describes, without
/// listeners.
pub fn materialize<M, D: Dom>(dom: &mut D, node: &Node<M>) -> NodeRef {
    match node {
        Node::Text(content) => dom.create_text(content),
        Node::Element(el) => {
            let live = dom.create_element(el.tag);
            for child in &el.children {
                let built = materialize(dom, child);
                dom.append_child(live, built);
            }
            for attr in &el.attrs {
                apply_attribute(dom, live, el.tag, attr);
            }
            live
        }
    }
}

fn write_node<M>(node: &Node<M>, out: &mut String) {
    match node {
        Node::Text(content) => out.push_str(&escape_text(content)),
        Node::Element(el) => write_element(el, out),
    }
}

fn write_element<M>(el: &Element<M>, out: &mut String) {
    let (classes, plain, props) = fold_attrs(el);

    out.push('<');
    out.push_str(el.tag.as_str());
    if !classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attr(&classes.join(" ")));
        out.push('"');
    }
    for (key, value) in &plain {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    for (key, value) in &props {
        match value {
            Prop::Text(value) => {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            Prop::Bool(true) => {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(key);
                out.push('"');
            }
            Prop::Bool(false) => {}
        }
    }
    out.push('>');

    if el.tag.is_void() {
        return;
    }
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(el.tag.as_str());
    out.push('>');
}

enum Prop {
    Text(String),
    Bool(bool),
}

/// Replay the declared attributes through the application policy, yielding
/// the final class list, plain-attribute map, and property map a live host
/// would hold after a fresh build.
fn fold_attrs<M>(el: &Element<M>) -> (Vec<String>, Vec<(String, String)>, Vec<(String, Prop)>) {
    let mut classes: Vec<String> = Vec::new();
    let mut plain: Vec<(String, String)> = Vec::new();
    let mut props: Vec<(String, Prop)> = Vec::new();

    for attr in &el.attrs {
        match attr {
            Attribute::Text { key, value } if key == "class" => {
                let next: Vec<&str> = value.split_whitespace().collect();
                for class in &next {
                    if !classes.iter().any(|c| c == class) {
                        classes.push((*class).to_owned());
                    }
                }
                classes.retain(|c| next.iter().any(|n| n == c));
            }
            Attribute::Flag { key, value } if key == "class" => {
                // The boolean fallback writes `class="class"`, which on a
                // live surface replaces the class set wholesale.
                if *value {
                    classes = vec!["class".to_owned()];
                } else if classes == ["class"] {
                    classes.clear();
                }
            }
            Attribute::Text { key, value } if is_property(el.tag, key) => {
                upsert(&mut props, key, Prop::Text(value.clone()));
            }
            Attribute::Flag { key, value } if is_property(el.tag, key) => {
                upsert(&mut props, key, Prop::Bool(*value));
            }
            Attribute::Text { key, value } => {
                upsert(&mut plain, key, value.clone());
            }
            Attribute::Flag { key, value: true } => {
                upsert(&mut plain, key, key.clone());
            }
            Attribute::Flag { key, value: false } => {
                if plain.iter().any(|(k, v)| k == key && v == key) {
                    plain.retain(|(k, _)| k != key);
                }
            }
        }
    }

    (classes, plain, props)
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: &str, value: V) {
    if let Some(entry) = entries.iter_mut().find(|(k, _)| k == key) {
        entry.1 = value;
    } else {
        entries.push((key.to_owned(), value));
    }
}

pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr;
    use crate::memory::{MemoryDom, WriteOp};
    use crate::tag::Tag;

    type N = Node<()>;

    fn form_field() -> N {
        Element::new(Tag::Input)
            .attr(attr::class("field"))
            .attr(attr::input_type("text"))
            .attr(attr::placeholder("name"))
            .attr(attr::checked(true))
            .attr(attr::value("Ada"))
            .into()
    }

    #[test]
    fn canonical_order_is_class_plain_then_properties() {
        assert_eq!(
            render_to_string(&form_field()),
            r#"<input class="field" type="text" placeholder="name" checked="checked" value="Ada">"#
        );
    }

    #[test]
    fn text_and_attribute_values_are_escaped() {
        let node: N = Element::new(Tag::P)
            .attr(attr::text("title", "a\"b<c"))
            .text("1 < 2 & 3 > 2")
            .into();
        assert_eq!(
            render_to_string(&node),
            r#"<p title="a&quot;b&lt;c">1 &lt; 2 &amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn false_flags_are_omitted() {
        let node: N = Element::new(Tag::Div)
            .attr(attr::flag("hidden", false))
            .into();
        assert_eq!(render_to_string(&node), "<div></div>");
    }

    #[test]
    fn true_flags_use_the_key_as_value() {
        let node: N = Element::new(Tag::Div)
            .attr(attr::flag("hidden", true))
            .into();
        assert_eq!(render_to_string(&node), r#"<div hidden="hidden"></div>"#);
    }

    #[test]
    fn void_tags_swallow_children() {
        let node: N = Element::new(Tag::Br).text("ignored").into();
        assert_eq!(render_to_string(&node), "<br>");
    }

    #[test]
    fn repeated_keys_collapse_like_live_writes() {
        let node: N = Element::new(Tag::Div)
            .attr(attr::text("data-k", "one"))
            .attr(attr::id("root"))
            .attr(attr::text("data-k", "two"))
            .into();
        assert_eq!(
            render_to_string(&node),
            r#"<div data-k="two" id="root"></div>"#
        );
    }

    #[test]
    fn later_class_declaration_wins() {
        let node: N = Element::new(Tag::Div)
            .attr(attr::class("a b"))
            .attr(attr::class("b c"))
            .into();
        assert_eq!(render_to_string(&node), r#"<div class="b c"></div>"#);
    }

    #[test]
    fn materialize_matches_rendering_and_attaches_nothing() {
        let tree: N = Element::new(Tag::Div)
            .attr(attr::class("row"))
            .child(form_field())
            .child(Element::new(Tag::Span).text("hi"))
            .into();
        let mut dom = MemoryDom::new();
        let live = materialize(&mut dom, &tree);
        assert_eq!(dom.outer_html(live), render_to_string(&tree));
        assert!(dom
            .writes()
            .iter()
            .all(|op| !matches!(op, WriteOp::Attach { .. })));
    }
}
