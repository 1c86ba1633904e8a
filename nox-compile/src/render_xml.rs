//! Emitter: serialises a validated `Document` into the engine's markup.
//!
//! Total over valid input; every error condition has already been raised by
//! the earlier stages. Output indentation is regenerated from tree depth (one
//! tab per level) and is independent of the source's whitespace style, so the
//! same document always produces byte-identical text.

use crate::types::{Document, Element, Expr, Node, Operand, Property, Value};

const INDENT: &str = "\t";

/// Render a `Document` as engine markup text.
pub fn to_xml(doc: &Document) -> String {
    let mut out = String::new();
    for node in &doc.nodes {
        render_node(&mut out, node, 0);
    }
    out
}

fn render_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Element(el) => render_element(out, el, depth),
        Node::Property(prop) => {
            push_indent(out, depth);
            render_property(out, prop);
            out.push('\n');
        }
    }
}

fn render_element(out: &mut String, el: &Element, depth: usize) {
    push_indent(out, depth);
    out.push('<');
    out.push_str(&el.tag);
    for (key, val) in &el.attrs {
        out.push_str(&format!(" {key}=\"{}\"", escape_attr(val)));
    }
    out.push('>');

    if el.children.is_empty() {
        out.push_str(&format!("</{}>\n", el.tag));
        return;
    }

    out.push('\n');
    for child in &el.children {
        render_node(out, child, depth + 1);
    }
    push_indent(out, depth);
    out.push_str(&format!("</{}>\n", el.tag));
}

/// A property renders as a single tag on one line; expression chains become
/// the accumulator operation sequence inside it.
fn render_property(out: &mut String, prop: &Property) {
    let key = &prop.key;
    match &prop.value {
        Value::Entity { name } => out.push_str(&format!("<{key}>&{name};</{key}>")),
        Value::Number { text } => out.push_str(&format!("<{key}>{text}</{key}>")),
        Value::StringLiteral { text } => out.push_str(&format!("<{key}>{text}</{key}>")),
        Value::Expression { expr } => {
            out.push_str(&format!("<{key}>"));
            render_expr(out, expr);
            out.push_str(&format!("</{key}>"));
        }
    }
}

fn render_expr(out: &mut String, expr: &Expr) {
    match &expr.first {
        // A lone literal needs no wrapper at all.
        Operand::Literal { text } if expr.rest.is_empty() => {
            out.push_str(text);
            return;
        }
        // A literal seeding a longer chain becomes a copy node with a body.
        Operand::Literal { text } => out.push_str(&format!("<copy>{text}</copy>")),
        Operand::Trait { src, name } => {
            out.push_str(&format!("<copy src=\"{}\" trait=\"{name}\" />", src.call()));
        }
    }

    for (op, operand) in &expr.rest {
        let tag = op.tag();
        match operand {
            Operand::Literal { text } => out.push_str(&format!("<{tag}>{text}</{tag}>")),
            Operand::Trait { src, name } => {
                out.push_str(&format!("<{tag} src=\"{}\" trait=\"{name}\" />", src.call()));
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Attribute values went through `\"` decoding at parse time; a literal quote
/// must be re-escaped the XML way to keep the output well formed.
fn escape_attr(val: &str) -> String {
    if val.contains('"') {
        val.replace('"', "&quot;")
    } else {
        val.to_string()
    }
}
