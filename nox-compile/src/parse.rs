//! Pipeline orchestration: blocks, then headers, then values, producing a
//! validated `Document`.
//!
//! A strict depth-first pass with no feedback between stages. The first error
//! anywhere in the tree aborts the whole run.

use crate::error::CompileError;
use crate::header::{Header, classify_header};
use crate::lines::{self, Block};
use crate::types::{Document, Element, Node, Pos, Property};
use crate::value::classify_value;

/// Parse nox source text into a `Document`.
pub fn parse(source: &str) -> Result<Document, CompileError> {
    // Normalise CRLF to LF before anything else looks at the text.
    let normalised = source.replace("\r\n", "\n");
    let blocks = lines::parse_blocks(&normalised)?;

    let mut nodes = Vec::with_capacity(blocks.len());
    for block in blocks {
        nodes.push(build_node(block)?);
    }
    Ok(Document { nodes })
}

fn build_node(block: Block) -> Result<Node, CompileError> {
    let pos = Pos::new(block.line, block.indent + 1);
    match classify_header(&block.header, pos)? {
        Header::Element { tag, attrs } => {
            let mut children = Vec::with_capacity(block.children.len());
            for child in block.children {
                children.push(build_node(child)?);
            }
            Ok(Node::Element(Element {
                tag,
                attrs,
                children,
            }))
        }
        Header::Property {
            key,
            raw_value,
            value_pos,
        } => {
            if let Some(child) = block.children.first() {
                return Err(CompileError::Syntax {
                    message: format!("property '{key}' cannot contain children"),
                    pos: Pos::new(child.line, child.indent + 1),
                });
            }
            let value = classify_value(&raw_value, value_pos)?;
            Ok(Node::Property(Property { key, value }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_property_document() {
        let doc = parse("x: 0\n").unwrap();
        assert_eq!(doc.nodes.len(), 1);
        match &doc.nodes[0] {
            Node::Property(p) => {
                assert_eq!(p.key, "x");
                assert_eq!(p.value, Value::Number { text: "0".into() });
            }
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn nested_elements_and_interleaving() {
        let src = "rect name=\"container\":\n    width: 500\n    image name=\"icon\":\n        x: 1\n    height: 20\n";
        let doc = parse(src).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        let Node::Element(rect) = &doc.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(rect.tag, "rect");
        assert_eq!(rect.attrs, vec![("name".into(), "container".into())]);
        // Child order: property, element, property. Interleaving preserved.
        assert!(matches!(&rect.children[0], Node::Property(p) if p.key == "width"));
        assert!(matches!(&rect.children[1], Node::Element(e) if e.tag == "image"));
        assert!(matches!(&rect.children[2], Node::Property(p) if p.key == "height"));
    }

    #[test]
    fn crlf_input_accepted() {
        let doc = parse("menu:\r\n    x: 0\r\n").unwrap();
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn property_with_children_rejected() {
        // The header ends with a colon, so the block parser lets the child
        // through; the tree builder must still reject it.
        let err = parse("key: value:\n    x: 1\n").unwrap_err();
        match err {
            CompileError::Syntax { message, pos } => {
                assert!(message.contains("cannot contain children"), "{message}");
                assert_eq!(pos.line, 2);
            }
            other => panic!("expected Syntax error, got {other:?}"),
        }
    }

    #[test]
    fn value_errors_carry_value_position() {
        let err = parse("menu:\n    filename: bad\\escape\n").unwrap_err();
        match err {
            CompileError::Escape { pos, .. } => {
                assert_eq!(pos.line, 2);
                // "    filename: bad\escape" puts the backslash at column 18.
                assert_eq!(pos.column, 18);
            }
            other => panic!("expected Escape error, got {other:?}"),
        }
    }

    #[test]
    fn first_error_wins() {
        // Line 2 has a bad value, line 3 a bad header; the run reports line 2.
        let err = parse("menu:\n    a: 1 +\n    b c d\n").unwrap_err();
        assert_eq!(err.pos().line, 2);
    }
}
