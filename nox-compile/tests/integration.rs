//! Integration tests that compile complete fixture files end-to-end.

use nox_compile::{CompileError, Node, Value};

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

#[test]
fn main_menu_fixture_compiles() {
    let source = read_fixture("main_menu.nox");
    let xml = nox_compile::compile(&source).expect("fixture should compile");

    // Structure: one root, nested tags closed at mirrored depth.
    assert!(xml.starts_with("<menu name=\"main_menu\">\n"));
    assert!(xml.ends_with("</menu>\n"));
    assert!(xml.contains("\t<rect name=\"background\">\n"));
    assert!(xml.contains("\t\t<image name=\"emblem\">\n"));

    // Accumulator sequences, in source order.
    assert!(xml.contains(
        "<height><copy src=\"me()\" trait=\"width\" /><div>16</div><mult>9</mult></height>"
    ));
    assert!(xml.contains(
        "<x><copy src=\"parent()\" trait=\"width\" /><div>2</div><sub src=\"me()\" trait=\"width\" /><div>2</div></x>"
    ));
    assert!(xml.contains("<y><copy src=\"background()\" trait=\"height\" /><add>8</add></y>"));

    // Scalar values.
    assert!(xml.contains("<visible>&true;</visible>"));
    assert!(xml.contains("<filename>menu_background.dds</filename>"));
    assert!(xml.contains("<string>Main Menu</string>"));
}

#[test]
fn loading_bar_fixture_exact_output() {
    let source = read_fixture("loading_bar.nox");
    let xml = nox_compile::compile(&source).expect("fixture should compile");
    let expected = "\
<loading_bar>
\t<x>10</x>
\t<y>-4</y>
\t<width><copy src=\"parent()\" trait=\"width\" /><sub>20</sub></width>
\t<visible>&true;</visible>
</loading_bar>
";
    assert_eq!(xml, expected);
}

#[test]
fn compilation_is_deterministic() {
    let source = read_fixture("main_menu.nox");
    let first = nox_compile::compile(&source).unwrap();
    let second = nox_compile::compile(&source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn comments_and_blank_lines_do_not_affect_output() {
    let source = read_fixture("main_menu.nox");
    let stripped: String = source
        .lines()
        .map(strip_comment_for_test)
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("{l}\n"))
        .collect();

    assert_ne!(source, stripped, "fixture should actually contain comments");
    assert_eq!(
        nox_compile::compile(&source).unwrap(),
        nox_compile::compile(&stripped).unwrap()
    );
}

/// Comment stripper mirroring the format rules closely enough for the
/// fixtures, which keep `//` out of quotes and escapes.
fn strip_comment_for_test(line: &str) -> String {
    match line.find("//") {
        Some(i) => line[..i].trim_end().to_string(),
        None => line.to_string(),
    }
}

#[test]
fn parsed_tree_preserves_interleaving() {
    let source = read_fixture("main_menu.nox");
    let doc = nox_compile::parse(&source).unwrap();
    assert_eq!(doc.nodes.len(), 1);

    let Node::Element(menu) = &doc.nodes[0] else {
        panic!("root should be an element");
    };
    assert_eq!(menu.tag, "menu");

    // class property first, then the two child elements, in source order.
    assert!(matches!(&menu.children[0], Node::Property(p) if p.key == "class"));
    assert!(matches!(&menu.children[1], Node::Element(e) if e.tag == "rect"));
    assert!(matches!(&menu.children[2], Node::Element(e) if e.tag == "text"));
}

#[test]
fn fixture_values_classify_as_expected() {
    let source = read_fixture("loading_bar.nox");
    let doc = nox_compile::parse(&source).unwrap();
    let Node::Element(bar) = &doc.nodes[0] else {
        panic!("root should be an element");
    };

    let value_of = |key: &str| -> &Value {
        bar.children
            .iter()
            .find_map(|n| match n {
                Node::Property(p) if p.key == key => Some(&p.value),
                _ => None,
            })
            .unwrap_or_else(|| panic!("missing property '{key}'"))
    };

    assert!(matches!(value_of("x"), Value::Number { text } if text == "10"));
    assert!(matches!(value_of("y"), Value::Number { text } if text == "-4"));
    assert!(matches!(value_of("width"), Value::Expression { .. }));
    assert!(matches!(value_of("visible"), Value::Entity { name } if name == "true"));
}

#[test]
fn malformed_fixture_fails_whole_run() {
    let mut source = read_fixture("loading_bar.nox");
    source.push_str("    broken: 1 +\n");
    let err = nox_compile::compile(&source).unwrap_err();
    assert!(matches!(err, CompileError::Expression { .. }), "got {err:?}");
}

#[test]
fn document_serialises_to_json() {
    let source = read_fixture("loading_bar.nox");
    let doc = nox_compile::parse(&source).unwrap();
    let json = serde_json::to_string(&doc).expect("document should serialise");
    assert!(json.contains("\"loading_bar\""));

    let back: nox_compile::Document = serde_json::from_str(&json).expect("round trip");
    assert_eq!(back, doc);
}
