use pickscope_syntax::{Field, NodeKind, Parser, Point, TreeSitterParser};

fn java_parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
    TreeSitterParser::new(&language).expect("java grammar loads")
}

#[test]
fn lowering_preserves_spans_fields_and_known_kinds() {
    let source = "class Greeter {\n    int count;\n}\n";
    let mut parser = java_parser();
    let tree = parser.parse(source, None).unwrap();

    let root = tree.root_node();
    assert_eq!(root.byte_range(), 0..source.len());

    let class = root.child(0).unwrap();
    assert_eq!(class.kind(), NodeKind::Unknown);
    let name = class.child_by_field(Field::Name).unwrap();
    assert_eq!(name.kind(), NodeKind::Identifier);
    assert_eq!(name.text(), "Greeter");
    assert_eq!(name.start_point(), Point::new(0, 6));
    assert_eq!(name.parent(), Some(class));

    let keyword = class.child(0).unwrap();
    assert_eq!(keyword.kind(), NodeKind::Token);
    assert_eq!(keyword.type_name(), "class");

    for node in root.descendants() {
        if let Some(parent) = node.parent() {
            assert!(parent.byte_range().start <= node.byte_range().start);
            assert!(node.byte_range().end <= parent.byte_range().end);
        }
    }
}

#[test]
fn reparse_with_previous_tree_matches_fresh_parse() {
    let mut parser = java_parser();
    let first = parser.parse("class A { int x; }", None).unwrap();
    assert!(first.origin().is_some());

    let edited = "class Alpha { int x; int y; }";
    let incremental = parser.parse(edited, Some(&first)).unwrap();
    let fresh = java_parser().parse(edited, None).unwrap();

    let shape = |tree: &pickscope_syntax::SyntaxTree| {
        tree.root_node()
            .descendants()
            .map(|n| (n.type_name().to_string(), n.byte_range()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&incremental), shape(&fresh));
}

#[test]
fn recovery_nodes_are_lowered() {
    let mut parser = java_parser();
    let tree = parser.parse("class A { int x = ; }", None).unwrap();
    let flagged = tree
        .root_node()
        .descendants()
        .filter(|n| n.is_error() || n.is_missing())
        .count();
    assert!(flagged > 0);
}
