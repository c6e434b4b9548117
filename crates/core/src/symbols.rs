use lsp_types::SymbolKind;
use pickscope_syntax::{Field, Node, NodeKind};

/// An outline entry for a top-level declaration.
#[derive(Debug, Clone)]
pub struct SymbolEntry<'t> {
    pub name: &'t str,
    pub kind: SymbolKind,
    /// The whole declaring statement; used for both range and selection.
    pub node: Node<'t>,
}

/// Labels, subroutines, `DIM`, `EQU` and `COMMON` among the root's
/// children, in source order. Nested constructs are not listed.
pub fn document_symbols(root: Node<'_>) -> Vec<SymbolEntry<'_>> {
    root.children().filter_map(symbol_for).collect()
}

fn symbol_for(node: Node<'_>) -> Option<SymbolEntry<'_>> {
    let (name, kind) = match node.kind() {
        NodeKind::Label => (node.child_by_field(Field::Name)?, SymbolKind::KEY),
        NodeKind::SubroutineStatement => (first_identifier(node)?, SymbolKind::FUNCTION),
        NodeKind::DimStatement => {
            let name = first_identifier(node).or_else(|| {
                node.first_child_of_kind(NodeKind::DimSpec)
                    .and_then(first_identifier)
            })?;
            (name, SymbolKind::ARRAY)
        }
        NodeKind::EquateStatement => (first_identifier(node)?, SymbolKind::CONSTANT),
        NodeKind::CommonStatement => (first_identifier(node)?, SymbolKind::NAMESPACE),
        _ => return None,
    };
    if name.is_missing() {
        return None;
    }
    Some(SymbolEntry {
        name: name.text(),
        kind,
        node,
    })
}

fn first_identifier(node: Node<'_>) -> Option<Node<'_>> {
    node.first_child_of_kind(NodeKind::Identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickscope_pickbasic::PickBasicParser;
    use pickscope_syntax::{Parser, SyntaxTree};

    fn parse(source: &str) -> SyntaxTree {
        PickBasicParser::new().parse(source, None).unwrap()
    }

    fn outline(source: &str) -> Vec<(String, SymbolKind)> {
        let tree = parse(source);
        document_symbols(tree.root_node())
            .into_iter()
            .map(|s| (s.name.to_string(), s.kind))
            .collect()
    }

    #[test]
    fn every_declaration_form_is_listed_in_order() {
        let source = "SUBROUTINE UPDATE(REC)\nEQU AM TO CHAR(254)\nDIM ITEMS(10), TOTALS(5)\nCOMMON /SHARED/ COUNTER\n100 PRINT 'X'\nDONE: RETURN\n";
        assert_eq!(
            outline(source),
            vec![
                ("UPDATE".to_string(), SymbolKind::FUNCTION),
                ("AM".to_string(), SymbolKind::CONSTANT),
                ("ITEMS".to_string(), SymbolKind::ARRAY),
                ("SHARED".to_string(), SymbolKind::NAMESPACE),
                ("100".to_string(), SymbolKind::KEY),
                ("DONE".to_string(), SymbolKind::KEY),
            ]
        );
    }

    #[test]
    fn symbol_spans_the_statement() {
        let tree = parse("X = 1\nEQU AM TO CHAR(254)\n");
        let symbols = document_symbols(tree.root_node());
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].node.text(), "EQU AM TO CHAR(254)");
        assert_eq!(symbols[0].node.start_point().row, 1);
    }

    #[test]
    fn nested_and_plain_statements_are_skipped() {
        assert!(outline("IF X THEN\n  EQU Y TO 1\nEND\nX = 1\nPRINT X\n").is_empty());
    }

    #[test]
    fn empty_document_has_no_symbols() {
        assert!(outline("").is_empty());
    }
}
