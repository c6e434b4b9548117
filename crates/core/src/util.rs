use lsp_types::{Position, Range, TextDocumentContentChangeEvent};
use pickscope_syntax::{LineIndex, Node, Point, SyntaxTree};

/// Protocol range of a node, columns in UTF-16 code units.
pub fn node_range(tree: &SyntaxTree, node: Node<'_>) -> Range {
    Range {
        start: to_position(tree, node.start_point()),
        end: to_position(tree, node.end_point()),
    }
}

pub fn to_position(tree: &SyntaxTree, point: Point) -> Position {
    let (line, character) = tree.utf16_position(point);
    Position { line, character }
}

pub fn to_point(tree: &SyntaxTree, position: Position) -> Point {
    tree.point_from_utf16(position.line, position.character)
}

/// Applies one `textDocument/didChange` content change. A change without a
/// range replaces the whole text.
pub fn apply_content_change(text: &mut String, change: &TextDocumentContentChangeEvent) {
    let Some(range) = change.range else {
        text.clone_from(&change.text);
        return;
    };
    let lines = LineIndex::new(text);
    let start = lines.offset_from_utf16(text, range.start.line, range.start.character);
    let end = lines.offset_from_utf16(text, range.end.line, range.end.character);
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    text.replace_range(start..end, &change.text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(range: Option<((u32, u32), (u32, u32))>, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: range.map(|((sl, sc), (el, ec))| Range {
                start: Position::new(sl, sc),
                end: Position::new(el, ec),
            }),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn ranged_change_splices_text() {
        let mut text = "X = 1\nY = 2\n".to_string();
        apply_content_change(&mut text, &change(Some(((1, 4), (1, 5))), "42"));
        assert_eq!(text, "X = 1\nY = 42\n");
    }

    #[test]
    fn ranged_change_counts_utf16_columns() {
        let mut text = "Y = \"😀\" : Z\n".to_string();
        // The emoji is two UTF-16 units, so Z sits at column 11.
        apply_content_change(&mut text, &change(Some(((0, 11), (0, 12))), "W"));
        assert_eq!(text, "Y = \"😀\" : W\n");
    }

    #[test]
    fn insertion_past_the_end() {
        let mut text = "X = 1".to_string();
        apply_content_change(&mut text, &change(Some(((1, 0), (1, 0))), "\nEND"));
        assert_eq!(text, "X = 1\nEND");
    }

    #[test]
    fn full_change_replaces_everything() {
        let mut text = "OLD".to_string();
        apply_content_change(&mut text, &change(None, "NEW"));
        assert_eq!(text, "NEW");
    }
}
