/// Zero-based row and byte column, ordered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Line start table for one source text.
///
/// Node spans use byte columns; the protocol speaks UTF-16 code units.
/// Every conversion between the two goes through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.len);
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, offset - self.line_starts[row])
    }

    pub fn offset(&self, point: Point) -> usize {
        match self.line_starts.get(point.row) {
            Some(start) => (start + point.column).min(self.len),
            None => self.len,
        }
    }

    /// Text of `row` without its line terminator.
    pub fn line<'a>(&self, text: &'a str, row: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(row)?;
        let end = self
            .line_starts
            .get(row + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());
        let line = &text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// UTF-16 column of a byte point.
    pub fn utf16_column(&self, text: &str, point: Point) -> u32 {
        let Some(line) = self.line(text, point.row) else {
            return 0;
        };
        let mut column = point.column.min(line.len());
        while !line.is_char_boundary(column) {
            column -= 1;
        }
        utf16_len(&line[..column])
    }

    /// Byte point of a protocol position. Columns past the end of the line
    /// clamp to the line end; rows past the end keep their row so that
    /// containment tests reject them.
    pub fn point_from_utf16(&self, text: &str, line: u32, character: u32) -> Point {
        let row = line as usize;
        let Some(content) = self.line(text, row) else {
            return Point::new(row, 0);
        };
        let mut utf16 = 0usize;
        let mut byte = 0usize;
        for c in content.chars() {
            if utf16 >= character as usize {
                break;
            }
            utf16 += c.len_utf16();
            byte += c.len_utf8();
        }
        Point::new(row, byte)
    }

    pub fn offset_from_utf16(&self, text: &str, line: u32, character: u32) -> usize {
        self.offset(self.point_from_utf16(text, line, character))
    }
}

pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_row_major_points() {
        let text = "AB\nCDE\n\nF";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.point(0), Point::new(0, 0));
        assert_eq!(index.point(2), Point::new(0, 2));
        assert_eq!(index.point(3), Point::new(1, 0));
        assert_eq!(index.point(8), Point::new(3, 0));
        assert_eq!(index.offset(Point::new(1, 2)), 5);
        assert_eq!(index.offset(Point::new(9, 0)), text.len());
    }

    #[test]
    fn utf16_columns_account_for_wide_characters() {
        let text = "X = \"é😀\" : Y";
        let index = LineIndex::new(text);
        let y = text.find('Y').unwrap();
        let point = index.point(y);
        assert_eq!(index.utf16_column(text, point), 12);
        assert_eq!(index.point_from_utf16(text, 0, 12), point);
    }

    #[test]
    fn positions_past_line_end_clamp() {
        let text = "AB\r\nC";
        let index = LineIndex::new(text);
        assert_eq!(index.line(text, 0), Some("AB"));
        assert_eq!(index.point_from_utf16(text, 0, 40), Point::new(0, 2));
        assert_eq!(index.point_from_utf16(text, 7, 0), Point::new(7, 0));
    }
}
