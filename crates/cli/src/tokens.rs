use crate::document::Document;
use pickscope_core::Config;
use pickscope_core::tokens::{classify, legend};
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Line")]
    line: u32,
    #[tabled(rename = "Col")]
    column: u32,
    #[tabled(rename = "Len")]
    length: u32,
    #[tabled(rename = "Type")]
    token_type: String,
    #[tabled(rename = "Text")]
    text: String,
}

pub fn run(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::load(path, config)?;
    let tree = document
        .session
        .tree(&document.uri)
        .ok_or("document was not parsed")?;
    let legend = legend();
    let source = tree.source();

    let rows: Vec<TokenRow> = classify(&tree)
        .into_iter()
        .map(|token| {
            let line = source.lines().nth(token.line as usize).unwrap_or("");
            TokenRow {
                line: token.line + 1,
                column: token.start + 1,
                length: token.length,
                token_type: legend.token_types[token.token_type as usize]
                    .as_str()
                    .to_string(),
                text: utf16_slice(line, token.start, token.length),
            }
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::psql()));
    Ok(())
}

/// The characters covering `length` UTF-16 units from `start`.
fn utf16_slice(line: &str, start: u32, length: u32) -> String {
    let mut offset = 0;
    line.chars()
        .filter(|c| {
            let at = offset;
            offset += c.len_utf16() as u32;
            at >= start && at < start + length
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_by_utf16_units() {
        assert_eq!(utf16_slice("Y = \"😀\" : Z", 4, 4), "\"😀\"");
        assert_eq!(utf16_slice("PRINT X", 0, 5), "PRINT");
        assert_eq!(utf16_slice("PRINT X", 10, 2), "");
    }
}
