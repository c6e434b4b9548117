use crate::document::Document;
use pickscope_core::Config;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SymbolRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Line")]
    line: u32,
}

pub fn run(path: &Path, json: bool, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::load(path, config)?;
    let symbols = document.session.document_symbols(&document.uri);

    if json {
        println!("{}", serde_json::to_string_pretty(&symbols)?);
        return Ok(());
    }

    let rows: Vec<SymbolRow> = symbols
        .into_iter()
        .map(|symbol| SymbolRow {
            name: symbol.name,
            kind: format!("{:?}", symbol.kind),
            line: symbol.range.start.line + 1,
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::psql()));
    Ok(())
}
