use crate::document::Document;
use lsp_types::Diagnostic;
use nu_ansi_term::Color;
use pickscope_core::Config;
use std::path::{Path, PathBuf};

pub fn run(files: &[PathBuf], json: bool, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut problems = 0;
    let mut report = serde_json::Map::new();

    for path in files {
        let document = Document::load(path, config.clone())?;
        problems += document.diagnostics.len();
        if json {
            report.insert(
                path.display().to_string(),
                serde_json::to_value(&document.diagnostics)?,
            );
        } else {
            for diagnostic in &document.diagnostics {
                println!("{}", format_diagnostic(path, diagnostic));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    tracing::info!(files = files.len(), problems, "check finished");

    if problems > 0 {
        return Err(format!("{} problem(s) found", problems).into());
    }
    Ok(())
}

/// `path:line:column: error: message`, one-based like compiler output.
fn format_diagnostic(path: &Path, diagnostic: &Diagnostic) -> String {
    let start = diagnostic.range.start;
    format!(
        "{}:{}:{}: {}: {}",
        path.display(),
        start.line + 1,
        start.character + 1,
        Color::Red.bold().paint("error"),
        diagnostic.message
    )
}
