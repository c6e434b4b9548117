use lsp_types::{Diagnostic, Url};
use pickscope_core::{Config, Session};
use std::path::Path;

/// A file opened in its own session.
pub struct Document {
    pub session: Session,
    pub uri: Url,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn load(path: &Path, config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let absolute = std::path::absolute(path)?;
        let uri = Url::from_file_path(&absolute)
            .map_err(|_| format!("not a valid file path: {}", absolute.display()))?;

        let session = Session::new(config);
        let diagnostics = session.open(&uri, &text)?;
        tracing::debug!(path = %path.display(), problems = diagnostics.len(), "document loaded");
        Ok(Self {
            session,
            uri,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_parses_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "FOR I = 1 TO 3").unwrap();
        let document = Document::load(file.path(), Config::default()).unwrap();
        assert_eq!(document.uri.scheme(), "file");
        assert_eq!(document.diagnostics.len(), 1);
        assert!(document.session.is_open(&document.uri));
    }

    #[test]
    fn missing_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::load(&dir.path().join("NOPE.B"), Config::default()).is_err());
    }
}
