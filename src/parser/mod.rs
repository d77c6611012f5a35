mod python;

use crate::fs::FileSystem;
use crate::model::Module;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use python::PythonParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse: {0}")]
    Parse(String),
}

pub trait LanguageParser: Send + Sync {
    fn extensions(&self) -> &[&str];
    fn parse_module(&self, path: &Path, source: &str) -> Result<Module, ParseError>;
}

pub struct ParserRegistry {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(PythonParser::new())],
        }
    }

    pub fn find_parser(&self, path: &Path) -> Option<&dyn LanguageParser> {
        let ext = path.extension()?.to_str()?;
        self.parsers
            .iter()
            .find(|p| p.extensions().contains(&ext))
            .map(|p| p.as_ref())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk `root` (honouring .gitignore, sorted by file name) and parse every
/// supported file into a `Module`, in walk order.
///
/// Files that cannot be read or parsed are logged and skipped.
pub fn discover_modules(root: &Path, registry: &ParserRegistry, fs: &dyn FileSystem) -> Vec<Module> {
    let files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && registry.find_parser(path).is_some())
        .collect();

    tracing::debug!(files = files.len(), root = %root.display(), "discovered source files");

    files
        .par_iter()
        .filter_map(|path| {
            let parser = registry.find_parser(path)?;
            let relative = path.strip_prefix(root).unwrap_or(path);
            let result = fs
                .read(path)
                .map_err(ParseError::from)
                .and_then(|bytes| parser.parse_module(relative, &decode_source(path, bytes)));
            match result {
                Ok(module) => Some(module),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping file");
                    None
                }
            }
        })
        .collect()
}

/// Decode a source file as UTF-8, falling back to Latin-1 for legacy encodings.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail.
pub fn decode_source(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!(path = %path.display(), "not valid UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use std::path::PathBuf;

    #[test]
    fn test_utf8_source_is_kept_as_is() {
        let source = decode_source(Path::new("a.py"), "def café(): pass\n".as_bytes().to_vec());
        assert_eq!(source, "def café(): pass\n");
    }

    #[test]
    fn test_latin1_source_falls_back() {
        let bytes = b"def f():\n    \"\"\"Caf\xe9 menu.\"\"\"\n".to_vec();
        let source = decode_source(Path::new("legacy.py"), bytes);
        assert_eq!(source, "def f():\n    \"\"\"Café menu.\"\"\"\n");
    }

    #[test]
    fn test_latin1_file_is_parsed_not_dropped() {
        let fs = MockFs::with_files([(
            PathBuf::from("/src/legacy.py"),
            b"def greet():\n    \"\"\"Dit bonjour \xe0 tous.\"\"\"\n".to_vec(),
        )]);
        let path = Path::new("/src/legacy.py");
        let bytes = fs.read(path).unwrap();
        let module = PythonParser::new()
            .parse_module(Path::new("legacy.py"), &decode_source(path, bytes))
            .unwrap();

        assert_eq!(
            module.functions[0].docstring.as_deref(),
            Some("Dit bonjour à tous.")
        );
    }

    #[test]
    fn test_registry_matches_python_only() {
        let registry = ParserRegistry::new();
        assert!(registry.find_parser(Path::new("app.py")).is_some());
        assert!(registry.find_parser(Path::new("main.rs")).is_none());
        assert!(registry.find_parser(Path::new("Makefile")).is_none());
    }
}
