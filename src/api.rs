//! Library API for callmap.
//!
//! These functions return proper Result types instead of printing and
//! returning exit codes like the CLI commands do.
//!
//! # Example
//!
//! ```no_run
//! use callmap::{build, parse_codebase};
//! use std::path::Path;
//!
//! let modules = parse_codebase(Path::new("."))?;
//! let graph = build(modules);
//! println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
//! # Ok::<(), callmap::CallmapError>(())
//! ```

use crate::fs::{FileSystem, default_fs, write_json};
use crate::model::Module;
use crate::parser::{ParserRegistry, discover_modules};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallmapError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid modules data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse every Python file under `path` into modules, in walk order.
pub fn parse_codebase(path: &Path) -> Result<Vec<Module>, CallmapError> {
    let resolved = path
        .canonicalize()
        .map_err(|_| CallmapError::PathNotFound(path.to_path_buf()))?;
    Ok(discover_modules(&resolved, &ParserRegistry::new(), default_fs()))
}

pub fn load_modules_file(path: &Path, fs: &dyn FileSystem) -> Result<Vec<Module>, CallmapError> {
    if !fs.exists(path) {
        return Err(CallmapError::PathNotFound(path.to_path_buf()));
    }
    let content = fs.read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_modules_file(
    path: &Path,
    modules: &[Module],
    fs: &dyn FileSystem,
) -> Result<(), CallmapError> {
    write_json(fs, path, modules)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::model::Function;

    #[test]
    fn test_modules_file_round_trip() {
        let fs = MockFs::new();
        let modules = vec![Module::new("app").with_function(
            Function::new("app", "chat", 88).with_calls(["ask_single_question"]),
        )];

        write_modules_file(Path::new("/w/modules_data.json"), &modules, &fs).unwrap();
        let back = load_modules_file(Path::new("/w/modules_data.json"), &fs).unwrap();

        assert_eq!(back, modules);
    }

    #[test]
    fn test_load_missing_modules_file() {
        let fs = MockFs::new();
        assert!(matches!(
            load_modules_file(Path::new("/w/none.json"), &fs),
            Err(CallmapError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_load_malformed_modules_file() {
        let fs = MockFs::with_files([("/w/bad.json", r#"{"name": "not a list"}"#)]);
        assert!(matches!(
            load_modules_file(Path::new("/w/bad.json"), &fs),
            Err(CallmapError::Json(_))
        ));
    }
}
