mod chat;
mod graph;
mod init;
mod parse;
mod serve;

pub use chat::cmd_chat;
pub use graph::cmd_graph;
pub use init::cmd_init;
pub use parse::cmd_parse;
pub use serve::cmd_serve;

use crate::config::Config;
use crate::style;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the path and load its config.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(path: &Path) -> Result<Self, i32> {
        let resolved_path = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                style::error(&format!("Could not resolve path: {}", style::path(path)));
                return Err(1);
            }
        };

        let config = Config::load(&resolved_path).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        Ok(Self {
            path: resolved_path,
            config,
        })
    }
}

fn runtime() -> Result<Runtime, i32> {
    Runtime::new().map_err(|e| {
        style::error(&format!("Failed to start async runtime: {}", e));
        1
    })
}
