use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "callmap")]
#[command(about = "Explore a Python codebase as an interactive call graph and ask questions about it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a codebase and write its module/function data as JSON
    Parse(ParseArgs),

    /// Serve /diagram-data and /chat for a codebase
    Serve(ServeArgs),

    /// Fetch diagram data, build the call graph and export or inspect it
    Graph(GraphArgs),

    /// Ask questions about the codebase through a running server
    Chat(ChatArgs),

    /// Generate a starter .callmap.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Path to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "modules_data.json")]
    pub output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Codebase to serve (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Serve a previously written modules file instead of parsing `path`
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port for HTTP server (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Model that writes chat answers (overrides config)
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// Server base URL (overrides config)
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,

    /// Read modules from a JSON file instead of a server
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the node/edge dataset to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Select a node as if it were clicked and print its details
    #[arg(long)]
    pub select: Option<String>,

    /// List the nodes whose id or name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Server base URL (overrides config)
    #[arg(long)]
    pub url: Option<String>,

    /// Ask this question and exit; omit to start an interactive session
    pub question: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .callmap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}
