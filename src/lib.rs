pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod fs;
pub mod graph;
pub mod interaction;
pub mod model;
pub mod parser;
pub mod server;
pub mod style;

pub use api::{CallmapError, load_modules_file, parse_codebase, write_modules_file};
pub use cli::Cli;
pub use client::{ChatClient, ClientError, DiagramSource, FileSource, HttpClient};
pub use commands::{cmd_chat, cmd_graph, cmd_init, cmd_parse, cmd_serve};
pub use config::Config;
pub use graph::{DiagramGraph, FunctionLookup, RenderEngine, Resolution, build, build_with};
pub use interaction::{Controller, ControllerOptions, PointerClick};
pub use model::{Edge, Function, Module, Node};
