use crate::graph::Resolution;
use crate::interaction::PaneOffset;
use crate::server::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".callmap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub resolution: Resolution,
    pub pane_offset: PaneOffset,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub top_k: usize,
    /// Model answering `/chat`; without one the server lists matching functions.
    pub model: Option<String>,
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    client: Option<RawClient>,
    graph: Option<RawGraph>,
    detail: Option<RawDetail>,
    chat: Option<RawChat>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawClient {
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    resolution: Option<Resolution>,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    offset_x: Option<f64>,
    offset_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    top_k: Option<usize>,
    model: Option<String>,
    endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            model: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            client: ClientConfig::default(),
            resolution: Resolution::default(),
            pane_offset: PaneOffset::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load `.callmap.toml` from `dir`, or defaults when there is none.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let server = match raw.server {
            Some(s) => ServerConfig {
                host: s.host.unwrap_or(defaults.server.host),
                port: s.port.unwrap_or(defaults.server.port),
            },
            None => defaults.server,
        };

        let client = match raw.client {
            Some(c) => ClientConfig {
                base_url: c.base_url.unwrap_or(defaults.client.base_url),
            },
            None => defaults.client,
        };

        let pane_offset = match raw.detail {
            Some(d) => PaneOffset {
                dx: d.offset_x.unwrap_or(defaults.pane_offset.dx),
                dy: d.offset_y.unwrap_or(defaults.pane_offset.dy),
            },
            None => defaults.pane_offset,
        };

        let chat = match raw.chat {
            Some(c) => ChatConfig {
                top_k: c.top_k.unwrap_or(defaults.chat.top_k),
                model: c.model.filter(|m| !m.trim().is_empty()),
                endpoint: c.endpoint.unwrap_or(defaults.chat.endpoint),
            },
            None => defaults.chat,
        };

        Ok(Self {
            server,
            client,
            resolution: raw
                .graph
                .and_then(|g| g.resolution)
                .unwrap_or(defaults.resolution),
            pane_offset,
            chat,
        })
    }
}

pub fn generate_config_template() -> String {
    r#"# callmap configuration

[server]
host = "127.0.0.1"
port = 5000

[client]
# Where `callmap graph` and `callmap chat` find a running server
base_url = "http://127.0.0.1:5000"

[graph]
# "traversal-order": bare calls only match functions seen earlier in the module list
# "whole-dataset":   bare calls may match any function in the dataset
resolution = "traversal-order"

[detail]
# Pixel offset of the detail pane from the clicked node
offset_x = 12.0
offset_y = 12.0

[chat]
# Number of functions included in an answer
top_k = 3
# Ollama-compatible server and model that write the answers.
# Leave `model` unset to answer with the list of matching functions.
endpoint = "http://127.0.0.1:11434"
# model = "llama3.2:latest"
"#
    .to_string()
}
