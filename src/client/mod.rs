//! Transport seam for the two endpoints the page talks to.
//!
//! `DiagramSource` delivers the module list, `ChatClient` answers one question.
//! `HttpClient` implements both over HTTP; `FileSource` reads a saved
//! modules file instead of asking a server.

use crate::fs::FileSystem;
use crate::model::Module;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("response did not contain an answer")]
    MissingAnswer,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed diagram data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatQuestion {
    #[serde(default)]
    pub question: String,
}

/// Response of `POST /chat`. A missing `answer` is a failure, not an empty reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl ChatReply {
    pub fn into_answer(self) -> Result<String, ClientError> {
        self.answer.ok_or(ClientError::MissingAnswer)
    }
}

pub trait DiagramSource {
    fn fetch_modules(&self) -> impl Future<Output = Result<Vec<Module>, ClientError>> + Send;
}

pub trait ChatClient {
    fn ask(&self, question: &str) -> impl Future<Output = Result<String, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

impl DiagramSource for HttpClient {
    async fn fetch_modules(&self) -> Result<Vec<Module>, ClientError> {
        let response = self.client.get(self.url("/diagram-data")).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

impl ChatClient for HttpClient {
    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&ChatQuestion {
                question: question.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let reply: ChatReply = response.json().await?;
        reply.into_answer()
    }
}

/// Reads modules from a JSON file such as the one `callmap parse` writes.
pub struct FileSource<'a> {
    path: PathBuf,
    fs: &'a dyn FileSystem,
}

impl<'a> FileSource<'a> {
    pub fn new(path: &Path, fs: &'a dyn FileSystem) -> Self {
        Self {
            path: path.to_path_buf(),
            fs,
        }
    }
}

impl DiagramSource for FileSource<'_> {
    async fn fetch_modules(&self) -> Result<Vec<Module>, ClientError> {
        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|source| ClientError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}
