mod answer;
mod ollama;
mod routes;

pub use answer::{AnswerError, Answerer, FunctionIndex};
pub use ollama::{DEFAULT_ENDPOINT, LlmMessage, OllamaAnswerer, build_prompt, parse_reply};
pub use routes::{AppState, router, serve, serve_on};
