//! Chat answers generated by a local model behind an Ollama-compatible
//! `/api/chat` endpoint, with the best-matching functions' source as context.

use super::answer::{AnswerError, Answerer, FunctionIndex};
use crate::model::Function;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that explains Python code clearly.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

impl LlmMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<LlmMessage>,
}

/// Retrieves the top functions from a `FunctionIndex` and asks the model to
/// answer from their source.
pub struct OllamaAnswerer {
    index: FunctionIndex,
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaAnswerer {
    pub fn new(index: FunctionIndex, endpoint: &str, model: &str) -> Self {
        Self {
            index,
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/api/chat", self.endpoint)
    }
}

#[async_trait]
impl Answerer for OllamaAnswerer {
    async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        if self.index.is_empty() {
            return Err(AnswerError::EmptyIndex);
        }

        let hits = self.index.search(question);
        if hits.is_empty() {
            // nothing to ground the model on
            return self.index.summarize(question);
        }

        let messages = build_prompt(question, &hits, self.index.top_k());
        tracing::debug!(model = %self.model, functions = hits.len(), "asking model");

        let response = self
            .client
            .post(self.url())
            .json(&ChatBody {
                model: &self.model,
                messages: &messages,
                stream: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::Status(response.status()));
        }

        parse_reply(&response.text().await?)
    }
}

/// System and user messages for one question, embedding each hit's source.
pub fn build_prompt(question: &str, hits: &[&Function], top_k: usize) -> Vec<LlmMessage> {
    let mut code_blocks = String::new();
    for (rank, f) in hits.iter().enumerate() {
        code_blocks.push_str(&format!(
            "\n#{} from {} (line {}):\n```python\n{}\n```\n",
            rank + 1,
            f.module,
            f.line_number,
            source_or_signature(f)
        ));
    }

    let prompt = format!(
        "You are an AI assistant helping a junior developer understand a codebase.\n\n\
         The user asked:\n\"{}\"\n\n\
         Here are the top {} most relevant functions in the codebase:\n{}\n\
         Based on the most relevant function(s) above, answer the user's question \
         directly and only refer to the relevant code.",
        question, top_k, code_blocks
    );

    vec![
        LlmMessage::new("system", SYSTEM_PROMPT.to_string()),
        LlmMessage::new("user", prompt),
    ]
}

fn source_or_signature(f: &Function) -> String {
    match &f.source {
        Some(source) => source.clone(),
        None => format!("def {}({}): ...", f.name, f.params.join(", ")),
    }
}

/// Extract the assistant's text from a non-streamed `/api/chat` response body.
pub fn parse_reply(body: &str) -> Result<String, AnswerError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .message
        .map(|m| m.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AnswerError::EmptyReply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    fn modules() -> Vec<Module> {
        vec![
            Module::new("pricing")
                .with_function(
                    Function::new("pricing", "total", 1)
                        .with_params(["items"])
                        .with_docstring("Sum the price of every line.")
                        .with_source("def total(items):\n    return sum(price(i) for i in items)"),
                )
                .with_function(Function::new("pricing", "price", 6).with_params(["item"])),
        ]
    }

    async fn fake_model(status: StatusCode) -> String {
        let app = Router::new().route(
            "/api/chat",
            post(move |Json(body): Json<Value>| async move {
                let reply = json!({
                    "model": body["model"],
                    "message": {
                        "role": "assistant",
                        "content": format!(
                            "{} saw {} messages, stream={}",
                            body["model"].as_str().unwrap_or_default(),
                            body["messages"].as_array().map(Vec::len).unwrap_or_default(),
                            body["stream"]
                        ),
                    },
                    "done": true
                });
                (status, Json(reply))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_prompt_embeds_question_and_source() {
        let modules = modules();
        let hits: Vec<&Function> = modules[0].functions.iter().collect();

        let messages = build_prompt("How is the total computed?", &hits, 3);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        let prompt = &messages[1].content;
        assert!(prompt.contains("\"How is the total computed?\""));
        assert!(prompt.contains("top 3 most relevant"));
        assert!(prompt.contains("#1 from pricing (line 1):"));
        assert!(prompt.contains("return sum(price(i) for i in items)"));
    }

    #[test]
    fn test_prompt_falls_back_to_signature_without_source() {
        let modules = modules();
        let hits = vec![&modules[0].functions[1]];

        let prompt = &build_prompt("price?", &hits, 1)[1].content;
        assert!(prompt.contains("def price(item): ..."));
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"model":"llama3.2","message":{"role":"assistant","content":"It sums prices."},"done":true}"#;
        assert_eq!(parse_reply(body).unwrap(), "It sums prices.");

        assert!(matches!(
            parse_reply(r#"{"done":true}"#),
            Err(AnswerError::EmptyReply)
        ));
        assert!(matches!(
            parse_reply(r#"{"message":{"role":"assistant","content":"  "}}"#),
            Err(AnswerError::EmptyReply)
        ));
        assert!(matches!(parse_reply("not json"), Err(AnswerError::Decode(_))));
    }

    #[tokio::test]
    async fn test_answer_posts_to_chat_endpoint() {
        let endpoint = fake_model(StatusCode::OK).await;
        let answerer = OllamaAnswerer::new(FunctionIndex::new(&modules(), 3), &endpoint, "llama3.2:latest");

        let answer = answerer.answer("how is the total price computed").await.unwrap();
        assert_eq!(answer, "llama3.2:latest saw 2 messages, stream=false");
    }

    #[tokio::test]
    async fn test_answer_reports_endpoint_failure() {
        let endpoint = fake_model(StatusCode::INTERNAL_SERVER_ERROR).await;
        let answerer = OllamaAnswerer::new(FunctionIndex::new(&modules(), 3), &endpoint, "llama3.2");

        let err = answerer.answer("total price").await.unwrap_err();
        assert!(matches!(err, AnswerError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_unmatched_question_is_answered_offline() {
        // nothing listens here; a request would fail
        let answerer = OllamaAnswerer::new(
            FunctionIndex::new(&modules(), 3),
            "http://127.0.0.1:1",
            "llama3.2",
        );

        let answer = answerer.answer("kubernetes").await.unwrap();
        assert!(answer.starts_with("I couldn't find"));
    }
}
