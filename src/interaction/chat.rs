//! Chat transcript and the per-request pending/settled lifecycle.
//!
//! Every submission appends a user turn and its own pending bot turn, in that
//! order, before the request leaves. Settling a request removes only that
//! request's pending turn, so overlapping requests never disturb each other.

use crate::client::ClientError;

pub const PENDING_TEXT: &str = "Thinking…";
pub const ERROR_PREFIX: &str = "❌ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    /// Set on the transient placeholder shown while the request is in flight.
    pub pending: Option<RequestId>,
}

impl ChatTurn {
    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
            pending: None,
        }
    }

    fn bot(text: String) -> Self {
        Self {
            role: Role::Bot,
            text,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// A question that has been recorded and now needs to go over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub id: RequestId,
    pub question: String,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<ChatTurn>,
    next_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn in_flight(&self) -> usize {
        self.transcript.iter().filter(|t| t.is_pending()).count()
    }

    /// Record a question typed into `input` and clear the field.
    ///
    /// Blank input is ignored entirely: no turns, no request, `input` untouched.
    pub fn submit(&mut self, input: &mut String) -> Option<ChatRequest> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();
        input.clear();

        let id = RequestId(self.next_id);
        self.next_id += 1;

        self.transcript.push(ChatTurn::user(&question));
        self.transcript.push(ChatTurn {
            role: Role::Bot,
            text: PENDING_TEXT.to_string(),
            pending: Some(id),
        });

        Some(ChatRequest { id, question })
    }

    /// Replace the request's pending turn with its outcome.
    pub fn settle(&mut self, id: RequestId, outcome: Result<String, ClientError>) {
        if let Some(pos) = self.transcript.iter().rposition(|t| t.pending == Some(id)) {
            self.transcript.remove(pos);
        }

        let text = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                format!("{}{}", ERROR_PREFIX, e)
            }
        };
        self.transcript.push(ChatTurn::bot(text));
    }
}
