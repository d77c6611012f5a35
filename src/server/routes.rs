use super::answer::Answerer;
use crate::client::{ChatQuestion, ChatReply};
use crate::model::Module;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
pub struct AppState {
    pub modules: Vec<Module>,
    pub answerer: Box<dyn Answerer>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/diagram-data", get(diagram_handler))
        .route("/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    serve_on(listener, state).await
}

pub async fn serve_on(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, modules = state.modules.len(), "serving diagram data and chat");
    axum::serve(listener, router(Arc::new(state))).await
}

pub async fn diagram_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Module>> {
    Json(state.modules.clone())
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatQuestion>,
) -> Result<Json<ChatReply>, ApiError> {
    match state.answerer.answer(&body.question).await {
        Ok(answer) => Ok(Json(ChatReply {
            answer: Some(answer),
        })),
        Err(e) => {
            tracing::error!(error = %e, "chat answer failed");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            })
        }
    }
}
