mod chat;
mod controller;
mod detail;

pub use chat::{ChatRequest, ChatSession, ChatTurn, ERROR_PREFIX, PENDING_TEXT, RequestId, Role};
pub use controller::{Controller, ControllerOptions, PointerClick, Propagation};
pub use detail::{
    DetailPane, DetailView, NO_DESCRIPTION, NO_PARAMS, PaneOffset, PaneState, Selection,
    Transition,
};
