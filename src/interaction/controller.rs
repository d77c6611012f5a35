use super::chat::{ChatRequest, ChatSession, RequestId};
use super::detail::{DetailPane, PaneOffset, Selection, Transition};
use crate::client::{ChatClient, ClientError, DiagramSource};
use crate::graph::{DiagramGraph, FunctionLookup, RenderEngine, Resolution, build_with};

/// A click as reported by the render engine: which node, if any, was under the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerClick {
    pub node: Option<String>,
}

impl PointerClick {
    pub fn on_node(id: &str) -> Self {
        Self {
            node: Some(id.to_string()),
        }
    }

    pub fn on_background() -> Self {
        Self { node: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Let the document-level handler see the click too.
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    pub offset: PaneOffset,
    pub resolution: Resolution,
}

/// Owns all page state: the function lookup, the detail pane, the chat
/// transcript and the render engine they draw through.
pub struct Controller<E: RenderEngine> {
    engine: E,
    lookup: FunctionLookup,
    pane: DetailPane,
    chat: ChatSession,
    resolution: Resolution,
}

impl<E: RenderEngine> Controller<E> {
    pub fn new(engine: E, options: ControllerOptions) -> Self {
        Self {
            engine,
            lookup: FunctionLookup::default(),
            pane: DetailPane::new(options.offset),
            chat: ChatSession::new(),
            resolution: options.resolution,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn lookup(&self) -> &FunctionLookup {
        &self.lookup
    }

    pub fn pane(&self) -> &DetailPane {
        &self.pane
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.pane.selection()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Fetch modules, build the graph and hand it to the engine.
    ///
    /// On failure nothing is drawn and the error is only logged here; the caller
    /// gets it back for reporting, not for recovery.
    pub async fn load_diagram<S: DiagramSource>(&mut self, source: &S) -> Result<usize, ClientError> {
        match source.fetch_modules().await {
            Ok(modules) => {
                let graph = build_with(modules, self.resolution);
                let count = graph.nodes.len();
                self.show_graph(graph);
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load diagram data");
                Err(e)
            }
        }
    }

    pub fn show_graph(&mut self, graph: DiagramGraph) {
        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "loading graph into render engine"
        );
        self.engine.load(&graph.nodes, &graph.edges);
        self.lookup = graph.lookup;
    }

    /// Render-engine click handler. A click on any node, known or not, is consumed here.
    pub fn handle_engine_click(&mut self, click: &PointerClick) -> Propagation {
        match &click.node {
            Some(id) => {
                if self.pane.show_node(id, &self.lookup, &self.engine) == Transition::Unchanged {
                    tracing::debug!(node = %id, "click on node without function data");
                }
                Propagation::Stop
            }
            None => Propagation::Continue,
        }
    }

    /// Document-level click handler: anything reaching it is an outside click.
    pub fn handle_document_click(&mut self) -> Transition {
        self.pane.dismiss()
    }

    /// Deliver a click that landed on the render area, bubbling it to the
    /// document unless the engine handler stopped it.
    pub fn dispatch(&mut self, click: &PointerClick) {
        if self.handle_engine_click(click) == Propagation::Continue {
            self.handle_document_click();
        }
    }

    pub fn submit_chat(&mut self, input: &mut String) -> Option<ChatRequest> {
        self.chat.submit(input)
    }

    pub fn settle_chat(&mut self, id: RequestId, outcome: Result<String, ClientError>) {
        self.chat.settle(id, outcome);
    }

    /// Submit `input`, wait for the answer and settle it. Returns false for blank input.
    pub async fn ask<C: ChatClient>(&mut self, client: &C, input: &mut String) -> bool {
        let Some(request) = self.submit_chat(input) else {
            return false;
        };
        let outcome = client.ask(&request.question).await;
        self.settle_chat(request.id, outcome);
        true
    }
}
