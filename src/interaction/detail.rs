//! Detail pane state machine: `Hidden` <-> `Shown(selection)`.

use crate::graph::{FunctionLookup, RenderEngine, ScreenPoint};
use crate::model::Function;

pub const NO_PARAMS: &str = "None";
pub const NO_DESCRIPTION: &str = "—";

/// Distance between the clicked node's screen position and the pane's corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneOffset {
    pub dx: f64,
    pub dy: f64,
}

impl Default for PaneOffset {
    fn default() -> Self {
        Self { dx: 12.0, dy: 12.0 }
    }
}

/// The fields the pane displays, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub identifier: String,
    pub location: String,
    pub parameters: String,
    pub description: String,
    /// Call references exactly as recorded, not the resolved edge targets.
    pub calls: Vec<String>,
    /// Functions whose calls name this one.
    pub callers: Vec<String>,
}

impl DetailView {
    pub fn from_function(function: &Function, lookup: &FunctionLookup) -> Self {
        let parameters = if function.params.is_empty() {
            NO_PARAMS.to_string()
        } else {
            function.params.join(", ")
        };

        Self {
            identifier: function.qualified_name.clone(),
            location: format!("{} (line {})", function.module, function.line_number),
            parameters,
            description: function
                .docstring
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            calls: function.calls.clone(),
            callers: lookup.callers_of(function),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: String,
    pub view: DetailView,
    /// `None` when the engine could not place the node on screen.
    pub position: Option<ScreenPoint>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PaneState {
    #[default]
    Hidden,
    Shown(Selection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct DetailPane {
    state: PaneState,
    offset: PaneOffset,
}

impl DetailPane {
    pub fn new(offset: PaneOffset) -> Self {
        Self {
            state: PaneState::Hidden,
            offset,
        }
    }

    pub fn state(&self) -> &PaneState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            PaneState::Shown(selection) => Some(selection),
            PaneState::Hidden => None,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, PaneState::Shown(_))
    }

    /// Show the pane for a clicked node. Ids missing from `lookup` leave the state alone.
    pub fn show_node(
        &mut self,
        id: &str,
        lookup: &FunctionLookup,
        engine: &dyn RenderEngine,
    ) -> Transition {
        let Some(function) = lookup.get(id) else {
            return Transition::Unchanged;
        };

        let position = engine
            .node_screen_position(id)
            .map(|p| p.offset(self.offset.dx, self.offset.dy));

        self.state = PaneState::Shown(Selection {
            id: id.to_string(),
            view: DetailView::from_function(function, lookup),
            position,
        });
        Transition::Changed
    }

    pub fn dismiss(&mut self) -> Transition {
        match self.state {
            PaneState::Hidden => Transition::Unchanged,
            PaneState::Shown(_) => {
                self.state = PaneState::Hidden;
                Transition::Changed
            }
        }
    }
}
