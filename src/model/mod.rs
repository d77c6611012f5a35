mod graph;
mod module;

pub use graph::{EdgeColor, EdgeStyle, Highlight, NodeColor, NodeStyle, Smooth};
pub use graph::{Edge, Node};
pub use module::{Function, Module, QUALIFIER_SEPARATOR};
