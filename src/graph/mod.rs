mod builder;
mod render;

pub use builder::{
    DiagramGraph, FunctionLookup, Resolution, build, build_with, resolve_target,
    search_nodes,
};
pub use render::{CanvasPoint, RenderEngine, ScreenPoint, StaticLayout, ViewTransform, VisDataset};
