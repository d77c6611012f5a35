//! Seam to the layout/render engine.
//!
//! The engine is a black box: it accepts nodes and edges, lays them out in its
//! own canvas space and can map a canvas point to screen (DOM) pixels. Edges
//! whose endpoints are unknown must be tolerated by every implementation.

use crate::model::{Edge, Node};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

/// A position in the engine's layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// A position in page pixels, relative to the engine's mount point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

pub trait RenderEngine {
    /// Replace the engine's contents with a freshly built graph.
    fn load(&mut self, nodes: &[Node], edges: &[Edge]);

    /// Current layout position of a node, if the engine knows it.
    fn node_position(&self, id: &str) -> Option<CanvasPoint>;

    fn canvas_to_dom(&self, point: CanvasPoint) -> ScreenPoint;

    /// Screen position of a node: its layout position mapped through the view.
    fn node_screen_position(&self, id: &str) -> Option<ScreenPoint> {
        self.node_position(id).map(|p| self.canvas_to_dom(p))
    }
}

/// The dataset a browser network renderer consumes. Holds no layout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisDataset {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl VisDataset {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl RenderEngine for VisDataset {
    fn load(&mut self, nodes: &[Node], edges: &[Edge]) {
        self.nodes = nodes.to_vec();
        self.edges = edges.to_vec();
    }

    fn node_position(&self, _id: &str) -> Option<CanvasPoint> {
        None
    }

    fn canvas_to_dom(&self, point: CanvasPoint) -> ScreenPoint {
        ScreenPoint {
            x: point.x,
            y: point.y,
        }
    }
}

/// Pan and zoom applied to the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    /// Zoom factor (1.0 = 100%).
    pub k: f64,
}

/// Deterministic engine placing nodes evenly on a circle around the canvas origin.
#[derive(Debug, Clone)]
pub struct StaticLayout {
    pub transform: ViewTransform,
    pub radius: f64,
    positions: HashMap<String, CanvasPoint>,
    edge_count: usize,
}

impl StaticLayout {
    /// A layout centred in a `width` x `height` viewport at 100% zoom.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            transform: ViewTransform {
                x: width / 2.0,
                y: height / 2.0,
                k: 1.0,
            },
            radius: 160.0,
            positions: HashMap::new(),
            edge_count: 0,
        }
    }

    pub fn zoom(&mut self, k: f64) {
        self.transform.k = k.clamp(0.1, 10.0);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform.x += dx;
        self.transform.y += dy;
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Edges whose both endpoints were placed.
    pub fn drawn_edge_count(&self) -> usize {
        self.edge_count
    }
}

impl RenderEngine for StaticLayout {
    fn load(&mut self, nodes: &[Node], edges: &[Edge]) {
        self.positions.clear();
        let n = nodes.len().max(1) as f64;
        for (i, node) in nodes.iter().enumerate() {
            let angle = (i as f64) * 2.0 * PI / n;
            self.positions.insert(
                node.id.clone(),
                CanvasPoint {
                    x: self.radius * angle.cos(),
                    y: self.radius * angle.sin(),
                },
            );
        }
        self.edge_count = edges
            .iter()
            .filter(|e| self.positions.contains_key(&e.from) && self.positions.contains_key(&e.to))
            .count();
    }

    fn node_position(&self, id: &str) -> Option<CanvasPoint> {
        self.positions.get(id).copied()
    }

    fn canvas_to_dom(&self, point: CanvasPoint) -> ScreenPoint {
        ScreenPoint {
            x: point.x * self.transform.k + self.transform.x,
            y: point.y * self.transform.k + self.transform.y,
        }
    }
}
