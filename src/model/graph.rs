use serde::Serialize;

/// A diagram node, one per function. Serialized in the network dataset vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub style: NodeStyle,
}

/// A directed call edge. `to` may name a node that was never created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub shape: String,
    /// Hover tooltip (HTML).
    pub title: String,
    pub color: NodeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeColor {
    pub background: String,
    pub border: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub background: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub arrows: String,
    pub color: EdgeColor,
    pub width: u32,
    pub smooth: Smooth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeColor {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Smooth {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Node {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            style: NodeStyle::for_id(id),
        }
    }
}

impl Edge {
    pub fn new(from: &str, to: impl Into<String>) -> Self {
        Self {
            from: from.to_string(),
            to: to.into(),
            style: EdgeStyle::default(),
        }
    }
}

impl NodeStyle {
    pub fn for_id(id: &str) -> Self {
        Self {
            shape: "box".to_string(),
            title: format!("<b>{}</b>", id),
            color: NodeColor {
                background: "#fff".to_string(),
                border: "#495057".to_string(),
                highlight: Highlight {
                    background: "#e7f1ff".to_string(),
                    border: "#0d6efd".to_string(),
                },
            },
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            arrows: "to".to_string(),
            color: EdgeColor {
                color: "#e63900".to_string(),
            },
            width: 3,
            smooth: Smooth {
                enabled: true,
                kind: "dynamic".to_string(),
            },
        }
    }
}
