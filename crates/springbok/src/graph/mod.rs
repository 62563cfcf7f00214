use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Graph snapshot consumed by the layout engine.
///
/// Nodes are keyed by id. The key is authoritative; `Graph::validate` rejects entries whose
/// embedded `id` disagrees with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: IndexMap<String, Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a node under its own id.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, n) in &self.nodes {
            if key != &n.id {
                return Err(Error::InvalidConfiguration(format!(
                    "node stored under '{key}' has id '{}'",
                    n.id
                )));
            }
        }
        for e in &self.edges {
            if !self.nodes.contains_key(e.from.as_str()) || !self.nodes.contains_key(e.to.as_str())
            {
                return Err(Error::MissingEndpoint {
                    from: e.from.clone(),
                    to: e.to.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Center position. Read as the starting point and overwritten by `LayoutEngine::write_back`.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    // Carried for collaborators; the simulation treats nodes as points.
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// An edge as declared by the caller. Direction is ignored by the layout, so two edges compare
/// equal when they connect the same pair of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.connects(&other.from, &other.to)
    }
}

impl Eq for Edge {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounding box over node centers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Returns `None` for an empty point set.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut any = false;
        for p in points {
            any = true;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        any.then(|| Self {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.min_x + self.width / 2.0,
            y: self.min_y + self.height / 2.0,
        }
    }
}
