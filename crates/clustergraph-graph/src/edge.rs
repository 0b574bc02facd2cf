use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::{Properties, VertexId};

pub type EdgeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Auto cluster sender channel from one queue manager to a peer.
    Connects,
    /// Queue manager hosts the cluster queue.
    Owns,
    /// Queue manager sees a cluster queue hosted elsewhere.
    Uses,
}

impl EdgeKind {
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::Connects => "connects",
            EdgeKind::Owns => "owns",
            EdgeKind::Uses => "uses",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A directed edge `source -> target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub kind: EdgeKind,
    pub source: VertexId,
    pub target: VertexId,
    pub properties: Properties,
}

impl Edge {
    pub fn new(id: EdgeId, kind: EdgeKind, source: VertexId, target: VertexId) -> Self {
        Self {
            id,
            kind,
            source,
            target,
            properties: Properties::new(),
        }
    }

    pub fn with_property<K: Into<String>, V: Into<JsonValue>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(JsonValue::as_str)
    }
}
