use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

pub type VertexId = u64;

/// Property map shared by vertices and edges. Ordered so exports are stable.
pub type Properties = BTreeMap<String, JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    QueueManager,
    Queue,
}

impl VertexKind {
    pub fn label(&self) -> &'static str {
        match self {
            VertexKind::QueueManager => "qm",
            VertexKind::Queue => "queue",
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub kind: VertexKind,
    pub properties: Properties,
}

impl Vertex {
    pub fn new(id: VertexId, kind: VertexKind) -> Self {
        Self {
            id,
            kind,
            properties: Properties::new(),
        }
    }

    pub fn with_property<K: Into<String>, V: Into<JsonValue>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn set_property<K: Into<String>, V: Into<JsonValue>>(&mut self, key: K, value: V) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key)
    }

    /// String-valued property, `None` when absent or not a string.
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(JsonValue::as_str)
    }

    pub fn int_property(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(JsonValue::as_i64)
    }
}
