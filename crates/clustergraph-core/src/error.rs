use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::RecordKind;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Connection to queue manager {member} failed: {reason}")]
    Connection { member: String, reason: String },

    #[error("Attribute query on queue manager {member} failed: {reason}")]
    AttributeQuery { member: String, reason: String },

    #[error("Queue manager {member} did not answer within {after:?}")]
    Timeout { member: String, after: Duration },

    #[error("Missing {kind} vertex for {key}")]
    StructuralInconsistency { kind: &'static str, key: String },

    #[error("Malformed {kind} record: {reason}")]
    RecordFormat { kind: RecordKind, reason: String },

    #[error("{}:{line}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<TopologyError>,
    },

    #[error("Inventory line {line}: {reason}")]
    InventoryFormat { line: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TopologyError {
    pub fn connection(member: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connection {
            member: member.into(),
            reason: reason.to_string(),
        }
    }

    pub fn attribute_query(member: impl Into<String>, reason: impl ToString) -> Self {
        Self::AttributeQuery {
            member: member.into(),
            reason: reason.to_string(),
        }
    }

    pub fn record_format(kind: RecordKind, reason: impl Into<String>) -> Self {
        Self::RecordFormat {
            kind,
            reason: reason.into(),
        }
    }

    /// Errors that only cost the current member; the run carries on.
    pub fn is_member_scoped(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::AttributeQuery { .. } | Self::Timeout { .. }
        )
    }

    /// Strips `Snapshot` wrappers to reach the error that caused the failure.
    pub fn root(&self) -> &TopologyError {
        match self {
            Self::Snapshot { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;
