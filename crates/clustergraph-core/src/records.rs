use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ChannelStatus, DefinitionType, QmgrType};

/// The three tabular record kinds shared by the live and replay paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    QueueManager,
    ClusterLink,
    ClusterQueue,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::QueueManager => "queue manager",
            RecordKind::ClusterLink => "cluster link",
            RecordKind::ClusterQueue => "cluster queue",
        };
        write!(f, "{}", s)
    }
}

/// A queue manager as it describes itself. Identity: `name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueManagerRecord {
    pub tag: String,
    pub name: String,
    pub id: String,
    pub description: String,
    pub command_level: i32,
    pub platform: String,
    pub version: String,
}

/// One cluster peer as seen from `source_name`. Identity: `(source_name, peer_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLinkRecord {
    pub source_name: String,
    pub tag: String,
    pub peer_name: String,
    pub peer_id: String,
    pub peer_type: QmgrType,
    pub cluster: String,
    pub channel: String,
    pub connection: String,
    pub definition_type: DefinitionType,
    pub ssl_auth: String,
    pub ssl_cipher: String,
    pub ssl_peer: String,
    pub status: ChannelStatus,
    pub transmit_queue: String,
    pub version: String,
}

/// A cluster queue visible from `owner_name`. Identity: `(owner_name, queue_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterQueueRecord {
    pub owner_name: String,
    pub queue_name: String,
    pub cluster: String,
    pub cluster_qmgr: String,
    pub cluster_queue_type: String,
    pub priority: i32,
    pub rank: i32,
    pub default_bind: String,
    pub description: String,
    pub put_status: String,
    pub qm_id: String,
}

impl ClusterQueueRecord {
    /// True when the reporting queue manager hosts the queue itself rather
    /// than merely seeing it through the cluster.
    pub fn is_hosted_by_owner(&self) -> bool {
        self.owner_name == self.cluster_qmgr
    }
}

/// A decoded record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    QueueManager(QueueManagerRecord),
    ClusterLink(ClusterLinkRecord),
    ClusterQueue(ClusterQueueRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::QueueManager(_) => RecordKind::QueueManager,
            Record::ClusterLink(_) => RecordKind::ClusterLink,
            Record::ClusterQueue(_) => RecordKind::ClusterQueue,
        }
    }
}

impl From<QueueManagerRecord> for Record {
    fn from(r: QueueManagerRecord) -> Self {
        Record::QueueManager(r)
    }
}

impl From<ClusterLinkRecord> for Record {
    fn from(r: ClusterLinkRecord) -> Self {
        Record::ClusterLink(r)
    }
}

impl From<ClusterQueueRecord> for Record {
    fn from(r: ClusterQueueRecord) -> Self {
        Record::ClusterQueue(r)
    }
}
