//! Typed attribute sets as returned by a cluster attribute source, before
//! they are mapped to records. Capability-gated attributes are optional:
//! older command levels simply do not report them.

use serde::{Deserialize, Serialize};

use crate::{ChannelStatus, DefinitionType, QmgrType};

/// A queue manager's own attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QmgrAttributes {
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
    pub command_level: i32,
    /// Only reported above command level 701.
    #[serde(default)]
    pub version: Option<String>,
}

/// A cluster queue manager entry visible from the queried member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterQmgrAttributes {
    pub name: String,
    #[serde(default)]
    pub identifier: String,
    pub qmgr_type: QmgrType,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub connection: String,
    pub definition_type: DefinitionType,
    #[serde(default)]
    pub ssl_client_auth: String,
    #[serde(default)]
    pub ssl_cipher_spec: String,
    #[serde(default)]
    pub ssl_peer: String,
    /// Not returned for cluster receivers.
    #[serde(default)]
    pub channel_status: Option<ChannelStatus>,
    /// Only reported above command level 710.
    #[serde(default)]
    pub transmit_queue: Option<String>,
    /// Only reported above command level 750.
    #[serde(default)]
    pub version: Option<String>,
}

/// A cluster queue visible from the queried member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterQueueAttributes {
    pub name: String,
    #[serde(default)]
    pub cluster: String,
    pub cluster_qmgr: String,
    #[serde(default)]
    pub cluster_queue_type: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub default_bind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub put_status: String,
    #[serde(default)]
    pub qm_id: String,
}
