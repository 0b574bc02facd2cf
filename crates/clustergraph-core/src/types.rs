//! Closed vocabularies for the enumerated attributes reported by a queue
//! manager. Values are decoded once, where attributes enter the system, and
//! travel as enums from then on. Anything outside the known vocabulary is
//! kept verbatim in an `Unknown` variant so snapshots stay lossless.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepts both the canonical prefixed constant name and its bare form.
fn strip_prefix<'a>(s: &'a str, prefix: &str) -> &'a str {
    s.strip_prefix(prefix).unwrap_or(s)
}

/// How a cluster queue manager record came to exist on the reporting member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefinitionType {
    ExplicitClusterSender,
    AutoClusterSender,
    ClusterReceiver,
    AutoExplicitClusterSender,
    Unknown(String),
}

impl DefinitionType {
    /// Only automatically defined cluster senders become `connects` edges.
    pub fn is_auto_cluster_sender(&self) -> bool {
        matches!(self, DefinitionType::AutoClusterSender)
    }
}

impl fmt::Display for DefinitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DefinitionType::ExplicitClusterSender => "MQQMDT_EXPLICIT_CLUSTER_SENDER",
            DefinitionType::AutoClusterSender => "MQQMDT_AUTO_CLUSTER_SENDER",
            DefinitionType::ClusterReceiver => "MQQMDT_CLUSTER_RECEIVER",
            DefinitionType::AutoExplicitClusterSender => "MQQMDT_AUTO_EXP_CLUSTER_SENDER",
            DefinitionType::Unknown(s) => s.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DefinitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_prefix(s, "MQQMDT_") {
            "EXPLICIT_CLUSTER_SENDER" => Ok(DefinitionType::ExplicitClusterSender),
            "AUTO_CLUSTER_SENDER" => Ok(DefinitionType::AutoClusterSender),
            "CLUSTER_RECEIVER" => Ok(DefinitionType::ClusterReceiver),
            "AUTO_EXP_CLUSTER_SENDER" => Ok(DefinitionType::AutoExplicitClusterSender),
            _ => Ok(DefinitionType::Unknown(s.to_string())),
        }
    }
}

impl From<String> for DefinitionType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(DefinitionType::Unknown(_)) | Err(_) => DefinitionType::Unknown(s),
            Ok(known) => known,
        }
    }
}

impl From<DefinitionType> for String {
    fn from(value: DefinitionType) -> Self {
        value.to_string()
    }
}

/// Channel status as reported for a cluster sender. Receivers report none,
/// which decodes to `Unknown("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChannelStatus {
    Inactive,
    Binding,
    Starting,
    Running,
    Stopping,
    Retrying,
    Stopped,
    Requesting,
    Paused,
    Disconnected,
    Initializing,
    Switching,
    Unknown(String),
}

impl ChannelStatus {
    pub fn none() -> Self {
        ChannelStatus::Unknown(String::new())
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelStatus::Inactive => "MQCHS_INACTIVE",
            ChannelStatus::Binding => "MQCHS_BINDING",
            ChannelStatus::Starting => "MQCHS_STARTING",
            ChannelStatus::Running => "MQCHS_RUNNING",
            ChannelStatus::Stopping => "MQCHS_STOPPING",
            ChannelStatus::Retrying => "MQCHS_RETRYING",
            ChannelStatus::Stopped => "MQCHS_STOPPED",
            ChannelStatus::Requesting => "MQCHS_REQUESTING",
            ChannelStatus::Paused => "MQCHS_PAUSED",
            ChannelStatus::Disconnected => "MQCHS_DISCONNECTED",
            ChannelStatus::Initializing => "MQCHS_INITIALIZING",
            ChannelStatus::Switching => "MQCHS_SWITCHING",
            ChannelStatus::Unknown(s) => s.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChannelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_prefix(s, "MQCHS_") {
            "INACTIVE" => Ok(ChannelStatus::Inactive),
            "BINDING" => Ok(ChannelStatus::Binding),
            "STARTING" => Ok(ChannelStatus::Starting),
            "RUNNING" => Ok(ChannelStatus::Running),
            "STOPPING" => Ok(ChannelStatus::Stopping),
            "RETRYING" => Ok(ChannelStatus::Retrying),
            "STOPPED" => Ok(ChannelStatus::Stopped),
            "REQUESTING" => Ok(ChannelStatus::Requesting),
            "PAUSED" => Ok(ChannelStatus::Paused),
            "DISCONNECTED" => Ok(ChannelStatus::Disconnected),
            "INITIALIZING" => Ok(ChannelStatus::Initializing),
            "SWITCHING" => Ok(ChannelStatus::Switching),
            _ => Ok(ChannelStatus::Unknown(s.to_string())),
        }
    }
}

impl From<String> for ChannelStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(ChannelStatus::Unknown(_)) | Err(_) => ChannelStatus::Unknown(s),
            Ok(known) => known,
        }
    }
}

impl From<ChannelStatus> for String {
    fn from(value: ChannelStatus) -> Self {
        value.to_string()
    }
}

/// Role of a queue manager inside its cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QmgrType {
    Normal,
    Repository,
    Unknown(String),
}

impl fmt::Display for QmgrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QmgrType::Normal => "MQQMT_NORMAL",
            QmgrType::Repository => "MQQMT_REPOSITORY",
            QmgrType::Unknown(s) => s.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl FromStr for QmgrType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_prefix(s, "MQQMT_") {
            "NORMAL" => Ok(QmgrType::Normal),
            "REPOSITORY" => Ok(QmgrType::Repository),
            _ => Ok(QmgrType::Unknown(s.to_string())),
        }
    }
}

impl From<String> for QmgrType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(QmgrType::Unknown(_)) | Err(_) => QmgrType::Unknown(s),
            Ok(known) => known,
        }
    }
}

impl From<QmgrType> for String {
    fn from(value: QmgrType) -> Self {
        value.to_string()
    }
}
