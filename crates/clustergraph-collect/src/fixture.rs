//! Attribute source backed by a JSON description of a cluster.
//!
//! ```json
//! {
//!   "members": {
//!     "QM1": {
//!       "endpoints": ["host1(1414)"],
//!       "attributes": { "name": "QM1", "identifier": "QM1_ID", "command_level": 910 },
//!       "peers": [ ... ],
//!       "queues": [ ... ]
//!     }
//!   }
//! }
//! ```
//!
//! A member accepts connections on the listed endpoints only (any endpoint
//! when the list is empty). `unreachable`, `user_id`, `fail_queries` and
//! `delay_ms` simulate the failure modes of a live member.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use clustergraph_core::{
    ClusterAttributeSource, ClusterQmgrAttributes, ClusterQueueAttributes, Credentials, Endpoint,
    QmgrAttributes, Result, TopologyError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureMember {
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub unreachable: bool,
    /// When set, connections must present this user id.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub fail_queries: bool,
    #[serde(default)]
    pub delay_ms: u64,
    pub attributes: QmgrAttributes,
    #[serde(default)]
    pub peers: Vec<ClusterQmgrAttributes>,
    #[serde(default)]
    pub queues: Vec<ClusterQueueAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSource {
    pub members: HashMap<String, FixtureMember>,
}

#[derive(Debug)]
pub struct FixtureConnection {
    member: String,
}

impl FixtureSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TopologyError::NotFound(path.to_path_buf()),
            _ => TopologyError::Io(e),
        })?;
        let source = Self::from_json(&text)?;
        debug!("Loaded fixture with {} members from {:?}", source.members.len(), path);
        Ok(source)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn member(&self, conn: &FixtureConnection) -> Result<&FixtureMember> {
        self.members
            .get(&conn.member)
            .ok_or_else(|| TopologyError::attribute_query(&conn.member, "member vanished"))
    }

    async fn answer(&self, conn: &FixtureConnection) -> Result<&FixtureMember> {
        let member = self.member(conn)?;
        if member.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(member.delay_ms)).await;
        }
        if member.fail_queries {
            return Err(TopologyError::attribute_query(
                &conn.member,
                "truncated response",
            ));
        }
        Ok(member)
    }
}

#[async_trait]
impl ClusterAttributeSource for FixtureSource {
    type Connection = FixtureConnection;

    async fn connect(
        &self,
        qmgr: &str,
        endpoint: &Endpoint,
        _channel: &str,
        credentials: &Credentials,
    ) -> Result<FixtureConnection> {
        let member = self
            .members
            .get(qmgr)
            .ok_or_else(|| TopologyError::connection(qmgr, "unknown queue manager"))?;
        if member.unreachable {
            return Err(TopologyError::connection(
                qmgr,
                format!("{} is not reachable", endpoint),
            ));
        }
        let target = endpoint.to_string();
        if !member.endpoints.is_empty() && !member.endpoints.iter().any(|e| e.trim() == target) {
            return Err(TopologyError::connection(
                qmgr,
                format!("connection refused at {}", endpoint),
            ));
        }
        if let Some(required) = &member.user_id {
            if credentials.user_id.as_deref() != Some(required.as_str()) {
                return Err(TopologyError::connection(qmgr, "not authorized"));
            }
        }
        Ok(FixtureConnection {
            member: qmgr.to_string(),
        })
    }

    async fn query_own_attributes(&self, conn: &mut FixtureConnection) -> Result<QmgrAttributes> {
        Ok(self.answer(conn).await?.attributes.clone())
    }

    async fn query_cluster_peers(
        &self,
        conn: &mut FixtureConnection,
    ) -> Result<Vec<ClusterQmgrAttributes>> {
        Ok(self.answer(conn).await?.peers.clone())
    }

    async fn query_cluster_queues(
        &self,
        conn: &mut FixtureConnection,
    ) -> Result<Vec<ClusterQueueAttributes>> {
        Ok(self.answer(conn).await?.queues.clone())
    }

    async fn disconnect(&self, conn: FixtureConnection) {
        debug!("Disconnected from {}", conn.member);
    }
}
