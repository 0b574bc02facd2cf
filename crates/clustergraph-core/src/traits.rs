use async_trait::async_trait;
use secrecy::SecretString;

use crate::{ClusterQmgrAttributes, ClusterQueueAttributes, Endpoint, QmgrAttributes, Result};

/// Authentication and transport security handed to every connection attempt.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user_id: Option<String>,
    pub password: Option<SecretString>,
    pub cipher_suite: Option<String>,
}

/// Queries a live cluster member for its own attributes, the cluster peers
/// it can see and the cluster queues it can see.
///
/// Errors from `connect` should be `TopologyError::Connection`; errors from
/// the queries should be `TopologyError::AttributeQuery`. Both only cost the
/// member being collected.
#[async_trait]
pub trait ClusterAttributeSource: Send + Sync {
    type Connection: Send;

    async fn connect(
        &self,
        qmgr: &str,
        endpoint: &Endpoint,
        channel: &str,
        credentials: &Credentials,
    ) -> Result<Self::Connection>;

    async fn query_own_attributes(&self, conn: &mut Self::Connection) -> Result<QmgrAttributes>;

    async fn query_cluster_peers(
        &self,
        conn: &mut Self::Connection,
    ) -> Result<Vec<ClusterQmgrAttributes>>;

    async fn query_cluster_queues(
        &self,
        conn: &mut Self::Connection,
    ) -> Result<Vec<ClusterQueueAttributes>>;

    /// Releases the connection. Must not fail; implementations swallow errors.
    async fn disconnect(&self, conn: Self::Connection);
}
