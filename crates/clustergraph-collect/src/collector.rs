//! Collection orchestrator.
//!
//! Admitted inventory members are queried by at most `workers` spawned
//! tasks at once. Results are consumed in inventory order by the calling
//! task, which is the only writer into the record sink. A member that fails
//! to connect, answers badly or exceeds its deadline is counted and skipped.
//! Once connected, a member is always disconnected, deadline or not.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use clustergraph_core::{
    ClusterAttributeSource, ClusterQmgrAttributes, ClusterQueueAttributes, Credentials, Endpoint,
    Inventory, InventoryEntry, QmgrAttributes, Result, Settings, TopologyError,
};

use crate::mapping::{cluster_link_record, cluster_queue_record, queue_manager_record};
use crate::{MemberBatch, RecordSink};

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub workers: usize,
    /// Deadline for one member: connect plus every query.
    pub member_timeout: Duration,
    pub collect_queues: bool,
    pub credentials: Credentials,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl CollectOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            workers: settings.collection.workers,
            member_timeout: Duration::from_secs(settings.collection.member_timeout_secs),
            collect_queues: settings.collection.collect_queues,
            credentials: settings.credentials(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectOutcome {
    /// Every admitted member was collected.
    Complete,
    /// Some members were collected, some failed.
    Partial,
    /// Every admitted member failed.
    Failed,
    /// The tag filter admitted no member.
    NoMembers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberFailure {
    pub member: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<MemberFailure>,
}

impl CollectSummary {
    pub fn outcome(&self) -> CollectOutcome {
        if self.attempted == 0 {
            CollectOutcome::NoMembers
        } else if self.failed == 0 {
            CollectOutcome::Complete
        } else if self.succeeded == 0 {
            CollectOutcome::Failed
        } else {
            CollectOutcome::Partial
        }
    }

    fn record_failure(&mut self, member: &str, error: &TopologyError) {
        self.failed += 1;
        self.failures.push(MemberFailure {
            member: member.to_string(),
            reason: error.to_string(),
        });
    }
}

impl fmt::Display for CollectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed",
            self.attempted, self.succeeded, self.failed
        )
    }
}

/// A sink failure stopped the run. Carries the tally up to that point.
#[derive(Error, Debug)]
#[error("Collection aborted after {summary}")]
pub struct CollectAborted {
    pub summary: CollectSummary,
    #[source]
    pub source: TopologyError,
}

/// Raw answers from one member, mapped to records by the consumer.
#[derive(Debug)]
struct MemberAnswers {
    own: QmgrAttributes,
    peers: Vec<ClusterQmgrAttributes>,
    queues: Vec<ClusterQueueAttributes>,
}

pub struct Collector<S> {
    source: Arc<S>,
    options: CollectOptions,
}

impl<S> Collector<S>
where
    S: ClusterAttributeSource + 'static,
{
    pub fn new(source: Arc<S>, options: CollectOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Collects every remaining inventory entry into `sink`.
    ///
    /// Member failures end up in the summary. Only a sink failure aborts the
    /// run; the summary so far travels with the error.
    pub async fn collect<K>(
        &self,
        inventory: &mut Inventory,
        sink: &mut K,
    ) -> std::result::Result<CollectSummary, CollectAborted>
    where
        K: RecordSink + ?Sized,
    {
        let mut entries = Vec::with_capacity(inventory.len());
        while let Some(entry) = inventory.next() {
            entries.push(entry.clone());
        }

        let total = entries.len();
        let mut summary = CollectSummary {
            attempted: total,
            ..CollectSummary::default()
        };
        if total == 0 {
            info!("No inventory members admitted; nothing to collect");
            return Ok(summary);
        }

        let workers = self.options.workers.max(1);
        info!("Collecting {} members with {} workers", total, workers);
        let progress_step = (total / 10).max(1);

        let mut results = stream::iter(entries)
            .map(|entry| {
                let source = Arc::clone(&self.source);
                let credentials = self.options.credentials.clone();
                let deadline = self.options.member_timeout;
                let collect_queues = self.options.collect_queues;
                let task_entry = entry.clone();
                let handle = tokio::spawn(async move {
                    collect_member(
                        source.as_ref(),
                        &task_entry,
                        &credentials,
                        collect_queues,
                        deadline,
                    )
                    .await
                });
                async move {
                    let result = match handle.await {
                        Ok(result) => result,
                        Err(join_err) => Err(TopologyError::attribute_query(&entry.name, join_err)),
                    };
                    (entry, result)
                }
            })
            .buffered(workers);

        let mut done = 0;
        while let Some((entry, result)) = results.next().await {
            match result {
                Ok(answers) => {
                    let batch = map_member(&entry, answers, inventory);
                    debug!(
                        "Collected {}: {} links, {} queues",
                        entry.name,
                        batch.links.len(),
                        batch.queues.len()
                    );
                    if let Err(source) = sink.accept(&batch) {
                        return Err(CollectAborted { summary, source });
                    }
                    summary.succeeded += 1;
                }
                Err(e) => {
                    warn!("Skipping queue manager {}: {}", entry.name, e);
                    summary.record_failure(&entry.name, &e);
                }
            }
            done += 1;
            if done % progress_step == 0 || done == total {
                info!(
                    "Progress: {}/{} members ({}%)",
                    done,
                    total,
                    done * 100 / total
                );
            }
        }

        if let Err(source) = sink.finish() {
            return Err(CollectAborted { summary, source });
        }
        info!("Collection finished: {}", summary);
        Ok(summary)
    }
}

fn map_member(entry: &InventoryEntry, answers: MemberAnswers, inventory: &Inventory) -> MemberBatch {
    let queue_manager = queue_manager_record(&entry.tag, &answers.own);
    let level = answers.own.command_level;
    let links = answers
        .peers
        .iter()
        .map(|peer| {
            let peer_tag = inventory.tag_of(peer.name.trim_end());
            cluster_link_record(&entry.name, level, peer_tag, peer)
        })
        .collect();
    let queues = answers
        .queues
        .iter()
        .map(|q| cluster_queue_record(&entry.name, q))
        .collect();
    MemberBatch {
        queue_manager,
        links,
        queues,
    }
}

/// Connect and queries share one deadline. The connection is kept outside
/// the timed futures so it can be handed back to the source either way.
async fn collect_member<S>(
    source: &S,
    entry: &InventoryEntry,
    credentials: &Credentials,
    collect_queues: bool,
    limit: Duration,
) -> Result<MemberAnswers>
where
    S: ClusterAttributeSource,
{
    let deadline = Instant::now() + limit;
    let timed_out = || TopologyError::Timeout {
        member: entry.name.clone(),
        after: limit,
    };

    let endpoints = entry.endpoints()?;
    let mut conn = timeout_at(deadline, connect_any(source, entry, &endpoints, credentials))
        .await
        .map_err(|_| timed_out())??;
    let result = timeout_at(deadline, query_member(source, &mut conn, collect_queues))
        .await
        .unwrap_or_else(|_| Err(timed_out()));
    source.disconnect(conn).await;
    result
}

/// Tries each connection alternative in order; the first that accepts wins.
async fn connect_any<S>(
    source: &S,
    entry: &InventoryEntry,
    endpoints: &[Endpoint],
    credentials: &Credentials,
) -> Result<S::Connection>
where
    S: ClusterAttributeSource,
{
    let mut last_err = None;
    for endpoint in endpoints {
        match source
            .connect(&entry.name, endpoint, &entry.channel, credentials)
            .await
        {
            Ok(conn) => {
                debug!("Connected to {} at {}", entry.name, endpoint);
                return Ok(conn);
            }
            Err(e) => {
                debug!("Connection to {} at {} failed: {}", entry.name, endpoint, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        TopologyError::connection(&entry.name, "no connection alternatives configured")
    }))
}

async fn query_member<S>(
    source: &S,
    conn: &mut S::Connection,
    collect_queues: bool,
) -> Result<MemberAnswers>
where
    S: ClusterAttributeSource,
{
    let own = source.query_own_attributes(conn).await?;
    let peers = source.query_cluster_peers(conn).await?;
    let queues = if collect_queues {
        source.query_cluster_queues(conn).await?
    } else {
        Vec::new()
    };
    Ok(MemberAnswers { own, peers, queues })
}
