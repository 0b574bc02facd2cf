//! Rebuilds a topology graph from snapshot files written by a live run.
//!
//! Queue managers are loaded first so that link and queue edges find their
//! source vertices. Any malformed line aborts the replay.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use clustergraph_core::{ClusterLinkRecord, ClusterQueueRecord, QueueManagerRecord, Result};
use clustergraph_graph::TopologyGraph;

use crate::sink::skip_inconsistency;
use crate::snapshot::for_each_record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayInputs {
    pub queue_managers: PathBuf,
    pub links: PathBuf,
    pub queues: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub queue_managers: usize,
    pub links: usize,
    pub queues: usize,
}

pub fn replay(inputs: &ReplayInputs, graph: &mut TopologyGraph) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    summary.queue_managers = for_each_record(&inputs.queue_managers, |rec: QueueManagerRecord| {
        graph.upsert_queue_manager(&rec);
        Ok(())
    })?;

    summary.links = for_each_record(&inputs.links, |rec: ClusterLinkRecord| {
        skip_inconsistency(graph.upsert_cluster_link(&rec).map(|_| ()))
    })?;

    if let Some(path) = &inputs.queues {
        summary.queues = for_each_record(path, |rec: ClusterQueueRecord| {
            skip_inconsistency(graph.upsert_cluster_queue(&rec).map(|_| ()))
        })?;
    }

    info!(
        "Replayed {} queue managers, {} links, {} queues: {}",
        summary.queue_managers,
        summary.links,
        summary.queues,
        graph.stats()
    );
    Ok(summary)
}
