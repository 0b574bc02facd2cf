//! Record consumers. The collector hands every member's records to exactly
//! one sink, from one task, in inventory order.

use tracing::debug;

use clustergraph_core::{
    ClusterLinkRecord, ClusterQueueRecord, QueueManagerRecord, Result, TopologyError,
};
use clustergraph_graph::TopologyGraph;

/// Everything collected from one cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBatch {
    pub queue_manager: QueueManagerRecord,
    pub links: Vec<ClusterLinkRecord>,
    pub queues: Vec<ClusterQueueRecord>,
}

pub trait RecordSink {
    /// A failure here is fatal to the whole run.
    fn accept(&mut self, batch: &MemberBatch) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        (**self).accept(batch)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl<S: RecordSink> RecordSink for Option<S> {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        match self {
            Some(sink) => sink.accept(batch),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Some(sink) => sink.finish(),
            None => Ok(()),
        }
    }
}

/// Fans each batch out to both sinks, first `A` then `B`.
impl<A: RecordSink, B: RecordSink> RecordSink for (A, B) {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        self.0.accept(batch)?;
        self.1.accept(batch)
    }

    fn finish(&mut self) -> Result<()> {
        self.0.finish()?;
        self.1.finish()
    }
}

/// Missing link sources and queue owners are logged by the builder and
/// skipped; they never fail the run.
impl RecordSink for TopologyGraph {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        self.upsert_queue_manager(&batch.queue_manager);
        for link in &batch.links {
            skip_inconsistency(self.upsert_cluster_link(link).map(|_| ()))?;
        }
        for queue in &batch.queues {
            skip_inconsistency(self.upsert_cluster_queue(queue).map(|_| ()))?;
        }
        Ok(())
    }
}

pub(crate) fn skip_inconsistency(result: Result<()>) -> Result<()> {
    match result {
        Err(TopologyError::StructuralInconsistency { kind, key }) => {
            debug!("Skipped edge with missing {} vertex {}", kind, key);
            Ok(())
        }
        other => other,
    }
}

/// Keeps every batch in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub batches: Vec<MemberBatch>,
}

impl RecordSink for CollectingSink {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        self.batches.push(batch.clone());
        Ok(())
    }
}
