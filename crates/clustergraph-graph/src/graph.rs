//! In-memory topology graph built from queue manager, cluster link and
//! cluster queue records.
//!
//! Vertex identity is enforced through two indexes: queue managers by name
//! and queues by `(owner, queue)`. Edges are never deduplicated: upserting
//! the same link or queue record twice adds two parallel edges. Callers that
//! re-collect into a long-lived graph rather than a fresh one per run will
//! see edge counts grow with every pass.
//!
//! The graph is single-writer. Concurrent collectors must funnel their
//! records through one owner of the `TopologyGraph`.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use clustergraph_core::{
    ClusterLinkRecord, ClusterQueueRecord, QueueManagerRecord, Result, TopologyError,
};

use crate::{
    Edge, EdgeId, EdgeKind, GraphExporter, GraphMlExporter, JsonGraphExporter, Vertex, VertexId,
    VertexKind,
};

/// Below this command level a re-observed queue manager shows its command
/// level as its version; the version attribute is not reported that far back.
pub const DISPLAY_VERSION_MIN_LEVEL: i32 = 710;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub queue_managers: usize,
    pub queues: usize,
    pub connects: usize,
    pub owns: usize,
    pub uses: usize,
    /// Link and queue edges dropped because their source vertex was missing.
    pub skipped_edges: usize,
}

impl GraphStats {
    pub fn vertices(&self) -> usize {
        self.queue_managers + self.queues
    }

    pub fn edges(&self) -> usize {
        self.connects + self.owns + self.uses
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queue managers, {} queues, {} connects, {} owns, {} uses",
            self.queue_managers, self.queues, self.connects, self.owns, self.uses
        )
    }
}

#[derive(Debug, Default)]
pub struct TopologyGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    qmgr_index: HashMap<String, VertexId>,
    queue_index: HashMap<(String, String), VertexId>,
    skipped_edges: usize,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_queue_manager(&self, name: &str) -> Option<&Vertex> {
        self.qmgr_index.get(name).and_then(|id| self.vertex(*id))
    }

    pub fn find_queue(&self, owner: &str, queue: &str) -> Option<&Vertex> {
        self.queue_index
            .get(&(owner.to_string(), queue.to_string()))
            .and_then(|id| self.vertex(*id))
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize)
    }

    fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id as usize)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            skipped_edges: self.skipped_edges,
            ..GraphStats::default()
        };
        for v in &self.vertices {
            match v.kind {
                VertexKind::QueueManager => stats.queue_managers += 1,
                VertexKind::Queue => stats.queues += 1,
            }
        }
        for e in &self.edges {
            match e.kind {
                EdgeKind::Connects => stats.connects += 1,
                EdgeKind::Owns => stats.owns += 1,
                EdgeKind::Uses => stats.uses += 1,
            }
        }
        stats
    }

    fn add_vertex(&mut self, kind: VertexKind, build: impl FnOnce(Vertex) -> Vertex) -> VertexId {
        let id = self.vertices.len() as VertexId;
        self.vertices.push(build(Vertex::new(id, kind)));
        id
    }

    fn add_edge(
        &mut self,
        kind: EdgeKind,
        source: VertexId,
        target: VertexId,
        build: impl FnOnce(Edge) -> Edge,
    ) -> EdgeId {
        let id = self.edges.len() as EdgeId;
        self.edges.push(build(Edge::new(id, kind, source, target)));
        id
    }

    /// Creates the queue manager vertex, or refreshes the mutable attributes
    /// of an existing one. Identity fields (`tag`, `name`, `qm_id`) are kept
    /// from the first observation.
    pub fn upsert_queue_manager(&mut self, rec: &QueueManagerRecord) -> VertexId {
        if let Some(&id) = self.qmgr_index.get(&rec.name) {
            let version = if rec.command_level < DISPLAY_VERSION_MIN_LEVEL {
                rec.command_level.to_string()
            } else {
                rec.version.clone()
            };
            if let Some(v) = self.vertex_mut(id) {
                v.set_property("description", rec.description.as_str());
                v.set_property("platform", rec.platform.as_str());
                v.set_property("command_level", rec.command_level);
                v.set_property("version", version);
            }
            debug!("Updated queue manager vertex {} ({})", rec.name, id);
            return id;
        }

        let id = self.add_vertex(VertexKind::QueueManager, |v| {
            v.with_property("tag", rec.tag.as_str())
                .with_property("name", rec.name.as_str())
                .with_property("qm_id", rec.id.as_str())
                .with_property("description", rec.description.as_str())
                .with_property("command_level", rec.command_level)
                .with_property("platform", rec.platform.as_str())
                .with_property("version", rec.version.as_str())
        });
        self.qmgr_index.insert(rec.name.clone(), id);
        debug!("Created queue manager vertex {} ({})", rec.name, id);
        id
    }

    /// Adds a `connects` edge for an auto cluster sender link. Other
    /// definition types yield `Ok(None)`. A missing source vertex is reported
    /// as `StructuralInconsistency` and the edge is skipped; an unseen peer
    /// gets a stub vertex carrying only `tag`, `name`, `qm_id` and `version`.
    pub fn upsert_cluster_link(&mut self, rec: &ClusterLinkRecord) -> Result<Option<EdgeId>> {
        if !rec.definition_type.is_auto_cluster_sender() {
            return Ok(None);
        }

        let Some(&source) = self.qmgr_index.get(&rec.source_name) else {
            self.skipped_edges += 1;
            warn!(
                "No queue manager vertex for link source {}; skipping link to {}",
                rec.source_name, rec.peer_name
            );
            return Err(TopologyError::StructuralInconsistency {
                kind: "queue manager",
                key: rec.source_name.clone(),
            });
        };

        let peer = match self.qmgr_index.get(&rec.peer_name) {
            Some(&id) => id,
            None => {
                let id = self.add_vertex(VertexKind::QueueManager, |v| {
                    v.with_property("tag", rec.tag.as_str())
                        .with_property("name", rec.peer_name.as_str())
                        .with_property("qm_id", rec.peer_id.as_str())
                        .with_property("version", rec.version.as_str())
                });
                self.qmgr_index.insert(rec.peer_name.clone(), id);
                debug!("Created stub queue manager vertex {} ({})", rec.peer_name, id);
                id
            }
        };

        let id = self.add_edge(EdgeKind::Connects, source, peer, |e| {
            e.with_property("tag", rec.tag.as_str())
                .with_property("source_qm", rec.source_name.as_str())
                .with_property("name", rec.peer_name.as_str())
                .with_property("qm_id", rec.peer_id.as_str())
                .with_property("qm_type", rec.peer_type.to_string())
                .with_property("cluster", rec.cluster.as_str())
                .with_property("channel", rec.channel.as_str())
                .with_property("connection", rec.connection.as_str())
                .with_property("definition_type", rec.definition_type.to_string())
                .with_property("ssl_client_auth", rec.ssl_auth.as_str())
                .with_property("ssl_cipher", rec.ssl_cipher.as_str())
                .with_property("ssl_peer", rec.ssl_peer.as_str())
                .with_property("status", rec.status.to_string())
                .with_property("xmit_queue", rec.transmit_queue.as_str())
                .with_property("version", rec.version.as_str())
        });
        Ok(Some(id))
    }

    /// Adds an `owns` edge when the owner hosts the queue, `uses` otherwise.
    /// A missing owner vertex is reported as `StructuralInconsistency` and
    /// nothing is created.
    pub fn upsert_cluster_queue(&mut self, rec: &ClusterQueueRecord) -> Result<EdgeId> {
        let Some(&owner) = self.qmgr_index.get(&rec.owner_name) else {
            self.skipped_edges += 1;
            warn!(
                "No queue manager vertex for queue owner {}; skipping queue {}",
                rec.owner_name, rec.queue_name
            );
            return Err(TopologyError::StructuralInconsistency {
                kind: "queue manager",
                key: rec.owner_name.clone(),
            });
        };

        let key = (rec.owner_name.clone(), rec.queue_name.clone());
        let queue = match self.queue_index.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.add_vertex(VertexKind::Queue, |v| {
                    v.with_property("qm_name", rec.owner_name.as_str())
                        .with_property("name", rec.queue_name.as_str())
                        .with_property("cluster", rec.cluster.as_str())
                        .with_property("cluster_qmgr", rec.cluster_qmgr.as_str())
                        .with_property("cluster_queue_type", rec.cluster_queue_type.as_str())
                        .with_property("priority", rec.priority)
                        .with_property("rank", rec.rank)
                        .with_property("default_bind", rec.default_bind.as_str())
                        .with_property("description", rec.description.as_str())
                        .with_property("put", rec.put_status.as_str())
                        .with_property("qm_id", rec.qm_id.as_str())
                });
                debug!("Created queue vertex {}/{} ({})", rec.owner_name, rec.queue_name, id);
                self.queue_index.insert(key, id);
                id
            }
        };

        let kind = if rec.is_hosted_by_owner() {
            EdgeKind::Owns
        } else {
            EdgeKind::Uses
        };
        Ok(self.add_edge(kind, owner, queue, |e| e))
    }

    /// Writes the graph to `path` in the exporter's format.
    pub fn export(&self, path: impl AsRef<Path>, exporter: &dyn GraphExporter) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        exporter.write(self, &mut out)?;
        out.flush()?;
        info!("Wrote {} graph to {:?}", exporter.format_name(), path);
        Ok(())
    }

    /// Writes `<base>.graphml` and `<base>.json`, returning the paths written.
    pub fn write_exports(&self, base: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let exporters: [&dyn GraphExporter; 2] = [&GraphMlExporter, &JsonGraphExporter];
        let mut written = Vec::with_capacity(exporters.len());
        for exporter in exporters {
            let path = export_path(base.as_ref(), exporter.extension());
            self.export(&path, exporter)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Drops all vertices, edges and indexes. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.qmgr_index.clear();
        self.queue_index.clear();
        self.skipped_edges = 0;
    }
}

fn export_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
