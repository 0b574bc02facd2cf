use serde::Serialize;
use std::io::Write;

use clustergraph_core::Result;

use super::GraphExporter;
use crate::{EdgeId, Properties, TopologyGraph, VertexId};

/// `{"vertices":[...],"edges":[...]}` with `outV`/`inV` edge endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphExporter;

#[derive(Serialize)]
struct JsonGraph<'a> {
    vertices: Vec<JsonVertex<'a>>,
    edges: Vec<JsonEdge<'a>>,
}

#[derive(Serialize)]
struct JsonVertex<'a> {
    id: VertexId,
    label: &'static str,
    properties: &'a Properties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEdge<'a> {
    id: EdgeId,
    label: &'static str,
    out_v: VertexId,
    in_v: VertexId,
    properties: &'a Properties,
}

impl GraphExporter for JsonGraphExporter {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, graph: &TopologyGraph, out: &mut dyn Write) -> Result<()> {
        let doc = JsonGraph {
            vertices: graph
                .vertices()
                .map(|v| JsonVertex {
                    id: v.id,
                    label: v.kind.label(),
                    properties: &v.properties,
                })
                .collect(),
            edges: graph
                .edges()
                .map(|e| JsonEdge {
                    id: e.id,
                    label: e.kind.label(),
                    out_v: e.source,
                    in_v: e.target,
                    properties: &e.properties,
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
        Ok(())
    }
}
