//! Graph exporters. Each writes the full vertex and edge set of a
//! [`TopologyGraph`](crate::TopologyGraph) to a byte sink in one format.

mod graphml;
mod json;

pub use graphml::GraphMlExporter;
pub use json::JsonGraphExporter;

use std::io::Write;

use clustergraph_core::Result;

use crate::TopologyGraph;

pub trait GraphExporter {
    /// Human-readable name used in log lines.
    fn format_name(&self) -> &'static str;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn write(&self, graph: &TopologyGraph, out: &mut dyn Write) -> Result<()>;
}
