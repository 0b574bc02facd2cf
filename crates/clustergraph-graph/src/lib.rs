pub mod edge;
pub mod export;
pub mod graph;
pub mod vertex;

pub use edge::*;
pub use export::{GraphExporter, GraphMlExporter, JsonGraphExporter};
pub use graph::*;
pub use vertex::*;
