use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;

use clustergraph_core::Result;

use super::GraphExporter;
use crate::{Properties, TopologyGraph};

const VERTEX_LABEL_KEY: &str = "labelV";
const EDGE_LABEL_KEY: &str = "labelE";

/// GraphML 1.0 with one `<key>` per property name. A property is declared
/// `int` when every value it takes is an integer, `string` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphMlExporter;

impl GraphExporter for GraphMlExporter {
    fn format_name(&self) -> &'static str {
        "GraphML"
    }

    fn extension(&self) -> &'static str {
        "graphml"
    }

    fn write(&self, graph: &TopologyGraph, out: &mut dyn Write) -> Result<()> {
        let vertex_keys = key_types(graph.vertices().map(|v| &v.properties));
        let edge_keys = key_types(graph.edges().map(|e| &e.properties));

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.1/graphml.xsd">"#
        )?;
        writeln!(
            out,
            r#"  <key id="{0}" for="node" attr.name="{0}" attr.type="string"/>"#,
            VERTEX_LABEL_KEY
        )?;
        for (name, ty) in &vertex_keys {
            writeln!(
                out,
                r#"  <key id="{}" for="node" attr.name="{}" attr.type="{}"/>"#,
                vertex_key_id(name),
                escape_xml(name),
                ty
            )?;
        }
        writeln!(
            out,
            r#"  <key id="{0}" for="edge" attr.name="{0}" attr.type="string"/>"#,
            EDGE_LABEL_KEY
        )?;
        for (name, ty) in &edge_keys {
            writeln!(
                out,
                r#"  <key id="{}" for="edge" attr.name="{}" attr.type="{}"/>"#,
                edge_key_id(name),
                escape_xml(name),
                ty
            )?;
        }

        writeln!(out, r#"  <graph id="G" edgedefault="directed">"#)?;
        for v in graph.vertices() {
            writeln!(out, r#"    <node id="{}">"#, v.id)?;
            write_data(out, VERTEX_LABEL_KEY, v.kind.label())?;
            for (name, value) in &v.properties {
                write_data(out, &vertex_key_id(name), &render(value))?;
            }
            writeln!(out, "    </node>")?;
        }
        for e in graph.edges() {
            writeln!(
                out,
                r#"    <edge id="{}" source="{}" target="{}">"#,
                e.id, e.source, e.target
            )?;
            write_data(out, EDGE_LABEL_KEY, e.kind.label())?;
            for (name, value) in &e.properties {
                write_data(out, &edge_key_id(name), &render(value))?;
            }
            writeln!(out, "    </edge>")?;
        }
        writeln!(out, "  </graph>")?;
        writeln!(out, "</graphml>")?;
        Ok(())
    }
}

fn key_types<'a>(maps: impl Iterator<Item = &'a Properties>) -> BTreeMap<&'a str, &'static str> {
    let mut types = BTreeMap::new();
    for props in maps {
        for (name, value) in props {
            let ty = if value.is_i64() { "int" } else { "string" };
            types
                .entry(name.as_str())
                .and_modify(|current: &mut &'static str| {
                    if ty == "string" {
                        *current = "string";
                    }
                })
                .or_insert(ty);
        }
    }
    types
}

// Vertex and edge properties share names such as `name` and `version`, so
// their key ids are namespaced.
fn vertex_key_id(name: &str) -> String {
    format!("v_{}", escape_xml(name))
}

fn edge_key_id(name: &str) -> String {
    format!("e_{}", escape_xml(name))
}

fn write_data(out: &mut dyn Write, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(
        out,
        r#"      <data key="{}">{}</data>"#,
        key,
        escape_xml(value)
    )
}

fn render(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
