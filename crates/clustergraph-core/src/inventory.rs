//! Queue manager inventory: one `tag:name:host(port),...:channel` line per
//! cluster member. Only entries admitted by the tag filter are kept, and the
//! reverse name → tag lookup covers admitted entries only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::{Result, TagFilter, TopologyError};

const FIELD_SEPARATOR: char = ':';
const ALTERNATIVE_SEPARATOR: char = ',';

/// Tag reported for queue managers the inventory does not know.
pub const UNKNOWN_TAG: &str = "unknown";

/// A single `host(port)` connection alternative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let text = text.trim();
        let open = text
            .find('(')
            .ok_or_else(|| format!("{:?} is not of the form host(port)", text))?;
        let close = text[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| format!("{:?} is missing ')'", text))?;
        let host = text[..open].trim();
        if host.is_empty() {
            return Err(format!("{:?} has no host name", text));
        }
        let port = text[open + 1..close]
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("{:?} has an invalid port: {}", text, e))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub tag: String,
    pub name: String,
    /// Raw comma-separated `host(port)` list, tried in order.
    pub connection_alternatives: String,
    pub channel: String,
}

impl InventoryEntry {
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if parts.len() < 4 {
            return Err(TopologyError::InventoryFormat {
                line: line_no,
                reason: format!(
                    "expected tag:name:connections:channel, found {} field(s)",
                    parts.len()
                ),
            });
        }
        Ok(Self {
            tag: parts[0].to_string(),
            name: parts[1].to_string(),
            connection_alternatives: parts[2].to_string(),
            channel: parts[3].to_string(),
        })
    }

    /// Parses the connection alternatives. A malformed alternative is a
    /// connection failure for this member only.
    pub fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let endpoints = self
            .connection_alternatives
            .split(ALTERNATIVE_SEPARATOR)
            .filter(|s| !s.trim().is_empty())
            .map(Endpoint::parse)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| TopologyError::connection(&self.name, reason))?;
        if endpoints.is_empty() {
            return Err(TopologyError::connection(
                &self.name,
                "no connection alternatives configured",
            ));
        }
        Ok(endpoints)
    }
}

#[derive(Debug, Default)]
pub struct Inventory {
    source: Option<PathBuf>,
    entries: Vec<InventoryEntry>,
    tags: HashMap<String, String>,
    cursor: usize,
}

impl Inventory {
    pub fn load(path: impl AsRef<Path>, tag_patterns: &[String]) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TopologyError::NotFound(path.to_path_buf()),
            _ => TopologyError::Io(e),
        })?;
        let mut inventory = Self::parse(&text, tag_patterns)?;
        inventory.source = Some(path.to_path_buf());
        debug!(
            "Loaded {} admitted inventory entries from {:?}",
            inventory.len(),
            path
        );
        Ok(inventory)
    }

    pub fn parse(text: &str, tag_patterns: &[String]) -> Result<Self> {
        let filter = TagFilter::new(tag_patterns)?;
        let mut inventory = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            // Lines outside the filter are skipped before their shape is checked.
            let tag = trimmed.split(FIELD_SEPARATOR).next().unwrap_or_default();
            if !filter.admits(tag) {
                trace!("Tag {} on line {} not admitted", tag, idx + 1);
                continue;
            }
            inventory.push(InventoryEntry::parse_line(trimmed, idx + 1)?);
        }
        Ok(inventory)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = InventoryEntry>) -> Self {
        let mut inventory = Self::default();
        for entry in entries {
            inventory.push(entry);
        }
        inventory
    }

    fn push(&mut self, entry: InventoryEntry) {
        self.tags.insert(entry.name.clone(), entry.tag.clone());
        self.entries.push(entry);
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Next entry not yet handed out, or `None` once the inventory is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&InventoryEntry> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    /// Number of entries handed out by [`Inventory::next`] so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn tag_of(&self, name: &str) -> &str {
        self.tags.get(name).map(String::as_str).unwrap_or(UNKNOWN_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
PROD1:QM1:host1(1414),host1b(1415):CLUS.SVRCONN
# retired
PROD2:QM2:host2(1414):CLUS.SVRCONN

TEST1:QMT:test(1414):CLUS.SVRCONN
";

    #[test]
    fn loads_all_entries_without_filter() {
        let inv = Inventory::parse(SAMPLE, &[]).unwrap();
        assert_eq!(inv.len(), 3);
        assert_eq!(inv.tag_of("QMT"), "TEST1");
    }

    #[test]
    fn filter_limits_entries_and_tag_lookup() {
        let inv = Inventory::parse(SAMPLE, &["PROD*".to_string()]).unwrap();
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.tag_of("QM2"), "PROD2");
        assert_eq!(inv.tag_of("QMT"), UNKNOWN_TAG);
    }

    #[test]
    fn cursor_walks_entries_once() {
        let mut inv = Inventory::parse(SAMPLE, &[]).unwrap();
        let names: Vec<String> = std::iter::from_fn(|| inv.next().map(|e| e.name.clone())).collect();
        assert_eq!(names, vec!["QM1", "QM2", "QMT"]);
        assert!(inv.next().is_none());
        assert_eq!(inv.position(), 3);
    }

    #[test]
    fn short_line_is_rejected_with_line_number() {
        let err = Inventory::parse("PROD1:QM1:host(1414)\n", &[]).unwrap_err();
        assert!(matches!(err, TopologyError::InventoryFormat { line: 1, .. }));
    }

    #[test]
    fn short_line_outside_the_filter_is_skipped() {
        let text = "TEST1:QMT:test(1414)\nPROD1:QM1:host1(1414):CH\n";
        let inv = Inventory::parse(text, &["PROD*".to_string()]).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.entries()[0].name, "QM1");

        let err = Inventory::parse(text, &["TEST*".to_string()]).unwrap_err();
        assert!(matches!(err, TopologyError::InventoryFormat { line: 1, .. }));
    }

    #[test]
    fn endpoints_parse_in_order() {
        let inv = Inventory::parse(SAMPLE, &[]).unwrap();
        let eps = inv.entries()[0].endpoints().unwrap();
        assert_eq!(
            eps,
            vec![
                Endpoint {
                    host: "host1".into(),
                    port: 1414
                },
                Endpoint {
                    host: "host1b".into(),
                    port: 1415
                },
            ]
        );
        assert_eq!(eps[1].to_string(), "host1b(1415)");
    }

    #[test]
    fn bad_endpoint_is_a_connection_error() {
        let entry = InventoryEntry::parse_line("T:QM9:host(abc):CH", 1).unwrap();
        assert!(matches!(
            entry.endpoints(),
            Err(TopologyError::Connection { .. })
        ));
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Inventory::load(dir.path().join("nope.inv"), &[]).unwrap_err();
        assert!(matches!(err, TopologyError::NotFound(_)));
    }
}
