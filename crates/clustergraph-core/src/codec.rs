//! Positional, delimiter-separated encoding of the three record kinds.
//!
//! The format has no header, no quoting and no escaping: a string field that
//! contains the delimiter will shift every following field on decode. Decode
//! checks arity and numeric parseability only; enumerated fields outside the
//! known vocabulary and empty strings pass through unchanged.

use crate::{
    ClusterLinkRecord, ClusterQueueRecord, QueueManagerRecord, Record, RecordKind, Result,
    TopologyError,
};

pub const DELIMITER: char = ',';

pub trait TabularRecord: Sized {
    const KIND: RecordKind;
    /// Minimum number of fields a line must split into.
    const ARITY: usize;

    fn fields(&self) -> Vec<String>;
    fn from_fields(fields: &[&str]) -> Result<Self>;

    fn encode(&self) -> String {
        self.fields().join(&DELIMITER.to_string())
    }

    fn decode(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split(DELIMITER).collect();
        if fields.len() < Self::ARITY {
            return Err(TopologyError::record_format(
                Self::KIND,
                format!("expected {} fields, found {}", Self::ARITY, fields.len()),
            ));
        }
        Self::from_fields(&fields)
    }
}

fn parse_int(kind: RecordKind, name: &str, value: &str) -> Result<i32> {
    value.parse::<i32>().map_err(|e| {
        TopologyError::record_format(kind, format!("field {} = {:?}: {}", name, value, e))
    })
}

impl TabularRecord for QueueManagerRecord {
    const KIND: RecordKind = RecordKind::QueueManager;
    const ARITY: usize = 7;

    fn fields(&self) -> Vec<String> {
        vec![
            self.tag.clone(),
            self.name.clone(),
            self.id.clone(),
            self.description.clone(),
            self.command_level.to_string(),
            self.platform.clone(),
            self.version.clone(),
        ]
    }

    fn from_fields(f: &[&str]) -> Result<Self> {
        Ok(Self {
            tag: f[0].to_string(),
            name: f[1].to_string(),
            id: f[2].to_string(),
            description: f[3].to_string(),
            command_level: parse_int(Self::KIND, "command_level", f[4])?,
            platform: f[5].to_string(),
            version: f[6].to_string(),
        })
    }
}

impl TabularRecord for ClusterLinkRecord {
    const KIND: RecordKind = RecordKind::ClusterLink;
    const ARITY: usize = 15;

    fn fields(&self) -> Vec<String> {
        vec![
            self.source_name.clone(),
            self.tag.clone(),
            self.peer_name.clone(),
            self.peer_id.clone(),
            self.peer_type.to_string(),
            self.cluster.clone(),
            self.channel.clone(),
            self.connection.clone(),
            self.definition_type.to_string(),
            self.ssl_auth.clone(),
            self.ssl_cipher.clone(),
            self.ssl_peer.clone(),
            self.status.to_string(),
            self.transmit_queue.clone(),
            self.version.clone(),
        ]
    }

    fn from_fields(f: &[&str]) -> Result<Self> {
        Ok(Self {
            source_name: f[0].to_string(),
            tag: f[1].to_string(),
            peer_name: f[2].to_string(),
            peer_id: f[3].to_string(),
            peer_type: f[4].to_string().into(),
            cluster: f[5].to_string(),
            channel: f[6].to_string(),
            connection: f[7].to_string(),
            definition_type: f[8].to_string().into(),
            ssl_auth: f[9].to_string(),
            ssl_cipher: f[10].to_string(),
            ssl_peer: f[11].to_string(),
            status: f[12].to_string().into(),
            transmit_queue: f[13].to_string(),
            version: f[14].to_string(),
        })
    }
}

impl TabularRecord for ClusterQueueRecord {
    const KIND: RecordKind = RecordKind::ClusterQueue;
    const ARITY: usize = 11;

    fn fields(&self) -> Vec<String> {
        vec![
            self.owner_name.clone(),
            self.queue_name.clone(),
            self.cluster.clone(),
            self.cluster_qmgr.clone(),
            self.cluster_queue_type.clone(),
            self.priority.to_string(),
            self.rank.to_string(),
            self.default_bind.clone(),
            self.description.clone(),
            self.put_status.clone(),
            self.qm_id.clone(),
        ]
    }

    fn from_fields(f: &[&str]) -> Result<Self> {
        Ok(Self {
            owner_name: f[0].to_string(),
            queue_name: f[1].to_string(),
            cluster: f[2].to_string(),
            cluster_qmgr: f[3].to_string(),
            cluster_queue_type: f[4].to_string(),
            priority: parse_int(Self::KIND, "priority", f[5])?,
            rank: parse_int(Self::KIND, "rank", f[6])?,
            default_bind: f[7].to_string(),
            description: f[8].to_string(),
            put_status: f[9].to_string(),
            qm_id: f[10].to_string(),
        })
    }
}

pub fn encode(record: &Record) -> String {
    match record {
        Record::QueueManager(r) => r.encode(),
        Record::ClusterLink(r) => r.encode(),
        Record::ClusterQueue(r) => r.encode(),
    }
}

pub fn decode(kind: RecordKind, text: &str) -> Result<Record> {
    Ok(match kind {
        RecordKind::QueueManager => QueueManagerRecord::decode(text)?.into(),
        RecordKind::ClusterLink => ClusterLinkRecord::decode(text)?.into(),
        RecordKind::ClusterQueue => ClusterQueueRecord::decode(text)?.into(),
    })
}
