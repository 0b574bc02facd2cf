//! Maps raw attribute sets to records.
//!
//! Some attributes only exist from a given command level of the queried
//! queue manager on. The thresholds below are capability boundaries of the
//! attribute source; below them a fixed stand-in value is recorded.

use clustergraph_core::{
    ChannelStatus, ClusterLinkRecord, ClusterQmgrAttributes, ClusterQueueAttributes,
    ClusterQueueRecord, DefinitionType, QmgrAttributes, QueueManagerRecord,
};

/// Own version attribute is reported above this level.
pub const QMGR_VERSION_MIN_LEVEL: i32 = 701;
/// Per-channel transmit queue is reported above this level.
pub const TRANSMIT_QUEUE_MIN_LEVEL: i32 = 710;
/// Peer version is reported above this level.
pub const PEER_VERSION_MIN_LEVEL: i32 = 750;

pub const DEFAULT_CLUSTER_TRANSMIT_QUEUE: &str = "SYSTEM.CLUSTER.TRANSMIT.QUEUE";
pub const UNKNOWN_VERSION: &str = "unknown";

/// Attribute values come back blank-padded to their fixed field width.
fn rtrim(s: &str) -> String {
    s.trim_end().to_string()
}

pub fn queue_manager_record(tag: &str, attrs: &QmgrAttributes) -> QueueManagerRecord {
    let version = match attrs.version.as_deref() {
        Some(v) if attrs.command_level > QMGR_VERSION_MIN_LEVEL => rtrim(v),
        _ => attrs.command_level.to_string(),
    };
    QueueManagerRecord {
        tag: tag.to_string(),
        name: rtrim(&attrs.name),
        id: rtrim(&attrs.identifier),
        description: rtrim(&attrs.description),
        command_level: attrs.command_level,
        platform: rtrim(&attrs.platform),
        version,
    }
}

/// `command_level` is the level of the queue manager that was queried, not
/// the peer's. `peer_tag` is the inventory tag of the peer.
pub fn cluster_link_record(
    source_name: &str,
    command_level: i32,
    peer_tag: &str,
    attrs: &ClusterQmgrAttributes,
) -> ClusterLinkRecord {
    let transmit_queue = match attrs.transmit_queue.as_deref() {
        Some(q) if command_level > TRANSMIT_QUEUE_MIN_LEVEL => rtrim(q),
        _ => DEFAULT_CLUSTER_TRANSMIT_QUEUE.to_string(),
    };
    let version = match attrs.version.as_deref().map(str::trim_end) {
        Some(v) if command_level > PEER_VERSION_MIN_LEVEL && !v.is_empty() => v.to_string(),
        _ => UNKNOWN_VERSION.to_string(),
    };
    let status = match attrs.definition_type {
        DefinitionType::ClusterReceiver => ChannelStatus::none(),
        _ => attrs.channel_status.clone().unwrap_or_else(ChannelStatus::none),
    };

    ClusterLinkRecord {
        source_name: source_name.to_string(),
        tag: peer_tag.to_string(),
        peer_name: rtrim(&attrs.name),
        peer_id: rtrim(&attrs.identifier),
        peer_type: attrs.qmgr_type.clone(),
        cluster: rtrim(&attrs.cluster),
        channel: rtrim(&attrs.channel),
        connection: rtrim(&attrs.connection),
        definition_type: attrs.definition_type.clone(),
        ssl_auth: rtrim(&attrs.ssl_client_auth),
        ssl_cipher: rtrim(&attrs.ssl_cipher_spec),
        ssl_peer: rtrim(&attrs.ssl_peer),
        status,
        transmit_queue,
        version,
    }
}

pub fn cluster_queue_record(owner_name: &str, attrs: &ClusterQueueAttributes) -> ClusterQueueRecord {
    ClusterQueueRecord {
        owner_name: owner_name.to_string(),
        queue_name: rtrim(&attrs.name),
        cluster: rtrim(&attrs.cluster),
        cluster_qmgr: rtrim(&attrs.cluster_qmgr),
        cluster_queue_type: rtrim(&attrs.cluster_queue_type),
        priority: attrs.priority,
        rank: attrs.rank,
        default_bind: rtrim(&attrs.default_bind),
        description: rtrim(&attrs.description),
        put_status: rtrim(&attrs.put_status),
        qm_id: rtrim(&attrs.qm_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clustergraph_core::QmgrType;

    fn own(level: i32) -> QmgrAttributes {
        QmgrAttributes {
            name: "QM1                 ".into(),
            identifier: "QM1_2020-01-01  ".into(),
            description: "hub   ".into(),
            platform: "MQPL_UNIX".into(),
            command_level: level,
            version: Some("09010000".into()),
        }
    }

    fn peer(definition_type: DefinitionType) -> ClusterQmgrAttributes {
        ClusterQmgrAttributes {
            name: "QM2     ".into(),
            identifier: "QM2_ID".into(),
            qmgr_type: QmgrType::Normal,
            cluster: "CLUS1   ".into(),
            channel: "TO.QM2  ".into(),
            connection: "host2(1414)   ".into(),
            definition_type,
            ssl_client_auth: "MQSCA_REQUIRED".into(),
            ssl_cipher_spec: String::new(),
            ssl_peer: String::new(),
            channel_status: Some(ChannelStatus::Running),
            transmit_queue: Some("SYSTEM.CLUSTER.TRANSMIT.QM2".into()),
            version: Some("09020000".into()),
        }
    }

    #[test]
    fn own_version_depends_on_command_level() {
        let rec = queue_manager_record("PROD1", &own(702));
        assert_eq!(rec.version, "09010000");
        assert_eq!(rec.name, "QM1");
        assert_eq!(rec.id, "QM1_2020-01-01");
        assert_eq!(rec.description, "hub");

        assert_eq!(queue_manager_record("PROD1", &own(701)).version, "701");
    }

    #[test]
    fn transmit_queue_and_version_thresholds() {
        let at_710 = cluster_link_record("QM1", 710, "PROD2", &peer(DefinitionType::AutoClusterSender));
        assert_eq!(at_710.transmit_queue, DEFAULT_CLUSTER_TRANSMIT_QUEUE);
        assert_eq!(at_710.version, UNKNOWN_VERSION);

        let at_750 = cluster_link_record("QM1", 750, "PROD2", &peer(DefinitionType::AutoClusterSender));
        assert_eq!(at_750.transmit_queue, "SYSTEM.CLUSTER.TRANSMIT.QM2");
        assert_eq!(at_750.version, UNKNOWN_VERSION);

        let at_751 = cluster_link_record("QM1", 751, "PROD2", &peer(DefinitionType::AutoClusterSender));
        assert_eq!(at_751.version, "09020000");
        assert_eq!(at_751.peer_name, "QM2");
        assert_eq!(at_751.connection, "host2(1414)");
    }

    #[test]
    fn empty_peer_version_reads_unknown() {
        let mut attrs = peer(DefinitionType::AutoClusterSender);
        attrs.version = Some("        ".into());
        assert_eq!(cluster_link_record("QM1", 900, "T", &attrs).version, UNKNOWN_VERSION);
    }

    #[test]
    fn receivers_carry_no_status() {
        let rec = cluster_link_record("QM1", 900, "T", &peer(DefinitionType::ClusterReceiver));
        assert_eq!(rec.status, ChannelStatus::none());
        assert_eq!(rec.status.to_string(), "");

        let mut attrs = peer(DefinitionType::AutoClusterSender);
        attrs.channel_status = None;
        assert_eq!(cluster_link_record("QM1", 900, "T", &attrs).status, ChannelStatus::none());
    }

    #[test]
    fn queue_owner_is_the_queried_member() {
        let attrs = ClusterQueueAttributes {
            name: "APP.Q   ".into(),
            cluster: "CLUS1".into(),
            cluster_qmgr: "QM2   ".into(),
            cluster_queue_type: "MQCQT_LOCAL_Q".into(),
            priority: 4,
            rank: 1,
            default_bind: "MQBND_BIND_ON_OPEN".into(),
            description: String::new(),
            put_status: "MQQA_PUT_ALLOWED".into(),
            qm_id: "QM2_ID".into(),
        };
        let rec = cluster_queue_record("QM1", &attrs);
        assert_eq!(rec.owner_name, "QM1");
        assert_eq!(rec.queue_name, "APP.Q");
        assert_eq!(rec.cluster_qmgr, "QM2");
        assert!(!rec.is_hosted_by_owner());
    }
}
