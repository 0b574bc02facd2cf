use proptest::prelude::*;

use clustergraph_core::codec::{decode, encode};
use clustergraph_core::{
    ChannelStatus, ClusterLinkRecord, ClusterQueueRecord, DefinitionType, QmgrType,
    QueueManagerRecord, Record,
};

fn field() -> impl Strategy<Value = String> {
    "[^,\n]{0,16}"
}

fn definition_type() -> impl Strategy<Value = DefinitionType> {
    prop_oneof![
        Just(DefinitionType::ExplicitClusterSender),
        Just(DefinitionType::AutoClusterSender),
        Just(DefinitionType::ClusterReceiver),
        Just(DefinitionType::AutoExplicitClusterSender),
        "X_[A-Z_]{0,8}".prop_map(DefinitionType::Unknown),
    ]
}

fn channel_status() -> impl Strategy<Value = ChannelStatus> {
    prop_oneof![
        Just(ChannelStatus::none()),
        Just(ChannelStatus::Running),
        Just(ChannelStatus::Retrying),
        Just(ChannelStatus::Stopped),
        "X_[A-Z_]{0,8}".prop_map(ChannelStatus::Unknown),
    ]
}

fn qmgr_type() -> impl Strategy<Value = QmgrType> {
    prop_oneof![
        Just(QmgrType::Normal),
        Just(QmgrType::Repository),
        "X_[A-Z_]{0,8}".prop_map(QmgrType::Unknown),
    ]
}

fn queue_manager() -> impl Strategy<Value = QueueManagerRecord> {
    (field(), field(), field(), field(), any::<i32>(), field(), field()).prop_map(
        |(tag, name, id, description, command_level, platform, version)| QueueManagerRecord {
            tag,
            name,
            id,
            description,
            command_level,
            platform,
            version,
        },
    )
}

fn cluster_link() -> impl Strategy<Value = ClusterLinkRecord> {
    (
        (field(), field(), field(), field(), qmgr_type(), field(), field()),
        (
            field(),
            definition_type(),
            field(),
            field(),
            field(),
            channel_status(),
            field(),
            field(),
        ),
    )
        .prop_map(
            |(
                (source_name, tag, peer_name, peer_id, peer_type, cluster, channel),
                (
                    connection,
                    definition_type,
                    ssl_auth,
                    ssl_cipher,
                    ssl_peer,
                    status,
                    transmit_queue,
                    version,
                ),
            )| ClusterLinkRecord {
                source_name,
                tag,
                peer_name,
                peer_id,
                peer_type,
                cluster,
                channel,
                connection,
                definition_type,
                ssl_auth,
                ssl_cipher,
                ssl_peer,
                status,
                transmit_queue,
                version,
            },
        )
}

fn cluster_queue() -> impl Strategy<Value = ClusterQueueRecord> {
    (
        (field(), field(), field(), field(), field()),
        (any::<i32>(), any::<i32>()),
        (field(), field(), field(), field()),
    )
        .prop_map(
            |(
                (owner_name, queue_name, cluster, cluster_qmgr, cluster_queue_type),
                (priority, rank),
                (default_bind, description, put_status, qm_id),
            )| ClusterQueueRecord {
                owner_name,
                queue_name,
                cluster,
                cluster_qmgr,
                cluster_queue_type,
                priority,
                rank,
                default_bind,
                description,
                put_status,
                qm_id,
            },
        )
}

fn record() -> impl Strategy<Value = Record> {
    prop_oneof![
        queue_manager().prop_map(Record::from),
        cluster_link().prop_map(Record::from),
        cluster_queue().prop_map(Record::from),
    ]
}

proptest! {
    #[test]
    fn decode_inverts_encode(rec in record()) {
        let line = encode(&rec);
        let decoded = decode(rec.kind(), &line);
        prop_assert!(decoded.is_ok(), "{:?} failed to decode: {:?}", line, decoded);
        prop_assert_eq!(decoded.unwrap(), rec);
    }

    #[test]
    fn decode_never_panics(kind in prop_oneof![
        Just(clustergraph_core::RecordKind::QueueManager),
        Just(clustergraph_core::RecordKind::ClusterLink),
        Just(clustergraph_core::RecordKind::ClusterQueue),
    ], text in ".{0,200}") {
        let _ = decode(kind, &text);
    }
}
