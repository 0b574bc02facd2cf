use clustergraph_core::{
    ChannelStatus, ClusterLinkRecord, ClusterQueueRecord, DefinitionType, QmgrType,
    QueueManagerRecord, TopologyError,
};
use clustergraph_graph::{EdgeKind, TopologyGraph, VertexKind};
use serde_json::Value as JsonValue;

fn qm(name: &str, command_level: i32, version: &str) -> QueueManagerRecord {
    QueueManagerRecord {
        tag: "PROD1".into(),
        name: name.into(),
        id: format!("{}_ID", name),
        description: format!("{} description", name),
        command_level,
        platform: "MQPL_UNIX".into(),
        version: version.into(),
    }
}

fn link(source: &str, peer: &str, definition_type: DefinitionType) -> ClusterLinkRecord {
    ClusterLinkRecord {
        source_name: source.into(),
        tag: "PROD2".into(),
        peer_name: peer.into(),
        peer_id: format!("{}_ID", peer),
        peer_type: QmgrType::Repository,
        cluster: "CLUS1".into(),
        channel: format!("TO.{}", peer),
        connection: "host2(1414)".into(),
        definition_type,
        ssl_auth: "MQSCA_REQUIRED".into(),
        ssl_cipher: String::new(),
        ssl_peer: String::new(),
        status: ChannelStatus::Running,
        transmit_queue: "SYSTEM.CLUSTER.TRANSMIT.QUEUE".into(),
        version: "09030000".into(),
    }
}

fn queue(owner: &str, name: &str, cluster_qmgr: &str) -> ClusterQueueRecord {
    ClusterQueueRecord {
        owner_name: owner.into(),
        queue_name: name.into(),
        cluster: "CLUS1".into(),
        cluster_qmgr: cluster_qmgr.into(),
        cluster_queue_type: "MQCQT_LOCAL_Q".into(),
        priority: 0,
        rank: 3,
        default_bind: "MQBND_BIND_ON_OPEN".into(),
        description: String::new(),
        put_status: "MQQA_PUT_ALLOWED".into(),
        qm_id: format!("{}_ID", cluster_qmgr),
    }
}

#[test]
fn repeated_queue_manager_updates_in_place() {
    let mut graph = TopologyGraph::new();
    let first = graph.upsert_queue_manager(&qm("QM1", 900, "09000000"));

    let mut second = qm("QM1", 910, "09010000");
    second.tag = "OTHER".into();
    second.id = "OTHER_ID".into();
    second.description = "rebuilt".into();
    second.platform = "MQPL_WINDOWS_NT".into();
    assert_eq!(graph.upsert_queue_manager(&second), first);

    assert_eq!(graph.vertex_count(), 1);
    let v = graph.find_queue_manager("QM1").unwrap();
    assert_eq!(v.str_property("tag"), Some("PROD1"));
    assert_eq!(v.str_property("qm_id"), Some("QM1_ID"));
    assert_eq!(v.str_property("description"), Some("rebuilt"));
    assert_eq!(v.str_property("platform"), Some("MQPL_WINDOWS_NT"));
    assert_eq!(v.int_property("command_level"), Some(910));
    assert_eq!(v.str_property("version"), Some("09010000"));
}

#[test]
fn low_command_level_update_shows_level_as_version() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 701, "701"));
    graph.upsert_queue_manager(&qm("QM1", 701, "07010000"));
    let v = graph.find_queue_manager("QM1").unwrap();
    assert_eq!(v.str_property("version"), Some("701"));

    graph.upsert_queue_manager(&qm("QM1", 710, "07100000"));
    let v = graph.find_queue_manager("QM1").unwrap();
    assert_eq!(v.str_property("version"), Some("07100000"));
}

#[test]
fn non_sender_links_never_produce_edges() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    for dt in [
        DefinitionType::ClusterReceiver,
        DefinitionType::ExplicitClusterSender,
        DefinitionType::AutoExplicitClusterSender,
        DefinitionType::Unknown("MQQMDT_SOMETHING_NEW".into()),
    ] {
        assert_eq!(graph.upsert_cluster_link(&link("QM1", "QM2", dt)).unwrap(), None);
    }
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.find_queue_manager("QM2").is_none());
}

#[test]
fn auto_sender_link_adds_edge_and_stub_peer() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));

    let edge_id = graph
        .upsert_cluster_link(&link("QM1", "QM2", DefinitionType::AutoClusterSender))
        .unwrap()
        .expect("auto cluster sender produces an edge");

    assert_eq!(graph.vertex_count(), 2);
    let stub = graph.find_queue_manager("QM2").unwrap();
    let mut keys: Vec<&str> = stub.properties.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["name", "qm_id", "tag", "version"]);
    assert_eq!(stub.str_property("tag"), Some("PROD2"));

    let edge = graph.edges().find(|e| e.id == edge_id).unwrap();
    assert_eq!(edge.kind, EdgeKind::Connects);
    assert_eq!(edge.source, graph.find_queue_manager("QM1").unwrap().id);
    assert_eq!(edge.target, stub.id);
    assert_eq!(edge.str_property("definition_type"), Some("MQQMDT_AUTO_CLUSTER_SENDER"));
    assert_eq!(edge.str_property("channel"), Some("TO.QM2"));
    assert_eq!(edge.str_property("qm_type"), Some("MQQMT_REPOSITORY"));
}

#[test]
fn stub_peer_is_enriched_when_collected_later() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    graph
        .upsert_cluster_link(&link("QM1", "QM2", DefinitionType::AutoClusterSender))
        .unwrap();
    graph.upsert_queue_manager(&qm("QM2", 920, "09020000"));

    assert_eq!(graph.stats().queue_managers, 2);
    let v = graph.find_queue_manager("QM2").unwrap();
    assert_eq!(v.str_property("platform"), Some("MQPL_UNIX"));
    assert_eq!(v.int_property("command_level"), Some(920));
}

#[test]
fn repeated_links_are_not_deduplicated() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    let rec = link("QM1", "QM2", DefinitionType::AutoClusterSender);
    graph.upsert_cluster_link(&rec).unwrap();
    graph.upsert_cluster_link(&rec).unwrap();

    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edges_of_kind(EdgeKind::Connects).count(), 2);
}

#[test]
fn missing_link_source_is_skipped_not_fabricated() {
    let mut graph = TopologyGraph::new();
    let err = graph
        .upsert_cluster_link(&link("GHOST", "QM2", DefinitionType::AutoClusterSender))
        .unwrap_err();
    assert!(matches!(err, TopologyError::StructuralInconsistency { ref key, .. } if key == "GHOST"));
    assert_eq!(graph.vertex_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.stats().skipped_edges, 1);
}

#[test]
fn queue_ownership_classification() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    graph.upsert_queue_manager(&qm("QM2", 910, "09010000"));

    graph.upsert_cluster_queue(&queue("QM1", "APP.Q", "QM1")).unwrap();
    graph.upsert_cluster_queue(&queue("QM2", "APP.Q", "QM1")).unwrap();

    let stats = graph.stats();
    assert_eq!(stats.queues, 2);
    assert_eq!(stats.owns, 1);
    assert_eq!(stats.uses, 1);

    let owned = graph.find_queue("QM1", "APP.Q").unwrap();
    let used = graph.find_queue("QM2", "APP.Q").unwrap();
    assert_ne!(owned.id, used.id);
    assert_eq!(owned.kind, VertexKind::Queue);
    assert_eq!(used.str_property("cluster_qmgr"), Some("QM1"));
    assert_eq!(used.property("rank"), Some(&JsonValue::from(3)));

    let uses = graph.edges_of_kind(EdgeKind::Uses).next().unwrap();
    assert_eq!(uses.source, graph.find_queue_manager("QM2").unwrap().id);
    assert_eq!(uses.target, used.id);
}

#[test]
fn repeated_queue_reuses_vertex_but_adds_edge() {
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    let rec = queue("QM1", "APP.Q", "QM1");
    let first = graph.upsert_cluster_queue(&rec).unwrap();
    let second = graph.upsert_cluster_queue(&rec).unwrap();

    assert_ne!(first, second);
    assert_eq!(graph.stats().queues, 1);
    assert_eq!(graph.edges_of_kind(EdgeKind::Owns).count(), 2);
}

#[test]
fn missing_queue_owner_is_skipped() {
    let mut graph = TopologyGraph::new();
    assert!(matches!(
        graph.upsert_cluster_queue(&queue("GHOST", "APP.Q", "GHOST")),
        Err(TopologyError::StructuralInconsistency { .. })
    ));
    assert!(graph.find_queue("GHOST", "APP.Q").is_none());
    assert_eq!(graph.vertex_count(), 0);
}

#[test]
fn write_exports_produces_both_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut graph = TopologyGraph::new();
    graph.upsert_queue_manager(&qm("QM1", 910, "09010000"));
    graph
        .upsert_cluster_link(&link("QM1", "QM2", DefinitionType::AutoClusterSender))
        .unwrap();
    graph.upsert_cluster_queue(&queue("QM1", "APP.Q", "QM1")).unwrap();

    let written = graph.write_exports(dir.path().join("cluster")).unwrap();
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("cluster.graphml").exists());

    let json = std::fs::read_to_string(dir.path().join("cluster.json")).unwrap();
    let doc: JsonValue = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["vertices"].as_array().unwrap().len(), 3);
    assert_eq!(doc["edges"].as_array().unwrap().len(), 2);

    let xml = std::fs::read_to_string(dir.path().join("cluster.graphml")).unwrap();
    assert_eq!(xml.matches("<node ").count(), 3);
    assert_eq!(xml.matches("<edge ").count(), 2);
}

#[test]
fn export_to_unwritable_target_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let graph = TopologyGraph::new();
    let err = graph
        .write_exports(dir.path().join("missing").join("cluster"))
        .unwrap_err();
    assert!(matches!(err, TopologyError::Io(_)));
}
