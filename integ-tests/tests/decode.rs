use std::collections::HashMap;

use field_fmt::{Decoder, ErrorKind, Map, Spanned, impl_record};
use integ_tests::{invalid, load};
use pretty_assertions::assert_eq;

#[derive(Debug, Default, PartialEq)]
struct Node {
    addr: String,
    name: String,
    monitor_rule: String,
    monitor_status: String,
    enabled_state: String,
}

impl_record! {
    Node {
        "addr" => addr,
        "name" => name,
        "monitor-rule" => monitor_rule,
        "monitor-status" => monitor_status,
        "status.enabled-state" => enabled_state,
    }
    name => name;
}

#[derive(Debug, Default, PartialEq)]
struct NodeExt {
    node: Node,
    availability_state: String,
    status_reason: String,
    tot_requests: i64,
}

impl_record! {
    NodeExt {
        "status.availability-state" => availability_state,
        "status.status-reason" => status_reason,
        "tot-requests" => tot_requests,
    }
    embed => [node];
}

#[derive(Debug, Default, PartialEq)]
struct PoolMember {
    name: String,
    addr: String,
    port: u16,
    monitor_rule: String,
    monitor_status: String,
    enabled_state: String,
    availability_state: String,
    status_reason: String,
}

impl_record! {
    PoolMember {
        "node-name" => name,
        "addr" => addr,
        "port" => port,
        "monitor-rule" => monitor_rule,
        "monitor-status" => monitor_status,
        "status.enabled-state" => enabled_state,
        "status.availability-state" => availability_state,
        "status.status-reason" => status_reason,
    }
}

#[derive(Debug, Default, PartialEq)]
struct Pool {
    active_member_count: u32,
    monitor_rule: String,
    name: String,
    availability_state: String,
    enabled_state: String,
    status_reason: String,
    members: Vec<PoolMember>,
}

impl_record! {
    Pool {
        "active-member-cnt" => active_member_count,
        "monitor-rule" => monitor_rule,
        "name" => name,
        "status.availability-state" => availability_state,
        "status.enabled-state" => enabled_state,
        "status.status-reason" => status_reason,
        "members" => members,
    }
    name => name;
}

#[derive(Debug, Default, PartialEq)]
struct VirtualServer {
    name: String,
    destination: String,
    ip_protocol: String,
    mask: String,
    partition: String,
    pool: String,
    profiles: HashMap<String, HashMap<String, String>>,
}

impl_record! {
    VirtualServer {
        "destination" => destination,
        "ip-protocol" => ip_protocol,
        "mask" => mask,
        "partition" => partition,
        "pool" => pool,
        "profiles" => profiles,
    }
    name => name;
}

#[derive(Debug, Default, PartialEq)]
struct ClientSslProfile {
    name: String,
    component: String,
    cert: String,
    cert_key_chain: Map<Map<String>>,
    chain: String,
    defaults_from: String,
    inherit_certkeychain: bool,
    key: String,
}

impl_record! {
    ClientSslProfile {
        "cert" => cert,
        "cert-key-chain" => cert_key_chain,
        "chain" => chain,
        "defaults-from" => defaults_from,
        "inherit-certkeychain" => inherit_certkeychain,
        "key" => key,
    }
    name => name;
    component => component;
}

fn node_fixture() -> Node {
    Node {
        addr: "192.0.2.1".into(),
        name: "dev-web01.example.com".into(),
        monitor_rule: "none".into(),
        monitor_status: "unchecked".into(),
        enabled_state: "enabled".into(),
    }
}

#[test]
fn node() {
    let node: Node = field_fmt::from_str(&load("node")).unwrap();
    assert_eq!(node, node_fixture());
}

#[test]
fn node_ext() {
    let ext: NodeExt = field_fmt::from_str(&load("node")).unwrap();
    assert_eq!(
        ext,
        NodeExt {
            node: node_fixture(),
            availability_state: "unknown".into(),
            status_reason: "Node address does not have service checking enabled".into(),
            tot_requests: 0,
        }
    );
}

#[test]
fn pool() {
    let pool: Pool = field_fmt::from_str(&load("pool")).unwrap();
    assert_eq!(
        pool,
        Pool {
            active_member_count: 2,
            monitor_rule: "/Common/tcp".into(),
            name: "api.example.com_8080".into(),
            availability_state: "available".into(),
            enabled_state: "enabled".into(),
            status_reason: "The pool is available".into(),
            members: vec![
                PoolMember {
                    name: "api01.example.com".into(),
                    addr: "192.0.2.1".into(),
                    port: 8080,
                    monitor_rule: "/Common/tcp (pool monitor)".into(),
                    monitor_status: "up".into(),
                    enabled_state: "enabled".into(),
                    availability_state: "available".into(),
                    status_reason: "Pool member is available".into(),
                },
                PoolMember {
                    name: "api02.example.com".into(),
                    addr: "192.0.2.2".into(),
                    port: 8080,
                    monitor_rule: "none".into(),
                    monitor_status: "unchecked".into(),
                    enabled_state: "disabled".into(),
                    availability_state: "unknown".into(),
                    status_reason: "Pool member does not have service checking enabled".into(),
                },
            ],
        }
    );
}

#[test]
fn pool_empty_status_reason() {
    let pool: Pool = field_fmt::from_str(&load("pool_empty_status_reason")).unwrap();
    assert_eq!(
        pool,
        Pool {
            active_member_count: 0,
            name: "api.example.com_8080".into(),
            monitor_rule: "none".into(),
            availability_state: "offline".into(),
            enabled_state: "enabled".into(),
            ..Pool::default()
        }
    );
}

#[test]
fn virtual_server() {
    let vs: VirtualServer = field_fmt::from_str(&load("virtual")).unwrap();
    let profile = |context: &str| HashMap::from([("context".to_owned(), context.to_owned())]);
    assert_eq!(
        vs,
        VirtualServer {
            name: "api.example.com_443".into(),
            destination: "203.0.113.1:https".into(),
            ip_protocol: "tcp".into(),
            mask: "255.255.255.255".into(),
            partition: "partition1".into(),
            pool: "api.example.com_443".into(),
            profiles: HashMap::from([
                ("/Common/tcp".to_owned(), profile("all")),
                ("wildcard.example.com".to_owned(), profile("clientside")),
            ]),
        }
    );
}

#[test]
fn client_ssl_profile() {
    let p: ClientSslProfile = field_fmt::from_str(&load("client_ssl")).unwrap();

    let chain: Map<String> = [
        ("cert", "wildcard.example.com_20191031-1.crt"),
        ("chain", "/Common/PUBCAG3_20191031-1.crt"),
        ("key", "wildcard.example.com_20191031-1.key"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();
    let mut cert_key_chain = Map::default();
    cert_key_chain.insert("wildcard.example.com_20191031-1".to_owned(), chain);

    assert_eq!(
        p,
        ClientSslProfile {
            name: "wildcard.example.com_20191031-1".into(),
            component: "profile-client-ssl".into(),
            cert: "wildcard.example.com_20191031-1.crt".into(),
            cert_key_chain,
            chain: "/Common/PUBCAG3_20191031-1.crt".into(),
            defaults_from: "/Common/clientssl_v2".into(),
            inherit_certkeychain: false,
            key: "wildcard.example.com_20191031-1.key".into(),
        }
    );
}

#[test]
fn several_documents() {
    let nodes: Vec<Node> = field_fmt::from_str_all(&load("nodes")).unwrap();
    let summary: Vec<(&str, &str)> = nodes
        .iter()
        .map(|n| (n.name.as_str(), n.monitor_status.as_str()))
        .collect();
    assert_eq!(summary, [("web01", "up"), ("web02", "down")]);
}

#[test]
fn tree_as_json() {
    let text = load("virtual");
    let entity = field_fmt::parse(&text).unwrap();
    let json = serde_json::to_value(&entity).unwrap();
    assert_eq!(json["component"], "virtual");
    assert_eq!(json["name"], "api.example.com_443");
    assert_eq!(json["body"]["profiles"]["/Common/tcp"]["context"], "all");
    assert_eq!(json["body"]["vs-index"], "1234");

    let text = load("pool_empty_status_reason");
    let entity = field_fmt::parse(&text).unwrap();
    let json = serde_json::to_value(&entity).unwrap();
    assert!(json["body"]["status.status-reason"].is_null());
}

#[test]
fn spanned_points_back_into_the_file() {
    #[derive(Default)]
    struct Member {
        state: Spanned<String>,
    }
    impl_record!(Member { "status.availability-state" => state });

    #[derive(Default)]
    struct Pool {
        members: Vec<Member>,
    }
    impl_record!(Pool { "members" => members });

    let text = load("pool");
    let pool: Pool = field_fmt::from_str(&text).unwrap();
    let state = &pool.members[1].state;
    assert_eq!(state.value, "unknown");
    assert_eq!(state.span.slice(&text), Some("unknown"));
}

#[test]
fn strict_errors_render() {
    let text = load("pool").replace("port 8080", "port http");
    let err = Decoder::new().strict(true).from_str::<Pool>(&text).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidScalar("u16")));
    insta::assert_snapshot!(err.to_string(), @"value is not a valid 'u16'");

    let file = integ_tests::File::new("pool", &text);
    let rendered = integ_tests::emit_diags(&file, Some(err.to_diagnostic(())));
    assert!(rendered.contains("error[invalid-scalar]"), "{rendered}");
    assert!(rendered.contains("expected a u16"), "{rendered}");
}

#[test]
fn parse_error_messages() {
    let err = field_fmt::parse(&load("invalid_illegal")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"illegal character found: `=`");
    assert_eq!(err.line_info, Some((1, 9)));

    let err = field_fmt::parse(&load("invalid_eof")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unexpected eof encountered");
}

invalid!(invalid_illegal, "illegal-character");
invalid!(invalid_eof, "unexpected-eof");
