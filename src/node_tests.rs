use super::*;

fn sample() -> &'static str {
    "ltm pool p {
    members {
        m1:80 {
            addr 192.0.2.1
        }
    }
    status.status-reason
    name p
}"
}

#[test]
fn accessors() {
    let entity = crate::parse(sample()).unwrap();
    let body = &entity.body;
    assert_eq!(body.len(), 3);
    assert!(!body.is_empty());

    let members = body.get("members").unwrap();
    assert!(!members.is_bare());
    assert_eq!(members.as_str(), None);
    let block = members.as_block().unwrap();
    assert_eq!(block.entries[0].key, "m1:80");
    assert_eq!(block.entries[0].as_block().unwrap().get_str("addr"), Some("192.0.2.1"));

    let reason = body.get("status.status-reason").unwrap();
    assert!(reason.is_bare());
    assert_eq!(reason.as_block(), None);

    let name = body.get("name").unwrap().value.as_ref().unwrap();
    assert_eq!(name.as_str(), Some("p"));
    assert_eq!(name.type_str(), "a scalar");
    assert!(name.as_block().is_none());
    assert_eq!(name.as_scalar().map(|s| s.text), Some("p"));

    let members_value = members.value.as_ref().unwrap();
    assert_eq!(members_value.type_str(), "a block");
    assert!(members_value.as_scalar().is_none());
}

#[test]
fn iteration_keeps_source_order() {
    let entity = crate::parse(sample()).unwrap();
    let keys: Vec<&str> = (&entity.body).into_iter().map(|e| e.key).collect();
    assert_eq!(keys, ["members", "status.status-reason", "name"]);
}

#[test]
fn trees_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Entity<'static>>();
    assert_send_sync::<Block<'static>>();
}

#[cfg(feature = "serde")]
#[test]
fn serializes_as_nested_maps() {
    let entity = crate::parse(sample()).unwrap();
    let json = serde_json::to_value(&entity).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "component": "pool",
            "name": "p",
            "body": {
                "members": {
                    "m1:80": { "addr": "192.0.2.1" }
                },
                "status.status-reason": null,
                "name": "p"
            }
        })
    );
}
