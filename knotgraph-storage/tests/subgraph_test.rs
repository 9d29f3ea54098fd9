use knotgraph_api::{EdgeKey, GraphStore, NodeId, props};
use knotgraph_storage::{Error, MemStore};

fn tagged_pair(store: &MemStore, subgraph: &str) -> (NodeId, NodeId) {
    let a = store.add_node("User", props! { "name" => "a" }).unwrap();
    let b = store.add_node("User", props! { "name" => "b" }).unwrap();
    store.tag_node(&a, subgraph).unwrap();
    store.tag_node(&b, subgraph).unwrap();
    (a, b)
}

#[test]
fn test_nodes_in_subgraph() {
    let store = MemStore::new();
    let (a, b) = tagged_pair(&store, "eng");
    store.add_node("User", props! { "name" => "c" }).unwrap();

    let ids: Vec<NodeId> = store.nodes_in("eng").into_iter().map(|n| n.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a));
    assert!(ids.contains(&b));
    assert!(store.nodes_in("sales").is_empty());
}

#[test]
fn test_edge_inherits_membership_from_endpoints() {
    let store = MemStore::new();
    let (a, b) = tagged_pair(&store, "eng");
    let key = store.add_edge(&a, &b, "knows", props! {}).unwrap();

    let listed = store.edges_in("eng");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].subgraphs.contains("eng"));

    // The stored edge itself stays untagged.
    assert!(store.edge(&key).unwrap().subgraphs.is_empty());
}

#[test]
fn test_edge_with_outside_endpoint_is_excluded() {
    let store = MemStore::new();
    let (a, _) = tagged_pair(&store, "eng");
    let outsider = store.add_node("User", props! {}).unwrap();
    store.add_edge(&a, &outsider, "knows", props! {}).unwrap();

    assert!(store.edges_in("eng").is_empty());
}

#[test]
fn test_untag_node() {
    let store = MemStore::new();
    let (a, b) = tagged_pair(&store, "eng");
    store.add_edge(&a, &b, "knows", props! {}).unwrap();

    store.untag_node(&b, "eng").unwrap();
    assert_eq!(store.nodes_in("eng").len(), 1);
    assert!(store.edges_in("eng").is_empty());
}

#[test]
fn test_tagging_unknown_identities_fails() {
    let store = MemStore::new();
    let ghost = NodeId::from("ghost");

    assert!(matches!(store.tag_node(&ghost, "eng"), Err(Error::NodeNotFound(_))));
    assert!(matches!(store.untag_node(&ghost, "eng"), Err(Error::NodeNotFound(_))));
    assert!(matches!(
        store.tag_edge(&EdgeKey::new("x", "y", "z"), "eng"),
        Err(Error::EdgeNotFound(_))
    ));
}

#[test]
fn test_view_implements_graph_store() {
    let store = MemStore::new();
    let (a, b) = tagged_pair(&store, "eng");
    store.add_edge(&a, &b, "knows", props! {}).unwrap();

    let view = store.read();
    assert_eq!(GraphStore::nodes(&view).len(), 2);
    assert_eq!(GraphStore::nodes_in(&view, "eng").len(), 2);
    assert_eq!(GraphStore::edges_from(&view, &a).len(), 1);
    assert_eq!(view.edges_to(&b).len(), 1);
    assert_eq!(view.edges_in("eng").len(), 1);
    assert_eq!(view.edge_count(), 1);
}
