use knotgraph::{Graph, GraphOptions, ReadConsistency, Verb, props};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_parallel_writers_and_queries() {
    let graph = Graph::new();
    graph.register_verb("has_skill", Verb::new("Skill", "name"));
    let go = graph.add_node("Skill", props! { "name" => "Go" }).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let graph = graph.clone();
            let go = go.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let user = graph
                        .add_node("User", props! { "t" => t, "i" => i })
                        .unwrap();
                    graph.add_edge(&user, &go, "has_skill", props! {}).unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let graph = graph.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    let result = graph.query("Find('User').Has('has_skill','Go')").unwrap();
                    assert!(result.len() <= 200);
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }

    let result = graph.query("Find('User').Has('has_skill','Go')").unwrap();
    assert_eq!(result.len(), 200);
}

#[test]
fn test_snapshot_reads_agree_with_per_call_reads() {
    let per_call = Graph::new();
    per_call.register_verb("joined", Verb::new("Hub", "name"));
    let hub = per_call.add_node("Hub", props! { "name" => "hub" }).unwrap();
    for i in 0..10 {
        let user = per_call.add_node("User", props! { "i" => i }).unwrap();
        if i % 2 == 0 {
            per_call.add_edge(&user, &hub, "joined", props! {}).unwrap();
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.kg");
    per_call.save(&path).unwrap();
    let options = GraphOptions::default().with_read_consistency(ReadConsistency::Snapshot);
    let snapshot = Graph::open_with(&path, options).unwrap();

    let text = "Find('User').Has('joined','hub').Where('n.i','<',7)";
    assert_eq!(per_call.query(text).unwrap(), snapshot.query(text).unwrap());
    assert_eq!(snapshot.query(text).unwrap().len(), 4);
}

#[test]
fn test_snapshot_readers_do_not_starve_writers() {
    let options = GraphOptions::default().with_read_consistency(ReadConsistency::Snapshot);
    let graph = Graph::with_options(options);
    graph.register_verb("joined", Verb::new("Hub", "name"));
    let hub = graph.add_node("Hub", props! { "name" => "hub" }).unwrap();

    let writer = {
        let graph = graph.clone();
        let hub = hub.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let user = graph.add_node("User", props! {}).unwrap();
                graph.add_edge(&user, &hub, "joined", props! {}).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let graph = graph.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    let joined = graph.query("Find('User').Has('joined','hub')").unwrap().len();
                    assert!(joined <= 200);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for h in readers {
        h.join().unwrap();
    }
    assert_eq!(graph.query("Find('User').Has('joined','hub')").unwrap().len(), 200);
}

#[test]
fn test_concurrent_verb_registration_and_queries() {
    let graph = Arc::new(Graph::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for i in 0..25 {
                    graph.register_verb(format!("k{t}_{i}"), Verb::new("X", ""));
                    graph.query("Find('X').Has('k0_0','v')").unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(graph.verbs().len(), 200);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_join_returns_exactly_connected_users(
        links in prop::collection::vec(any::<bool>(), 0..30)
    ) {
        let graph = Graph::new();
        graph.register_verb("uses", Verb::new("Tool", "name"));
        let tool = graph.add_node("Tool", props! { "name" => "hammer" }).unwrap();

        let mut expected = HashSet::new();
        for linked in &links {
            let user = graph.add_node("User", props! {}).unwrap();
            if *linked {
                graph.add_edge(&user, &tool, "uses", props! {}).unwrap();
                expected.insert(user);
            }
        }

        let result = graph.query("Find('User').Has('uses','hammer')").unwrap();
        let found: HashSet<_> = result.column("n").into_iter().map(|n| n.id.clone()).collect();
        prop_assert_eq!(result.len(), expected.len());
        prop_assert_eq!(found, expected);
    }
}
