#![no_main]

use knotgraph_api::{Verb, VerbRegistry, props};
use knotgraph_query::ExecuteOptions;
use knotgraph_storage::MemStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let verbs = VerbRegistry::new();
    verbs.register("has_skill", Verb::new("Skill", "name"));
    let Ok(plan) = knotgraph_query::compile(input, &verbs) else {
        return;
    };

    let store = MemStore::new();
    let (Ok(user), Ok(skill)) = (
        store.add_node("User", props! { "name" => "Alice", "age" => 35 }),
        store.add_node("Skill", props! { "name" => "Go" }),
    ) else {
        return;
    };
    let _ = store.add_edge(&user, &skill, "has_skill", props! { "level" => 3 });

    let options = ExecuteOptions::with_max_intermediate_rows(1_000);
    let _ = knotgraph_query::execute(&store, &plan, &options);
});
