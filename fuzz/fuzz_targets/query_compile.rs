#![no_main]

use knotgraph_api::{Verb, VerbRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let verbs = VerbRegistry::new();
    verbs.register("has_skill", Verb::new("Skill", "name"));
    if let Ok(plan) = knotgraph_query::compile(input, &verbs) {
        let _ = plan.to_string();
    }
});
