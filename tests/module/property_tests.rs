//! Property tests for activation invariants over random acyclic graphs

use proptest::prelude::*;
use std::collections::HashSet;

use super::test_utils::*;

/// Module `m{i}` depends on `m{j}` for every `j < i` with `edges[i][j]` set
fn build(edges: &[Vec<bool>]) -> ModuleTestFixture {
    let mut fixture = ModuleTestFixture::new();
    for (i, row) in edges.iter().enumerate() {
        let requires: Vec<String> = (0..i).filter(|&j| row[j]).map(|j| format!("m{j}")).collect();
        let requires: Vec<&str> = requires.iter().map(String::as_str).collect();
        fixture.module(&format!("m{i}"), &requires);
    }
    fixture
}

fn dependencies(edges: &[Vec<bool>], i: usize) -> Vec<usize> {
    (0..i).filter(|&j| edges[i][j]).collect()
}

proptest! {
    #[test]
    fn test_each_module_activates_once_after_its_dependencies(
        edges in prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 1..8),
        requests in prop::collection::vec(prop::collection::vec(0usize..8, 1..4), 1..4),
    ) {
        let n = edges.len();
        let mut engine = build(&edges).engine();

        let mut expected = HashSet::new();
        for request in &requests {
            let names: Vec<String> = request.iter().map(|i| format!("m{}", i % n)).collect();
            let loaded = engine.load(names.clone()).unwrap();
            prop_assert_eq!(loaded.names(), names.iter().map(String::as_str).collect::<Vec<_>>());

            let mut stack: Vec<usize> = request.iter().map(|i| i % n).collect();
            while let Some(i) = stack.pop() {
                if expected.insert(i) {
                    stack.extend(dependencies(&edges, i));
                }
            }
        }

        let order = controllers(&engine);
        let position = |i: usize| order.iter().position(|c| *c == format!("m{i}Ctrl"));

        // exactly the requested closure is active, each replayed once
        prop_assert_eq!(order.len(), expected.len());
        for i in 0..n {
            prop_assert_eq!(engine.is_loaded(&format!("m{i}")), expected.contains(&i));
        }

        // dependencies replay before their dependents
        for &i in &expected {
            let at = position(i).unwrap();
            for j in dependencies(&edges, i) {
                prop_assert!(position(j).unwrap() < at, "m{} replayed after m{}", j, i);
            }
        }
    }
}
