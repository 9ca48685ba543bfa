// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use crate::*;

fn modules(names: &[&str]) -> Vec<Module> {
    names
        .iter()
        .map(|n| Module::new(n, &[format!("{}.*", n.to_lowercase())]).unwrap())
        .collect()
}

fn graph(vertices: &[Module], edges: &[(usize, usize)]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for m in vertices {
        graph.add_module(m);
    }
    for (s, d) in edges {
        graph.add_dependency(&vertices[*s], &vertices[*d]);
    }
    graph
}

#[test]
fn path_steps_are_direct_edges() {
    // A -> B -> D, A -> C -> D, D -> E
    let v = modules(&["A", "B", "C", "D", "E"]);
    let g = graph(&v, &[(0, 1), (1, 3), (0, 2), (2, 3), (3, 4)]);
    let closure = TransitiveClosure::new(&g, &v);

    let path = closure.minimum_distance_path(&v[0], &v[4]).unwrap();
    assert_eq!(path.len(), 4);
    assert_eq!(path.first(), Some(&v[0]));
    assert_eq!(path.last(), Some(&v[4]));
    assert!(closure.is_walk(&path));
    assert_eq!(closure.minimum_distance(&v[0], &v[4]), Some(Distance::Finite(3)));
}

#[test]
fn self_path_is_the_shortest_cycle() {
    let v = modules(&["A", "B", "C"]);
    let g = graph(&v, &[(0, 1), (1, 2), (2, 0), (1, 0)]);
    let closure = TransitiveClosure::new(&g, &v);

    assert_eq!(closure.minimum_distance(&v[0], &v[0]), Some(Distance::Finite(2)));
    let path = closure.minimum_distance_path(&v[0], &v[0]).unwrap();
    assert_eq!(path, vec![v[0].clone(), v[1].clone(), v[0].clone()]);
}

#[test]
fn vertices_outside_the_closure_are_ignored() {
    let v = modules(&["A", "B", "C"]);
    // A -> C -> B, but C is not part of the closure.
    let g = graph(&v, &[(0, 2), (2, 1)]);
    let closure = TransitiveClosure::new(&g, &v[..2]);

    assert!(!closure.is_reachable(&v[0], &v[1]));
    assert_eq!(closure.minimum_distance(&v[0], &v[2]), None);
    assert_eq!(closure.minimum_distance_path(&v[0], &v[1]), Some(vec![]));
    assert!(!closure.is_walk(&[v[0].clone(), v[2].clone()]));
}

#[test]
fn infinite_distance_saturates() {
    assert_eq!(Distance::Finite(u32::MAX).plus(Distance::Finite(1)), Distance::Infinite);
    assert_eq!(Distance::Finite(2).plus(Distance::Infinite), Distance::Infinite);
    assert_eq!(Distance::Finite(2).plus(Distance::Finite(3)), Distance::Finite(5));
    assert!(Distance::Finite(u32::MAX) < Distance::Infinite);
}
