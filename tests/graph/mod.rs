// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use archspec::*;

fn modules() -> Result<(Module, Module, Module)> {
    Ok((
        Module::new("A", &["a.*"])?,
        Module::new("B", &["b.*"])?,
        Module::new("C", &["c.*"])?,
    ))
}

#[test]
fn add_module_is_idempotent() -> Result<()> {
    let (a, b, _) = modules()?;
    let mut graph = ModuleGraph::new();
    graph.add_module(&a);
    graph.add_module(&a);
    graph.add_module(&b);
    assert_eq!(graph.modules(), &[a.clone(), b]);
    assert!(graph.contains(&a));
    Ok(())
}

#[test]
fn add_dependency_counts_accesses() -> Result<()> {
    let (a, b, _) = modules()?;
    let mut graph = ModuleGraph::new();
    graph.add_module(&a);
    graph.add_module(&b);

    graph.add_dependency(&a, &b);
    assert_eq!(graph.find_dependency(&a, &b).map(|d| d.count), Some(1));
    graph.add_dependency(&a, &b);
    assert_eq!(graph.find_dependency(&a, &b).map(|d| d.count), Some(2));
    assert_eq!(graph.edges().count(), 1);
    assert!(graph.find_dependency(&b, &a).is_none());
    Ok(())
}

#[test]
fn add_dependency_to_unknown_module_is_ignored() -> Result<()> {
    let (a, b, c) = modules()?;
    let mut graph = ModuleGraph::new();
    graph.add_module(&a);
    graph.add_module(&b);

    graph.add_dependency(&a, &c);
    graph.add_dependency(&c, &a);
    assert_eq!(graph.edges().count(), 0);
    assert!(!graph.contains(&c));
    Ok(())
}

#[test]
fn dependencies_are_distinct_successors() -> Result<()> {
    let (a, b, c) = modules()?;
    let mut graph = ModuleGraph::new();
    for m in [&a, &b, &c] {
        graph.add_module(m);
    }
    graph.add_dependency(&a, &b);
    graph.add_dependency(&a, &b);
    graph.add_dependency(&a, &c);
    graph.add_dependency(&b, &c);

    assert_eq!(graph.dependencies(&a), vec![&b, &c]);
    assert_eq!(graph.dependencies(&c), Vec::<&Module>::new());
    assert_eq!(graph.fan_out_of(&a), Some(2));
    assert_eq!(graph.fan_in_of(&c), Some(2));
    assert_eq!(graph.fan_in_of(&a), Some(0));
    Ok(())
}
