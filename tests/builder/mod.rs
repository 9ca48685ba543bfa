// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use archspec::*;

fn modules() -> Result<Vec<Module>> {
    Ok(vec![
        Module::new("Web", &["com.acme.web.*"])?,
        Module::new("Core", &["com.acme.core.*"])?,
        Module::new("Api", &["com.acme.core.api.*", "com.acme.web.api.*"])?,
    ])
}

fn count(graph: &ModuleGraph, source: &Module, dest: &Module) -> Option<u32> {
    graph.find_dependency(source, dest).map(|d| d.count)
}

#[test]
fn elements_map_to_matching_modules() -> Result<()> {
    let m = modules()?;
    let other = Module::other();
    let mut builder = DependencyGraphBuilder::new(&m, other.clone());

    builder.apply("com.acme.web.Ctl", "com.acme.core.Svc", AccessKind::Invoke);
    builder.apply("com.acme.web.Ctl", "com.acme.core.Svc", AccessKind::FieldAccess);
    builder.apply("com.acme.core.Svc", "java.util.List", AccessKind::TypeReference);
    builder.apply("org.lib.Hook", "com.acme.web.Ctl", AccessKind::Other);

    let (graph, diagnostics) = builder.finish();
    assert_eq!(graph.modules().len(), 4);
    assert_eq!(count(&graph, &m[0], &m[1]), Some(2));
    assert_eq!(count(&graph, &m[1], &other), Some(1));
    assert_eq!(count(&graph, &other, &m[0]), Some(1));
    assert_eq!(graph.edges().count(), 3);

    // Api matched nothing.
    assert_eq!(
        diagnostics,
        vec![Diagnostic::DeadModule {
            module: "Api".to_string()
        }]
    );
    Ok(())
}

#[test]
fn self_dependencies_are_not_recorded() -> Result<()> {
    let m = modules()?;
    let other = Module::other();
    let mut builder = DependencyGraphBuilder::new(&m, other.clone());

    builder.apply("com.acme.web.A", "com.acme.web.B", AccessKind::Invoke);
    builder.apply("java.lang.String", "java.lang.Object", AccessKind::Inheritance);

    let (graph, _) = builder.finish();
    assert_eq!(graph.edges().count(), 0);
    Ok(())
}

#[test]
fn ambiguous_element_connects_every_match() -> Result<()> {
    let m = modules()?;
    let mut builder = DependencyGraphBuilder::new(&m, Module::other());

    // `com.acme.core.api.Port` belongs to both Core and Api.
    builder.apply("com.acme.web.Ctl", "com.acme.core.api.Port", AccessKind::Invoke);
    builder.apply("com.acme.web.Ctl", "com.acme.core.api.Port", AccessKind::Invoke);
    builder.new_node("com.acme.core.api.Port");

    assert_eq!(builder.modules_matching("com.acme.core.api.Port"), vec![&m[1], &m[2]]);
    let (graph, diagnostics) = builder.finish();
    assert_eq!(count(&graph, &m[0], &m[1]), Some(2));
    assert_eq!(count(&graph, &m[0], &m[2]), Some(2));
    // Both modules own the element, but a module never depends on itself.
    assert_eq!(count(&graph, &m[1], &m[2]), None);

    assert_eq!(
        diagnostics,
        vec![Diagnostic::AmbiguousElement {
            element: "com.acme.core.api.Port".to_string(),
            modules: vec!["Core".to_string(), "Api".to_string()],
        }]
    );
    Ok(())
}

#[test]
fn ambiguous_source_and_destination() -> Result<()> {
    let m = modules()?;
    let mut builder = DependencyGraphBuilder::new(&m, Module::other());

    builder.apply("com.acme.core.api.In", "com.acme.web.api.Out", AccessKind::Invoke);

    let (graph, diagnostics) = builder.finish();
    // {Core, Api} x {Web, Api} minus Api -> Api.
    assert_eq!(count(&graph, &m[1], &m[0]), Some(1));
    assert_eq!(count(&graph, &m[1], &m[2]), Some(1));
    assert_eq!(count(&graph, &m[2], &m[0]), Some(1));
    assert_eq!(graph.edges().count(), 3);
    assert_eq!(diagnostics.len(), 2);
    Ok(())
}

#[test]
fn unmatched_elements_go_to_other() -> Result<()> {
    let m = modules()?;
    let builder = DependencyGraphBuilder::new(&m, Module::other());
    let matched = builder.modules_matching("org.slf4j.Logger");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name(), OTHER_MODULE_NAME);
    Ok(())
}

#[test]
fn duplicate_names_are_tolerated_with_warning() -> Result<()> {
    let m = vec![
        Module::new("Core", &["a.*"])?,
        Module::new("Core", &["b.*"])?,
    ];
    let mut builder = DependencyGraphBuilder::new(&m, Module::other());
    assert_eq!(
        builder.diagnostics(),
        &[Diagnostic::DuplicateModuleName {
            name: "Core".to_string()
        }]
    );

    builder.apply("a.X", "b.Y", AccessKind::Invoke);
    let (graph, diagnostics) = builder.finish();
    assert_eq!(count(&graph, &m[0], &m[1]), Some(1));
    assert_eq!(diagnostics.len(), 1);
    Ok(())
}

#[test]
fn scanning_an_access_log() -> Result<()> {
    let m = modules()?;
    let mut log = AccessLog::new();
    log.add_root("web.jar")
        .element("com.acme.web.Ctl")
        .access("com.acme.web.Ctl", "com.acme.core.Svc", AccessKind::Invoke);
    log.add_root("core.jar").element("com.acme.core.Svc");

    let mut builder = DependencyGraphBuilder::new(&m, Module::other());
    log.scan(&mut builder)?;
    let (graph, diagnostics) = builder.finish();

    assert_eq!(count(&graph, &m[0], &m[1]), Some(1));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].to_string(), "module `Api` does not match any scanned element");
    Ok(())
}
