// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::scanner::{AccessKind, AccessListener};

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::Serialize;

/// Non-fatal findings reported while building the actual dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// More than one module was given the same name.
    DuplicateModuleName { name: String },

    /// An element is matched by several declared modules.
    AmbiguousElement {
        element: String,
        modules: Vec<String>,
    },

    /// A declared module matched none of the scanned elements.
    DeadModule { module: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateModuleName { name } => {
                write!(f, "construction warning: module name `{name}` is used more than once")
            }
            Self::AmbiguousElement { element, modules } => write!(
                f,
                "ambiguous element `{element}` belongs to multiple modules: {}",
                modules.join(", ")
            ),
            Self::DeadModule { module } => {
                write!(f, "module `{module}` does not match any scanned element")
            }
        }
    }
}

/// Folds access events into a [`ModuleGraph`] over the declared modules plus
/// the catch-all module.
pub struct DependencyGraphBuilder {
    modules: Vec<Module>,
    other: Module,
    graph: ModuleGraph,
    diagnostics: Vec<Diagnostic>,
    // Per declared module: has any element matched it?
    live: Vec<bool>,
    ambiguous: BTreeSet<String>,
}

impl DependencyGraphBuilder {
    pub fn new(modules: &[Module], other: Module) -> Self {
        let mut graph = ModuleGraph::new();
        let mut diagnostics = vec![];

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for m in modules {
            *seen.entry(m.name()).or_default() += 1;
        }
        for (name, n) in seen {
            if n > 1 {
                let d = Diagnostic::DuplicateModuleName {
                    name: name.to_string(),
                };
                warn!("{d}");
                diagnostics.push(d);
            }
        }

        for m in modules {
            graph.add_module(m);
        }
        graph.add_module(&other);

        Self {
            modules: modules.to_vec(),
            other,
            graph,
            diagnostics,
            live: vec![false; modules.len()],
            ambiguous: BTreeSet::new(),
        }
    }

    /// Declared modules matching `element`, or just the catch-all module when
    /// none does.
    pub fn modules_matching(&self, element: &str) -> Vec<&Module> {
        let matched: Vec<&Module> = self.modules.iter().filter(|m| m.matches(element)).collect();
        match matched.is_empty() {
            true => vec![&self.other],
            false => matched,
        }
    }

    // Indices of matching declared modules; records liveness and ambiguity.
    fn classify(&mut self, element: &str) -> Vec<usize> {
        let matched: Vec<usize> = self
            .modules
            .iter()
            .enumerate()
            .filter(|(_, m)| m.matches(element))
            .map(|(idx, _)| idx)
            .collect();

        for idx in &matched {
            self.live[*idx] = true;
        }

        if matched.len() > 1 && self.ambiguous.insert(element.to_string()) {
            let d = Diagnostic::AmbiguousElement {
                element: element.to_string(),
                modules: matched
                    .iter()
                    .map(|idx| self.modules[*idx].name().to_string())
                    .collect(),
            };
            warn!("{d}");
            self.diagnostics.push(d);
        }
        matched
    }

    fn resolve(&self, matched: &[usize]) -> Vec<Module> {
        if matched.is_empty() {
            return vec![self.other.clone()];
        }
        let mut resolved: Vec<Module> = Vec::with_capacity(matched.len());
        for idx in matched {
            let m = &self.modules[*idx];
            if !resolved.contains(m) {
                resolved.push(m.clone());
            }
        }
        resolved
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Completes the graph and reports declared modules that matched nothing.
    pub fn finish(mut self) -> (ModuleGraph, Vec<Diagnostic>) {
        for (module, live) in self.modules.iter().zip(&self.live) {
            if !live {
                let d = Diagnostic::DeadModule {
                    module: module.name().to_string(),
                };
                warn!("{d}");
                self.diagnostics.push(d);
            }
        }
        debug!(
            "dependency graph: {} modules, {} edges",
            self.graph.modules().len(),
            self.graph.edges().count()
        );
        (self.graph, self.diagnostics)
    }
}

impl AccessListener for DependencyGraphBuilder {
    fn new_node(&mut self, element: &str) {
        self.classify(element);
    }

    fn apply(&mut self, source: &str, dest: &str, _kind: AccessKind) {
        let sources = self.classify(source);
        let dests = self.classify(dest);
        let sources = self.resolve(&sources);
        let dests = self.resolve(&dests);

        for s in &sources {
            for d in &dests {
                if s != d {
                    self.graph.add_dependency(s, d);
                }
            }
        }
    }
}
