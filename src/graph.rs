// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::module::Module;

use std::collections::BTreeMap;

use serde::Serialize;

/// A directed edge between two modules with the number of accesses observed
/// along it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDependency {
    pub source: Module,
    pub dest: Module,
    pub count: u32,
}

/// Directed graph over unique modules. At most one edge exists per ordered
/// pair of vertices.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    // Vertices in insertion order.
    modules: Vec<Module>,
    index: BTreeMap<Module, usize>,
    // Keyed by (source, dest) vertex index.
    edges: BTreeMap<(usize, usize), ModuleDependency>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn contains(&self, module: &Module) -> bool {
        self.index.contains_key(module)
    }

    pub fn index_of(&self, module: &Module) -> Option<usize> {
        self.index.get(module).copied()
    }

    /// Adds `module` as a vertex unless it is already present.
    pub fn add_module(&mut self, module: &Module) {
        if !self.contains(module) {
            self.index.insert(module.clone(), self.modules.len());
            self.modules.push(module.clone());
        }
    }

    /// Records one access from `source` to `dest`.
    ///
    /// Accesses touching a module that is not a vertex are dropped.
    pub fn add_dependency(&mut self, source: &Module, dest: &Module) {
        let (Some(s), Some(d)) = (self.index_of(source), self.index_of(dest)) else {
            return;
        };
        let edge = self
            .edges
            .entry((s, d))
            .or_insert_with(|| ModuleDependency {
                source: source.clone(),
                dest: dest.clone(),
                count: 0,
            });
        edge.count += 1;
    }

    pub fn find_dependency(&self, source: &Module, dest: &Module) -> Option<&ModuleDependency> {
        let s = self.index_of(source)?;
        let d = self.index_of(dest)?;
        self.edges.get(&(s, d))
    }

    /// All edges, ordered by source then destination insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ModuleDependency> {
        self.edges.values()
    }

    pub(crate) fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.keys().copied()
    }

    /// Distinct successors of `module`; empty if it is not a vertex.
    pub fn dependencies(&self, module: &Module) -> Vec<&Module> {
        match self.index_of(module) {
            Some(s) => self
                .edges
                .range((s, 0)..=(s, usize::MAX))
                .map(|((_, d), _)| &self.modules[*d])
                .collect(),
            None => vec![],
        }
    }

    fn has_self_loop(&self, idx: usize) -> bool {
        self.edges.contains_key(&(idx, idx))
    }

    /// Number of distinct modules depending on `module`, a self-loop excluded.
    pub fn fan_in_of(&self, module: &Module) -> Option<usize> {
        let idx = self.index_of(module)?;
        let n = self.edges.keys().filter(|(_, d)| *d == idx).count();
        Some(n - usize::from(self.has_self_loop(idx)))
    }

    /// Number of distinct modules `module` depends on, a self-loop excluded.
    pub fn fan_out_of(&self, module: &Module) -> Option<usize> {
        let idx = self.index_of(module)?;
        let n = self.edges.range((idx, 0)..=(idx, usize::MAX)).count();
        Some(n - usize::from(self.has_self_loop(idx)))
    }
}
