// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::closure::{Distance, TransitiveClosure};
use crate::definition::Definition;
use crate::error::AnalyserError;
use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::result::*;

use log::{debug, info};

/// Compares the actual dependency graph of a codebase against a
/// [`Definition`].
pub struct ModuleAnalyser<'a> {
    definition: &'a Definition,
    actual: &'a ModuleGraph,
    other: &'a Module,
}

impl<'a> ModuleAnalyser<'a> {
    /// `actual` is expected to contain every module of `definition` plus
    /// `other`; missing vertices behave as modules without dependencies.
    pub fn new(definition: &'a Definition, actual: &'a ModuleGraph, other: &'a Module) -> Self {
        Self {
            definition,
            actual,
            other,
        }
    }

    fn vertices(&self) -> Result<Vec<Module>, AnalyserError> {
        let modules = self.definition.modules();
        if modules.is_empty() {
            return Err(AnalyserError::NoModulesProvided);
        }
        let mut vertices = modules.to_vec();
        vertices.push(self.other.clone());
        Ok(vertices)
    }

    fn specification_graph(&self, vertices: &[Module]) -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        for m in vertices {
            graph.add_module(m);
        }
        for d in self.definition.dependencies() {
            graph.add_dependency(&d.source, &d.dest);
        }
        graph
    }

    /// Requires actual reachability between declared modules to match the
    /// specified reachability, and forbids direct edges named by
    /// no-dependency rules.
    pub fn analyse_strict(&self) -> Result<StrictAnalysisResult, AnalyserError> {
        let vertices = self.vertices()?;
        let specified = TransitiveClosure::new(&self.specification_graph(&vertices), &vertices);
        let actual = TransitiveClosure::new(self.actual, &vertices);

        let mut result = StrictAnalysisResult::default();
        for a in self.definition.modules() {
            for b in self.definition.modules() {
                if let Some(v) = Self::compare_route(&specified, &actual, a, b) {
                    result.dependency_violations.push(v);
                }
            }
        }

        for rule in self.definition.no_strict_dependencies() {
            if &rule.source == self.other || &rule.dest == self.other {
                continue;
            }
            if actual.minimum_distance(&rule.source, &rule.dest) == Some(Distance::Finite(1)) {
                result
                    .no_strict_dependency_violations
                    .push(NoStrictDependencyViolation {
                        source: rule.source.clone(),
                        dest: rule.dest.clone(),
                    });
            }
        }

        result.metrics = self.metrics();
        info!(
            "strict analysis: {} dependency violations, {} direct dependency violations",
            result.dependency_violations.len(),
            result.no_strict_dependency_violations.len()
        );
        Ok(result)
    }

    // Routes differ when only one side reaches `b`, when the shortest
    // distances differ, or when the specified route is not walkable in code.
    fn compare_route(
        specified: &TransitiveClosure,
        actual: &TransitiveClosure,
        a: &Module,
        b: &Module,
    ) -> Option<DependencyViolation> {
        let expected = specified.minimum_distance(a, b)?;
        let found = actual.minimum_distance(a, b)?;

        let specified_path = specified.minimum_distance_path(a, b)?;
        let differs = match (expected.is_finite(), found.is_finite()) {
            (false, false) => false,
            (true, true) => expected != found || !actual.is_walk(&specified_path),
            _ => true,
        };
        if !differs {
            return None;
        }

        debug!("route {a} -> {b}: specified {expected}, actual {found}");
        Some(DependencyViolation {
            source: a.clone(),
            dest: b.clone(),
            specified_path,
            actual_path: actual.minimum_distance_path(a, b)?,
        })
    }

    /// Requires declared dependencies to exist transitively and forbidden
    /// ones to be absent transitively.
    pub fn analyse_loose(&self) -> Result<LooseAnalysisResult, AnalyserError> {
        let vertices = self.vertices()?;
        let actual = TransitiveClosure::new(self.actual, &vertices);

        let mut result = LooseAnalysisResult::default();
        for rule in self.definition.dependencies() {
            if !actual.is_reachable(&rule.source, &rule.dest) {
                result
                    .absent_dependency_violations
                    .push(AbsentDependencyViolation {
                        source: rule.source.clone(),
                        dest: rule.dest.clone(),
                    });
            }
        }

        for rule in self.definition.no_strict_dependencies() {
            if actual.is_reachable(&rule.source, &rule.dest) {
                let path = actual
                    .minimum_distance_path(&rule.source, &rule.dest)
                    .unwrap_or_default();
                result
                    .undesired_dependency_violations
                    .push(UndesiredDependencyViolation {
                        source: rule.source.clone(),
                        dest: rule.dest.clone(),
                        path,
                    });
            }
        }

        result.metrics = self.metrics();
        info!(
            "loose analysis: {} absent dependencies, {} undesired dependencies",
            result.absent_dependency_violations.len(),
            result.undesired_dependency_violations.len()
        );
        Ok(result)
    }

    /// Fan-in and fan-out of every declared module, in declaration order,
    /// counting only edges between declared modules.
    pub fn metrics(&self) -> Vec<ModuleMetrics> {
        let graph = self.actual;
        self.definition
            .modules()
            .iter()
            .filter(|m| *m != self.other)
            .map(|m| {
                let from_other = graph.find_dependency(self.other, m).is_some();
                let to_other = graph.find_dependency(m, self.other).is_some();
                ModuleMetrics {
                    module: m.clone(),
                    fan_in: graph.fan_in_of(m).unwrap_or(0) - usize::from(from_other),
                    fan_out: graph.fan_out_of(m).unwrap_or(0) - usize::from(to_other),
                }
            })
            .collect()
    }
}
