// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::module::Module;

use core::fmt;

use serde::Serialize;

fn format_path(f: &mut fmt::Formatter<'_>, path: &[Module]) -> fmt::Result {
    if path.is_empty() {
        return f.write_str("(none)");
    }
    for (idx, m) in path.iter().enumerate() {
        if idx > 0 {
            f.write_str(" -> ")?;
        }
        write!(f, "{m}")?;
    }
    Ok(())
}

/// Reachability between two modules differs between specification and code.
/// Either path is empty when the corresponding graph has no route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyViolation {
    pub source: Module,
    pub dest: Module,
    pub specified_path: Vec<Module>,
    pub actual_path: Vec<Module>,
}

impl fmt::Display for DependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}: specified ", self.source, self.dest)?;
        format_path(f, &self.specified_path)?;
        f.write_str(", actual ")?;
        format_path(f, &self.actual_path)
    }
}

/// A forbidden direct dependency is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoStrictDependencyViolation {
    pub source: Module,
    pub dest: Module,
}

impl fmt::Display for NoStrictDependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} depends directly on {}", self.source, self.dest)
    }
}

/// An expected dependency does not exist, not even transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsentDependencyViolation {
    pub source: Module,
    pub dest: Module,
}

impl fmt::Display for AbsentDependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} does not depend on {}", self.source, self.dest)
    }
}

/// A forbidden dependency exists; `path` witnesses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndesiredDependencyViolation {
    pub source: Module,
    pub dest: Module,
    pub path: Vec<Module>,
}

impl fmt::Display for UndesiredDependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} depends on {} via ", self.source, self.dest)?;
        format_path(f, &self.path)
    }
}

/// Coupling of one declared module with the other declared modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMetrics {
    pub module: Module,
    pub fan_in: usize,
    pub fan_out: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrictAnalysisResult {
    pub dependency_violations: Vec<DependencyViolation>,
    pub no_strict_dependency_violations: Vec<NoStrictDependencyViolation>,
    pub metrics: Vec<ModuleMetrics>,
}

impl StrictAnalysisResult {
    pub fn is_conformant(&self) -> bool {
        self.dependency_violations.is_empty() && self.no_strict_dependency_violations.is_empty()
    }

    pub fn violations(&self) -> Vec<String> {
        let deps = self.dependency_violations.iter().map(|v| v.to_string());
        let direct = self
            .no_strict_dependency_violations
            .iter()
            .map(|v| v.to_string());
        deps.chain(direct).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LooseAnalysisResult {
    pub absent_dependency_violations: Vec<AbsentDependencyViolation>,
    pub undesired_dependency_violations: Vec<UndesiredDependencyViolation>,
    pub metrics: Vec<ModuleMetrics>,
}

impl LooseAnalysisResult {
    pub fn is_conformant(&self) -> bool {
        self.absent_dependency_violations.is_empty()
            && self.undesired_dependency_violations.is_empty()
    }

    pub fn violations(&self) -> Vec<String> {
        let absent = self
            .absent_dependency_violations
            .iter()
            .map(|v| v.to_string());
        let undesired = self
            .undesired_dependency_violations
            .iter()
            .map(|v| v.to_string());
        absent.chain(undesired).collect()
    }
}
