// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::CompileError;
use crate::module::Module;

use core::fmt;

use serde::Serialize;

/// `source` may depend on `dest` (strict analysis) or is expected to reach
/// `dest` transitively (loose analysis).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependency {
    pub source: Module,
    pub dest: Module,
}

/// `source` must not depend directly on `dest` (strict analysis) or must not
/// reach it at all (loose analysis).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NoStrictDependency {
    pub source: Module,
    pub dest: Module,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

impl fmt::Display for NoStrictDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -/-> {}", self.source, self.dest)
    }
}

/// Validated modules and rules of one specification.
///
/// Modules keep declaration order and have unique names. Every module named by
/// a rule is one of `modules`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Definition {
    modules: Vec<Module>,
    dependencies: Vec<Dependency>,
    no_strict_dependencies: Vec<NoStrictDependency>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn no_strict_dependencies(&self) -> &[NoStrictDependency] {
        &self.no_strict_dependencies
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn add_module(&mut self, module: Module) -> Result<(), CompileError> {
        if self.module(module.name()).is_some() {
            return Err(CompileError::DuplicateModuleName {
                name: module.name().to_string(),
            });
        }
        self.modules.push(module);
        Ok(())
    }

    fn resolve(&self, name: &str, rule: &str) -> Result<Module, CompileError> {
        self.module(name)
            .cloned()
            .ok_or_else(|| CompileError::UndefinedModuleReference {
                name: name.to_string(),
                rule: rule.to_string(),
            })
    }

    /// Adds `source -> dest`. `rule` is the rule text reported if either name
    /// is not a module of this definition.
    pub(crate) fn add_dependency(
        &mut self,
        source: &str,
        dest: &str,
        rule: &str,
    ) -> Result<(), CompileError> {
        let dependency = Dependency {
            source: self.resolve(source, rule)?,
            dest: self.resolve(dest, rule)?,
        };
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        Ok(())
    }

    pub(crate) fn add_no_strict_dependency(
        &mut self,
        source: &str,
        dest: &str,
        rule: &str,
    ) -> Result<(), CompileError> {
        let rule = NoStrictDependency {
            source: self.resolve(source, rule)?,
            dest: self.resolve(dest, rule)?,
        };
        if !self.no_strict_dependencies.contains(&rule) {
            self.no_strict_dependencies.push(rule);
        }
        Ok(())
    }

    /// Declares that module `source` may depend on module `dest`.
    pub fn allow(&mut self, source: &str, dest: &str) -> Result<(), CompileError> {
        self.add_dependency(source, dest, &format!("{source} -> {dest}"))
    }

    /// Declares that module `source` must not depend on module `dest`.
    pub fn forbid(&mut self, source: &str, dest: &str) -> Result<(), CompileError> {
        self.add_no_strict_dependency(source, dest, &format!("{source} -/-> {dest}"))
    }
}
