// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::definition::Definition;
use crate::error::{CompileError, SpecError, Spanned};
use crate::lexer::Source;
use crate::module::Module;
use crate::parser::Parser;

use log::debug;

/// Lowers a parsed [`Specification`] into a [`Definition`].
///
/// Compilation stops at the first error; no partial definition is returned.
pub struct Compiler<'a> {
    spec: &'a Specification,
}

impl<'a> Compiler<'a> {
    pub fn new(spec: &'a Specification) -> Self {
        Self { spec }
    }

    fn compile_module(def: &ModuleDef) -> Result<Module, Spanned<CompileError>> {
        let patterns: Vec<&str> = def.patterns.iter().map(|p| p.text()).collect();
        Module::new(def.name.text(), &patterns).map_err(|err| {
            // Point at the offending pattern.
            let span = match &err {
                CompileError::InvalidModulePattern { pattern, .. } => def
                    .patterns
                    .iter()
                    .find(|p| p.text() == pattern)
                    .unwrap_or(&def.name),
                _ => &def.name,
            };
            err.at(span)
        })
    }

    pub fn compile(&self) -> Result<Definition, Spanned<CompileError>> {
        let mut definition = Definition::new();

        for def in &self.spec.modules {
            let module = Self::compile_module(def)?;
            definition
                .add_module(module)
                .map_err(|err| err.at(&def.name))?;
        }

        for rule in &self.spec.rules {
            let text = rule.span().text();
            for (source, dest) in rule.pairs() {
                let added = match rule {
                    RuleNode::Chain { .. } => {
                        definition.add_dependency(source.text(), dest.text(), text)
                    }
                    RuleNode::NoDependency { .. } => {
                        definition.add_no_strict_dependency(source.text(), dest.text(), text)
                    }
                };
                if let Err(err) = added {
                    let span = match &err {
                        CompileError::UndefinedModuleReference { name, .. }
                            if name == dest.text() && name != source.text() =>
                        {
                            dest
                        }
                        _ => source,
                    };
                    return Err(err.at(span));
                }
            }
        }

        debug!(
            "compiled {} modules, {} dependency rules, {} no-dependency rules",
            definition.modules().len(),
            definition.dependencies().len(),
            definition.no_strict_dependencies().len()
        );
        Ok(definition)
    }
}

/// Lexes, parses and compiles a specification in one step.
pub fn compile_specification(source: &Source) -> Result<Definition, SpecError> {
    let mut parser = Parser::new(source)?;
    let spec = parser.parse()?;
    Ok(Compiler::new(&spec).compile()?)
}
