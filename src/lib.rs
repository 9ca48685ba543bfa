// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod analyser;
mod ast;
mod builder;
mod checker;
mod closure;
mod compiler;
mod definition;
mod error;
mod graph;
mod lexer;
mod module;
mod parser;
mod result;
mod scanner;

#[cfg(feature = "arc")]
use std::sync::Arc as Rc;
#[cfg(not(feature = "arc"))]
use std::rc::Rc;

pub use analyser::ModuleAnalyser;
pub use builder::{DependencyGraphBuilder, Diagnostic};
pub use checker::{AnalysisMode, AnalysisResult, Checker, Report};
pub use closure::{Distance, TransitiveClosure};
pub use compiler::{compile_specification, Compiler};
pub use definition::{Definition, Dependency, NoStrictDependency};
pub use error::{AnalyserError, CompileError, LexError, ParseError, SpecError, Spanned};
pub use graph::{ModuleDependency, ModuleGraph};
pub use lexer::{Source, Span};
pub use module::{GlobPattern, Module, OTHER_MODULE_NAME};
pub use result::{
    AbsentDependencyViolation, DependencyViolation, LooseAnalysisResult, ModuleMetrics,
    NoStrictDependencyViolation, StrictAnalysisResult, UndesiredDependencyViolation,
};
pub use scanner::{AccessKind, AccessListener, AccessLog, AccessRecord, ClasspathRoot, CodeScanner};

/// Items in `unstable` are likely to change.
pub mod unstable {
    pub use crate::ast::*;
    pub use crate::lexer::*;
    pub use crate::parser::*;
}
