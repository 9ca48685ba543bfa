// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::analyser::ModuleAnalyser;
use crate::builder::{DependencyGraphBuilder, Diagnostic};
use crate::compiler::compile_specification;
use crate::definition::Definition;
use crate::lexer::Source;
use crate::module::Module;
use crate::result::{LooseAnalysisResult, StrictAnalysisResult};
use crate::scanner::CodeScanner;

use std::convert::AsRef;
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Strict,
    Loose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisResult {
    Strict(StrictAnalysisResult),
    Loose(LooseAnalysisResult),
}

impl AnalysisResult {
    pub fn is_conformant(&self) -> bool {
        match self {
            Self::Strict(r) => r.is_conformant(),
            Self::Loose(r) => r.is_conformant(),
        }
    }

    /// One line per violation.
    pub fn violations(&self) -> Vec<String> {
        match self {
            Self::Strict(r) => r.violations(),
            Self::Loose(r) => r.violations(),
        }
    }
}

/// Outcome of one [`Checker::check`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub result: AnalysisResult,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    fail_on_diagnostics: bool,
}

impl Report {
    /// False if there are violations, or diagnostics when the checker was
    /// configured to fail on them.
    pub fn is_conformant(&self) -> bool {
        self.result.is_conformant() && !(self.fail_on_diagnostics && !self.diagnostics.is_empty())
    }

    /// Turns a non-conformant report into an error listing every finding.
    pub fn ensure_conformant(&self) -> Result<()> {
        if self.is_conformant() {
            return Ok(());
        }
        let mut lines = self.result.violations();
        if self.fail_on_diagnostics {
            lines.extend(self.diagnostics.iter().map(|d| d.to_string()));
        }
        bail!(
            "architecture does not conform to specification:\n  {}",
            lines.join("\n  ")
        )
    }

    /// The strict result, if the report came from a strict check.
    pub fn strict(&self) -> Result<&StrictAnalysisResult> {
        match &self.result {
            AnalysisResult::Strict(r) => Ok(r),
            AnalysisResult::Loose(_) => bail!("report is from a loose check"),
        }
    }

    /// The loose result, if the report came from a loose check.
    pub fn loose(&self) -> Result<&LooseAnalysisResult> {
        match &self.result {
            AnalysisResult::Loose(r) => Ok(r),
            AnalysisResult::Strict(_) => bail!("report is from a strict check"),
        }
    }
}

/// Compiles a specification and checks scanned code against it.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    definition: Option<Definition>,
    mode: AnalysisMode,
    fail_on_diagnostics: bool,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles specification text, replacing any previous definition.
    ///
    /// * `path`: name used in error messages.
    /// * `text`: specification source.
    pub fn add_specification(&mut self, path: String, text: String) -> Result<()> {
        let source = Source::from_contents(path, text)?;
        self.compile(&source)
    }

    pub fn add_specification_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let source = Source::from_file(path)?;
        self.compile(&source)
    }

    fn compile(&mut self, source: &Source) -> Result<()> {
        // Spans hold an `Rc` unless the `arc` feature is enabled.
        let definition = compile_specification(source).map_err(|e| anyhow!("{e}"))?;
        self.definition = Some(definition);
        Ok(())
    }

    pub fn set_definition(&mut self, definition: Definition) {
        self.definition = Some(definition);
    }

    pub fn definition(&self) -> Option<&Definition> {
        self.definition.as_ref()
    }

    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Treat builder diagnostics as failures in [`Report::ensure_conformant`].
    pub fn set_fail_on_diagnostics(&mut self, b: bool) {
        self.fail_on_diagnostics = b;
    }

    /// Scans code, builds its module graph and analyses it in the configured
    /// mode.
    pub fn check(&self, scanner: &dyn CodeScanner) -> Result<Report> {
        let Some(definition) = &self.definition else {
            bail!("no specification added");
        };

        let other = Module::other();
        let mut builder = DependencyGraphBuilder::new(definition.modules(), other.clone());
        scanner.scan(&mut builder)?;
        let (graph, diagnostics) = builder.finish();

        let analyser = ModuleAnalyser::new(definition, &graph, &other);
        let result = match self.mode {
            AnalysisMode::Strict => AnalysisResult::Strict(analyser.analyse_strict()?),
            AnalysisMode::Loose => AnalysisResult::Loose(analyser.analyse_loose()?),
        };

        info!(
            "{:?} check: {} violations, {} diagnostics",
            self.mode,
            result.violations().len(),
            diagnostics.len()
        );
        Ok(Report {
            result,
            diagnostics,
            fail_on_diagnostics: self.fail_on_diagnostics,
        })
    }
}
