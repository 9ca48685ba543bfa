// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use archspec::unstable::{Lexer, TokenKind};
use archspec::{AccessLog, AnalysisMode, Checker, Source};

fn arch_lex(file: String, verbose: bool) -> Result<()> {
    let source = Source::from_file(&file)?;

    for token in Lexer::new(&source) {
        let token = token.map_err(|e| anyhow!("{e}"))?;
        if token.0 == TokenKind::Eof {
            break;
        }

        if verbose {
            println!("{}", token.1.message("", ""));
        }

        println!("{token:?}");
    }
    Ok(())
}

fn arch_parse(file: String) -> Result<()> {
    let source = Source::from_file(&file)?;

    let mut parser = archspec::unstable::Parser::new(&source).map_err(|e| anyhow!("{e}"))?;
    let spec = parser.parse().map_err(|e| anyhow!("{e}"))?;
    println!("{spec:#?}");

    Ok(())
}

fn arch_check(spec: String, accesses: String, loose: bool, strict_diagnostics: bool) -> Result<()> {
    let mut checker = Checker::new();
    checker.add_specification_from_file(&spec)?;
    checker.set_fail_on_diagnostics(strict_diagnostics);
    if loose {
        checker.set_mode(AnalysisMode::Loose);
    }

    let log = AccessLog::from_file(&accesses)?;
    let report = checker.check(&log)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    report.ensure_conformant()
}

#[derive(Subcommand)]
enum ArchCommand {
    /// Tokenize a specification.
    Lex {
        file: String,

        #[arg(long, short)]
        verbose: bool,
    },

    /// Parse a specification.
    Parse { file: String },

    /// Check recorded code accesses against a specification.
    Check {
        #[arg(long, short, value_name = "spec.arch")]
        spec: String,

        #[arg(long, short, value_name = "accesses.json|accesses.yaml")]
        accesses: String,

        /// Only require transitive presence or absence of dependencies.
        #[arg(long, short)]
        loose: bool,

        /// Fail on ambiguous or dead module definitions.
        #[arg(long)]
        strict_diagnostics: bool,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: ArchCommand,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        ArchCommand::Lex { file, verbose } => arch_lex(file, verbose),
        ArchCommand::Parse { file } => arch_parse(file),
        ArchCommand::Check {
            spec,
            accesses,
            loose,
            strict_diagnostics,
        } => arch_check(spec, accesses, loose, strict_diagnostics),
    }
}
