// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::{bail, Result};
use archspec::*;
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Case {
    note: String,
    spec: String,
    #[serde(default)]
    modules: Vec<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    no_dependencies: Vec<String>,
    error: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct YamlTest {
    cases: Vec<Case>,
}

fn compile(text: &str) -> Result<core::result::Result<Definition, SpecError>> {
    let source = Source::from_contents("case.arch".to_string(), text.to_string())?;
    Ok(compile_specification(&source))
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {file}");

    let yaml = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml)?;

    for case in &test.cases {
        print!("case {} ", case.note);

        match (compile(&case.spec)?, &case.error) {
            (Ok(definition), None) => {
                let modules: Vec<&str> = definition.modules().iter().map(|m| m.name()).collect();
                assert_eq!(modules, case.modules, "modules mismatch in case {}", case.note);

                let deps: Vec<String> = definition
                    .dependencies()
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                assert_eq!(deps, case.dependencies, "dependencies mismatch in case {}", case.note);

                let no_deps: Vec<String> = definition
                    .no_strict_dependencies()
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                assert_eq!(
                    no_deps, case.no_dependencies,
                    "no-dependencies mismatch in case {}",
                    case.note
                );
            }
            (Ok(definition), Some(_)) => bail!("expected error, compiled {definition:?}"),
            (Err(actual), Some(expected)) => {
                let actual = actual.to_string();
                if !actual.contains(expected.as_str()) {
                    bail!("Error message\n`{actual}\n`\ndoes not contain `{expected}`");
                }
            }
            (Err(actual), None) => bail!("{actual}"),
        }

        println!("passed");
    }

    println!("{} cases passed.", test.cases.len());
    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test_resources("tests/compiler/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn undefined_reference_never_yields_definition() -> Result<()> {
    let text = "modules:\nA = \"a.*\"\nB = \"b.*\"\nrules:\nA -> B -> Missing\n";
    match compile(text)? {
        Ok(d) => bail!("unexpectedly compiled {d:?}"),
        Err(SpecError::Compile(e)) => {
            assert_eq!(
                e.error,
                CompileError::UndefinedModuleReference {
                    name: "Missing".to_string(),
                    rule: "A -> B -> Missing".to_string(),
                }
            );
            let span = e.span.as_ref().map(|s| (s.line, s.col, s.text().to_string()));
            assert_eq!(span, Some((5, 11, "Missing".to_string())));
        }
        Err(e) => bail!("unexpected error {e}"),
    }
    Ok(())
}

#[test]
fn invalid_pattern_points_at_pattern() -> Result<()> {
    let text = "modules:\nA = \"a.*\", \"\"\nrules:\n";
    match compile(text)? {
        Err(SpecError::Compile(e)) => {
            assert_eq!(
                e.error,
                CompileError::InvalidModulePattern {
                    name: "A".to_string(),
                    pattern: String::new(),
                }
            );
            assert_eq!(e.span.as_ref().map(|s| (s.line, s.col)), Some((2, 13)));
        }
        other => bail!("unexpected result {other:?}"),
    }
    Ok(())
}

#[test]
fn programmatic_definition_matches_compiled() -> Result<()> {
    let compiled = match compile(
        "modules:\nWeb = \"web.*\"\nCore = \"core.*\"\nrules:\nWeb -> Core\nCore -/-> Web\n",
    )? {
        Ok(d) => d,
        Err(e) => bail!("{e}"),
    };

    let mut built = Definition::new();
    built.add_module(Module::new("Web", &["web.*"])?)?;
    built.add_module(Module::new("Core", &["core.*"])?)?;
    built.allow("Web", "Core")?;
    built.forbid("Core", "Web")?;

    assert_eq!(built.modules(), compiled.modules());
    assert_eq!(built.dependencies(), compiled.dependencies());
    assert_eq!(built.no_strict_dependencies(), compiled.no_strict_dependencies());

    assert!(built.allow("Web", "Db").is_err());
    Ok(())
}
