// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used)]

use crate::*;

fn definition() -> Definition {
    let mut d = Definition::new();
    d.add_module(Module::new("Web", &["web.*"]).unwrap()).unwrap();
    d.add_module(Module::new("Core", &["core.*"]).unwrap()).unwrap();
    d
}

#[test]
fn undefined_reference_names_the_rule() {
    let mut d = definition();
    let err = d.add_dependency("Web", "Db", "Web -> Core -> Db").unwrap_err();
    assert_eq!(
        err,
        CompileError::UndefinedModuleReference {
            name: "Db".to_string(),
            rule: "Web -> Core -> Db".to_string(),
        }
    );
    assert!(d.dependencies().is_empty());
}

#[test]
fn repeated_rules_are_kept_once() {
    let mut d = definition();
    d.add_dependency("Web", "Core", "Web -> Core").unwrap();
    d.add_dependency("Web", "Core", "Web -> Core").unwrap();
    d.add_no_strict_dependency("Core", "Web", "Core -/-> Web").unwrap();
    d.add_no_strict_dependency("Core", "Web", "Core -/-> Web").unwrap();

    assert_eq!(d.dependencies().len(), 1);
    assert_eq!(d.no_strict_dependencies().len(), 1);
    assert_eq!(d.dependencies()[0].to_string(), "Web -> Core");
    assert_eq!(d.no_strict_dependencies()[0].to_string(), "Core -/-> Web");
}

#[test]
fn duplicate_module_is_rejected() {
    let mut d = definition();
    let err = d
        .add_module(Module::new("Web", &["other.*"]).unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::DuplicateModuleName {
            name: "Web".to_string()
        }
    );
    assert_eq!(d.modules().len(), 2);
}
