// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// How one code element refers to another. Module analysis does not
/// distinguish between kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Invoke,
    FieldAccess,
    TypeReference,
    Inheritance,
    Annotation,
    #[default]
    Other,
}

/// Receives the events produced while scanning compiled code.
pub trait AccessListener {
    /// An element was found in a classpath root.
    fn new_node(&mut self, element: &str);

    /// `source` refers to `dest`.
    fn apply(&mut self, source: &str, dest: &str, kind: AccessKind);
}

/// A source of access events, such as a bytecode scanner over a set of
/// classpath roots.
pub trait CodeScanner {
    fn scan(&self, listener: &mut dyn AccessListener) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub source: String,
    pub dest: String,
    #[serde(default)]
    pub kind: AccessKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClasspathRoot {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub accesses: Vec<AccessRecord>,
}

/// Access events recorded ahead of time, replayed in order.
///
/// ```yaml
/// roots:
///   - name: app.jar
///     elements: [com.acme.web.Controller, com.acme.core.Service]
///     accesses:
///       - { source: com.acme.web.Controller, dest: com.acme.core.Service, kind: invoke }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessLog {
    #[serde(default)]
    pub roots: Vec<ClasspathRoot>,
}

impl AccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a `.json` log, or a `.yaml`/`.yml` log when the `yaml` feature is
    /// enabled.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let log = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml") => Self::from_yaml_str(&contents),
            _ => bail!("Unsupported access log `{}`.", path.display()),
        };
        log.with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Appends a root and returns it for population.
    pub fn add_root(&mut self, name: &str) -> &mut ClasspathRoot {
        self.roots.push(ClasspathRoot {
            name: name.to_string(),
            ..Default::default()
        });
        let last = self.roots.len() - 1;
        &mut self.roots[last]
    }
}

impl ClasspathRoot {
    pub fn element(&mut self, name: &str) -> &mut Self {
        self.elements.push(name.to_string());
        self
    }

    pub fn access(&mut self, source: &str, dest: &str, kind: AccessKind) -> &mut Self {
        self.accesses.push(AccessRecord {
            source: source.to_string(),
            dest: dest.to_string(),
            kind,
        });
        self
    }
}

impl CodeScanner for AccessLog {
    fn scan(&self, listener: &mut dyn AccessListener) -> Result<()> {
        for root in &self.roots {
            for element in &root.elements {
                listener.new_node(element);
            }
            for access in &root.accesses {
                listener.apply(&access.source, &access.dest, access.kind);
            }
        }
        Ok(())
    }
}
