// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::CompileError;
use crate::Rc;

use core::{cmp, fmt, hash};

use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Name of the catch-all module that absorbs every element not matched by a
/// declared module.
pub const OTHER_MODULE_NAME: &str = "(other)";

/// A glob over fully-qualified element names.
///
/// `*` matches any run of characters (dots included), `?` matches exactly one
/// character and everything else is literal. Matching is anchored at both ends.
#[derive(Clone)]
pub struct GlobPattern {
    source: Rc<str>,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(glob: &str) -> Option<Self> {
        if glob.is_empty() || glob.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }

        let mut re = String::with_capacity(glob.len() * 2 + 2);
        re.push('^');
        let mut buf = [0u8; 4];
        for ch in glob.chars() {
            match ch {
                '*' => re.push_str(".*"),
                '?' => re.push('.'),
                _ => re.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
            }
        }
        re.push('$');

        let regex = Regex::new(&re).ok()?;
        Some(Self {
            source: glob.into(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, element: &str) -> bool {
        self.regex.is_match(element)
    }
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.source, f)
    }
}

/// A named set of code elements.
///
/// Two modules are the same module when both the name and the pattern
/// literals agree; the compiled regexes take no part in comparisons.
#[derive(Clone)]
pub struct Module {
    name: Rc<str>,
    patterns: Rc<[GlobPattern]>,
}

impl Module {
    pub fn new<S: AsRef<str>>(name: &str, patterns: &[S]) -> Result<Self, CompileError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            match GlobPattern::new(pattern) {
                Some(p) => compiled.push(p),
                None => {
                    return Err(CompileError::InvalidModulePattern {
                        name: name.to_string(),
                        pattern: pattern.to_string(),
                    })
                }
            }
        }
        Ok(Self {
            name: name.into(),
            patterns: compiled.into(),
        })
    }

    /// The catch-all module. It has no patterns so it never matches directly;
    /// elements are routed to it when no declared module matches them.
    pub fn other() -> Self {
        Self {
            name: OTHER_MODULE_NAME.into(),
            patterns: Vec::<GlobPattern>::new().into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[GlobPattern] {
        &self.patterns
    }

    /// True if any of the patterns matches `element`.
    pub fn matches(&self, element: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(element))
    }

    fn key(&self) -> (&str, impl Iterator<Item = &str> + '_) {
        (&self.name, self.patterns.iter().map(GlobPattern::as_str))
    }
}

impl cmp::PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        let (name, patterns) = self.key();
        let (other_name, other_patterns) = other.key();
        name == other_name && patterns.eq(other_patterns)
    }
}

impl cmp::Eq for Module {}

impl cmp::Ord for Module {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let (name, patterns) = self.key();
        let (other_name, other_patterns) = other.key();
        name.cmp(other_name).then_with(|| patterns.cmp(other_patterns))
    }
}

impl cmp::PartialOrd for Module {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl hash::Hash for Module {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for p in self.patterns.iter() {
            p.as_str().hash(state);
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("patterns", &self.patterns)
            .finish()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Module {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let patterns: Vec<&str> = self.patterns.iter().map(GlobPattern::as_str).collect();
        let mut s = serializer.serialize_struct("Module", 2)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("patterns", &patterns)?;
        s.end()
    }
}
