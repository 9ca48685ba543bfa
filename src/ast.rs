// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::lexer::*;

/// `Name = "pattern", "pattern", ...`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct ModuleDef {
    pub span: Span,
    pub name: Span,
    // Spans exclude the surrounding quotes.
    pub patterns: Vec<Span>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum RuleNode {
    /// `A -> B -> C`
    Chain { span: Span, modules: Vec<Span> },

    /// `A -/-> B`
    NoDependency {
        span: Span,
        source: Span,
        dest: Span,
    },
}

impl RuleNode {
    pub fn span(&self) -> &Span {
        match self {
            Self::Chain { span, .. } | Self::NoDependency { span, .. } => span,
        }
    }

    /// Ordered `(source, dest)` pairs named by the rule. A chain of n modules
    /// yields its n - 1 adjacent pairs.
    pub fn pairs(&self) -> Vec<(&Span, &Span)> {
        match self {
            Self::Chain { modules, .. } => modules.windows(2).map(|w| (&w[0], &w[1])).collect(),
            Self::NoDependency { source, dest, .. } => vec![(source, dest)],
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Specification {
    pub modules: Vec<ModuleDef>,
    pub rules: Vec<RuleNode>,
}
