// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::lexer::Span;

use core::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unrecognised character `{ch}`")]
    UnrecognisedCharacter { ch: char },

    #[error("unmatched `\"`")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expecting {expected} {context}, found `{found}`")]
    Expected {
        expected: String,
        found: String,
        context: &'static str,
    },

    #[error("unexpected end of specification {context}")]
    UnexpectedEof { context: &'static str },

    #[error("malformed identifier `{text}`")]
    InvalidIdentifier { text: String },

    #[error("unexpected keyword `{text}`")]
    UnexpectedKeyword { text: String },

    #[error("`-/->` cannot be chained with other modules")]
    MixedRule,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("module `{name}` has invalid pattern \"{pattern}\"")]
    InvalidModulePattern { name: String, pattern: String },

    #[error("module `{name}` is already defined")]
    DuplicateModuleName { name: String },

    #[error("undefined module `{name}` referenced in rule `{rule}`")]
    UndefinedModuleReference { name: String, rule: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyserError {
    #[error("no modules provided for analysis")]
    NoModulesProvided,
}

/// An error optionally tied to a location in the specification text.
#[derive(Debug, Clone)]
pub struct Spanned<E> {
    pub error: E,
    pub span: Option<Span>,
}

impl<E> Spanned<E> {
    pub fn new(error: E) -> Self {
        Self { error, span: None }
    }

    pub fn with_span(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }
}

impl<E: fmt::Display> fmt::Display for Spanned<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}", span.message("error", &self.error.to_string())),
            None => write!(f, "{}", self.error),
        }
    }
}

impl<E> core::error::Error for Spanned<E>
where
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<E> From<E> for Spanned<E> {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl LexError {
    pub fn at(self, span: &Span) -> Spanned<LexError> {
        Spanned::new(self).with_span(span)
    }
}

impl ParseError {
    pub fn at(self, span: &Span) -> Spanned<ParseError> {
        Spanned::new(self).with_span(span)
    }
}

impl CompileError {
    pub fn at(self, span: &Span) -> Spanned<CompileError> {
        Spanned::new(self).with_span(span)
    }
}

/// Any failure of the specification front end.
#[derive(thiserror::Error, Debug, Clone)]
pub enum SpecError {
    #[error(transparent)]
    Lex(#[from] Spanned<LexError>),

    #[error(transparent)]
    Parse(#[from] Spanned<ParseError>),

    #[error(transparent)]
    Compile(#[from] Spanned<CompileError>),
}

impl SpecError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            SpecError::Lex(e) => e.span.as_ref(),
            SpecError::Parse(e) => e.span.as_ref(),
            SpecError::Compile(e) => e.span.as_ref(),
        }
    }
}
