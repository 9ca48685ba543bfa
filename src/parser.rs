// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::error::{ParseError, SpecError};
use crate::lexer::*;

use log::debug;

const MODULES_KEYWORD: &str = "modules";
const RULES_KEYWORD: &str = "rules";

const CHAIN_OP: &str = "->";
const NO_DEPENDENCY_OP: &str = "-/->";

type Result<T> = core::result::Result<T, SpecError>;

#[derive(Clone)]
pub struct Parser<'source> {
    source: Source,
    lexer: Lexer<'source>,
    tok: Token,
    end: u32,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source Source) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let tok = Self::next_significant(&mut lexer)?;
        Ok(Self {
            source: source.clone(),
            lexer,
            tok,
            end: 0,
        })
    }

    fn next_significant(lexer: &mut Lexer<'source>) -> Result<Token> {
        loop {
            let tok = lexer.next_token()?;
            if tok.0 != TokenKind::Spacing {
                return Ok(tok);
            }
        }
    }

    pub fn token_text(&self) -> &str {
        match self.tok.0 {
            TokenKind::Glob | TokenKind::Symbol | TokenKind::String => self.tok.1.text(),
            TokenKind::Newline => "end of line",
            TokenKind::Spacing | TokenKind::Eof => "",
        }
    }

    pub fn next_token(&mut self) -> Result<()> {
        self.end = match self.tok.0 {
            // Include the closing quote.
            TokenKind::String => self.tok.1.end + 1,
            _ => self.tok.1.end,
        };
        self.tok = Self::next_significant(&mut self.lexer)?;
        Ok(())
    }

    fn unexpected(&self, expected: &str, context: &'static str) -> SpecError {
        let err = match self.tok.0 {
            TokenKind::Eof => ParseError::UnexpectedEof { context },
            _ => ParseError::Expected {
                expected: expected.to_string(),
                found: self.token_text().to_string(),
                context,
            },
        };
        err.at(&self.tok.1).into()
    }

    fn is_symbol(&self, text: &str) -> bool {
        self.tok.0 == TokenKind::Symbol && self.tok.1.text() == text
    }

    fn is_keyword(&self, kw: &str) -> bool {
        self.tok.0 == TokenKind::Glob && self.tok.1.text() == kw
    }

    fn expect(&mut self, text: &str, context: &'static str) -> Result<()> {
        if self.is_symbol(text) {
            self.next_token()
        } else {
            Err(self.unexpected(&format!("`{text}`"), context))
        }
    }

    fn expect_keyword(&mut self, kw: &str, context: &'static str) -> Result<()> {
        if self.is_keyword(kw) {
            self.next_token()
        } else {
            Err(self.unexpected(&format!("`{kw}`"), context))
        }
    }

    // One or more line breaks.
    fn expect_newlines(&mut self, context: &'static str) -> Result<()> {
        if self.tok.0 != TokenKind::Newline {
            return Err(self.unexpected("end of line", context));
        }
        while self.tok.0 == TokenKind::Newline {
            self.next_token()?;
        }
        Ok(())
    }

    fn skip_newlines(&mut self) -> Result<()> {
        while self.tok.0 == TokenKind::Newline {
            self.next_token()?;
        }
        Ok(())
    }

    fn is_ident(text: &str) -> bool {
        let mut chars = text.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn parse_ident(&mut self, context: &'static str) -> Result<Span> {
        let span = self.tok.1.clone();
        match self.tok.0 {
            TokenKind::Glob if matches!(span.text(), MODULES_KEYWORD | RULES_KEYWORD) => {
                Err(ParseError::UnexpectedKeyword {
                    text: span.text().to_string(),
                }
                .at(&span)
                .into())
            }
            TokenKind::Glob if Self::is_ident(span.text()) => {
                self.next_token()?;
                Ok(span)
            }
            TokenKind::Glob => Err(ParseError::InvalidIdentifier {
                text: span.text().to_string(),
            }
            .at(&span)
            .into()),
            _ => Err(self.unexpected("identifier", context)),
        }
    }

    fn parse_string(&mut self, context: &'static str) -> Result<Span> {
        match self.tok.0 {
            TokenKind::String => {
                let span = self.tok.1.clone();
                self.next_token()?;
                Ok(span)
            }
            _ => Err(self.unexpected("string literal", context)),
        }
    }

    pub fn parse_module_def(&mut self) -> Result<ModuleDef> {
        let mut span = self.tok.1.clone();
        let name = self.parse_ident("while parsing module definition")?;
        self.expect("=", "after module name")?;

        let mut patterns = vec![self.parse_string("while parsing module patterns")?];
        while self.is_symbol(",") {
            self.next_token()?;
            patterns.push(self.parse_string("while parsing module patterns")?);
        }

        span.end = self.end;
        self.expect_newlines("after module definition")?;
        Ok(ModuleDef {
            span,
            name,
            patterns,
        })
    }

    pub fn parse_rule(&mut self) -> Result<RuleNode> {
        let mut span = self.tok.1.clone();
        let first = self.parse_ident("while parsing rule")?;

        let rule = if self.is_symbol(CHAIN_OP) {
            let mut modules = vec![first];
            while self.is_symbol(CHAIN_OP) {
                self.next_token()?;
                modules.push(self.parse_ident("after `->`")?);
            }
            if self.is_symbol(NO_DEPENDENCY_OP) {
                return Err(ParseError::MixedRule.at(&self.tok.1).into());
            }
            span.end = self.end;
            RuleNode::Chain { span, modules }
        } else if self.is_symbol(NO_DEPENDENCY_OP) {
            self.next_token()?;
            let dest = self.parse_ident("after `-/->`")?;
            if self.is_symbol(CHAIN_OP) || self.is_symbol(NO_DEPENDENCY_OP) {
                return Err(ParseError::MixedRule.at(&self.tok.1).into());
            }
            span.end = self.end;
            RuleNode::NoDependency {
                span,
                source: first,
                dest,
            }
        } else {
            return Err(self.unexpected("`->` or `-/->`", "after module name in rule"));
        };

        self.expect_newlines("after rule")?;
        Ok(rule)
    }

    pub fn parse(&mut self) -> Result<Specification> {
        self.skip_newlines()?;
        self.expect_keyword(MODULES_KEYWORD, "at start of specification")?;
        self.expect(":", "after `modules`")?;
        self.expect_newlines("after `modules:`")?;

        let mut modules = vec![];
        while !self.is_keyword(RULES_KEYWORD) {
            if self.tok.0 == TokenKind::Eof {
                return Err(self.unexpected("`rules`", "after module definitions"));
            }
            modules.push(self.parse_module_def()?);
        }

        self.next_token()?;
        self.expect(":", "after `rules`")?;
        self.expect_newlines("after `rules:`")?;

        let mut rules = vec![];
        while self.tok.0 != TokenKind::Eof {
            rules.push(self.parse_rule()?);
        }

        debug!(
            "parsed {}: {} module definitions, {} rules",
            self.source.file(),
            modules.len(),
            rules.len()
        );
        Ok(Specification { modules, rules })
    }
}
