// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::{LexError, Spanned};
use crate::Rc;

use core::cmp;
use core::fmt::{self, Debug, Formatter};
use core::iter::Peekable;
use core::str::CharIndices;

use anyhow::{bail, Result};

struct SourceInternal {
    pub file: String,
    pub contents: String,
    pub lines: Vec<(u32, u32)>,
}

/// A specification file held in memory.
#[derive(Clone)]
pub struct Source {
    src: Rc<SourceInternal>,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        Rc::ptr_eq(&self.src, &other.src)
    }
}

impl cmp::Eq for Source {}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        self.src.file.fmt(f)
    }
}

impl Source {
    pub fn from_contents(file: String, contents: String) -> Result<Source> {
        // Rows and columns start at 1 and an EOF token sits past the end.
        let max_size = u32::MAX as usize - 2;
        if contents.len() > max_size {
            bail!("{file} exceeds maximum allowed specification size {max_size}");
        }

        let mut lines = vec![];
        let mut start = 0u32;
        for (i, ch) in contents.char_indices() {
            if ch == '\n' {
                let end = match contents[..i].ends_with('\r') {
                    true => i as u32 - 1,
                    false => i as u32,
                };
                lines.push((start, end));
                start = i as u32 + 1;
            }
        }
        lines.push((start, contents.len() as u32));

        Ok(Self {
            src: Rc::new(SourceInternal {
                file,
                contents,
                lines,
            }),
        })
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Source> {
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => bail!("Failed to read {}. {e}", path.as_ref().display()),
        };
        Self::from_contents(path.as_ref().to_string_lossy().to_string(), contents)
    }

    pub fn file(&self) -> &String {
        &self.src.file
    }

    pub fn contents(&self) -> &String {
        &self.src.contents
    }

    pub fn line(&self, idx: u32) -> &str {
        match self.src.lines.get(idx as usize) {
            Some((start, end)) => &self.src.contents[*start as usize..*end as usize],
            None => "",
        }
    }

    pub fn message(&self, line: u32, col: u32, kind: &str, msg: &str) -> String {
        if line == 0 || line as usize > self.src.lines.len() {
            return format!("{}: invalid line {} specified", self.src.file, line);
        }

        let line_str = format!("{line}");
        let line_num_width = line_str.len() + 1;
        let col_spaces = col.saturating_sub(1) as usize;

        format!(
            "\n--> {}:{}:{}\n{:<line_num_width$}|\n\
             {:<line_num_width$}| {}\n\
             {:<line_num_width$}| {:<col_spaces$}^\n\
             {}: {}",
            self.src.file,
            line,
            col,
            "",
            line,
            self.line(line - 1),
            "",
            "",
            kind,
            msg
        )
    }
}

#[derive(Clone)]
pub struct Span {
    pub source: Source,
    pub line: u32,
    pub col: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn text(&self) -> &str {
        &self.source.contents()[self.start as usize..self.end as usize]
    }

    pub fn message(&self, kind: &str, msg: &str) -> String {
        self.source.message(self.line, self.col, kind, msg)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let t = self.text().escape_debug().to_string();
        let max = 32;
        let (txt, trailer) = if t.chars().count() > max {
            (t.chars().take(max).collect::<String>(), "...")
        } else {
            (t, "")
        };

        f.write_fmt(format_args!(
            "{}:{}:{}:{}, \"{}{}\"",
            self.line, self.col, self.start, self.end, txt, trailer
        ))
    }
}

#[cfg(feature = "ast")]
impl serde::Serialize for Span {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Span", 3)?;
        s.serialize_field("line", &self.line)?;
        s.serialize_field("col", &self.col)?;
        s.serialize_field("text", self.text())?;
        s.end()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// Letters, digits and `.`, `?`, `*`, `_`.
    Glob,
    /// A run of operator characters such as `=`, `:`, `,`, `->`, `-/->`.
    Symbol,
    /// A double quoted literal. The span excludes the quotes.
    String,
    Newline,
    /// Blanks and `#` comments.
    Spacing,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token(pub TokenKind, pub Span);

fn is_glob_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '?' | '*' | '_')
}

fn is_symbol_char(ch: char) -> bool {
    matches!(ch, '=' | '-' | '>' | '<' | '/' | ':' | ',' | '!')
}

fn is_newline_char(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

fn is_spacing_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '#')
}

#[derive(Clone)]
pub struct Lexer<'source> {
    source: Source,
    iter: Peekable<CharIndices<'source>>,
    line: u32,
    col: u32,
    done: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source Source) -> Self {
        Self {
            source: source.clone(),
            iter: source.contents().char_indices().peekable(),
            line: 1,
            col: 1,
            done: false,
        }
    }

    fn peek(&mut self) -> (usize, char) {
        match self.iter.peek() {
            Some((index, chr)) => (*index, *chr),
            _ => (self.source.contents().len(), '\x00'),
        }
    }

    fn span(&self, line: u32, col: u32, start: usize, end: usize) -> Span {
        Span {
            source: self.source.clone(),
            line,
            col,
            start: start as u32,
            end: end as u32,
        }
    }

    // Consume the maximal run of characters satisfying `family`.
    fn read_run(&mut self, kind: TokenKind, family: fn(char) -> bool) -> Token {
        let (start, _) = self.peek();
        let col = self.col;
        while family(self.peek().1) {
            self.iter.next();
            self.col += 1;
        }
        let end = self.peek().0;
        Token(kind, self.span(self.line, col, start, end))
    }

    fn read_spacing(&mut self) -> Token {
        let (start, _) = self.peek();
        let col = self.col;
        loop {
            match self.peek().1 {
                ' ' => self.col += 1,
                // A tab is considered 4 space characters.
                '\t' => self.col += 4,
                '#' => {
                    // Comment runs up to, not including, the end of line.
                    while !matches!(self.peek().1, '\n' | '\r' | '\x00') {
                        self.iter.next();
                        self.col += 1;
                    }
                    continue;
                }
                _ => break,
            }
            self.iter.next();
        }
        let end = self.peek().0;
        Token(TokenKind::Spacing, self.span(self.line, col, start, end))
    }

    fn read_newlines(&mut self) -> Token {
        let (start, _) = self.peek();
        let (line, col) = (self.line, self.col);
        while is_newline_char(self.peek().1) {
            if let Some((_, '\n')) = self.iter.next() {
                self.line += 1;
                self.col = 1;
            }
        }
        let end = self.peek().0;
        Token(TokenKind::Newline, self.span(line, col, start, end))
    }

    fn read_string(&mut self) -> Result<Token, Spanned<LexError>> {
        let (quote, _) = self.peek();
        let col = self.col;
        self.iter.next();
        self.col += 1;
        let (start, _) = self.peek();
        loop {
            match self.peek().1 {
                '"' => break,
                '\n' | '\r' | '\x00' => {
                    let span = self.span(self.line, col, quote, quote + 1);
                    return Err(LexError::UnterminatedString.at(&span));
                }
                _ => {
                    self.iter.next();
                    self.col += 1;
                }
            }
        }
        let end = self.peek().0;
        self.iter.next();
        self.col += 1;
        Ok(Token(TokenKind::String, self.span(self.line, col + 1, start, end)))
    }

    pub fn next_token(&mut self) -> Result<Token, Spanned<LexError>> {
        let (start, chr) = self.peek();
        match chr {
            '\x00' if start >= self.source.contents().len() => {
                Ok(Token(TokenKind::Eof, self.span(self.line, self.col, start, start)))
            }
            '"' => self.read_string(),
            _ if is_glob_char(chr) => Ok(self.read_run(TokenKind::Glob, is_glob_char)),
            _ if is_symbol_char(chr) => Ok(self.read_run(TokenKind::Symbol, is_symbol_char)),
            _ if is_newline_char(chr) => Ok(self.read_newlines()),
            _ if is_spacing_char(chr) => Ok(self.read_spacing()),
            _ => {
                let span = self.span(self.line, self.col, start, start + chr.len_utf8());
                Err(LexError::UnrecognisedCharacter { ch: chr }.at(&span))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Spanned<LexError>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        match &tok {
            Ok(Token(TokenKind::Eof, _)) | Err(_) => self.done = true,
            _ => (),
        }
        Some(tok)
    }
}
