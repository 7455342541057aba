//! Argument extraction from ICU MessageFormat patterns.
//!
//! This is a syntactic scan only: it walks the pattern, honours ICU
//! apostrophe quoting, and collects every argument name referenced by a
//! simple (`{name}`), formatted (`{n, number}`) or complex
//! (`plural`/`select`/`selectordinal`) placeholder, including those nested
//! inside option bodies. Literal text and `#` are ignored.

use std::collections::BTreeSet;
use thiserror::Error;

/// Why a pattern could not be scanned, and where
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {offset})")]
pub struct IcuError {
    pub offset: usize,
    pub kind: IcuErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IcuErrorKind {
    #[error("unclosed argument")]
    UnclosedArgument,
    #[error("unmatched '}}'")]
    UnmatchedClosingBrace,
    #[error("empty argument")]
    EmptyArgument,
    #[error("invalid argument name '{0}'")]
    InvalidArgumentName(String),
    #[error("expected ',' or '}}'")]
    ExpectedCommaOrClosingBrace,
    #[error("expected ','")]
    ExpectedComma,
    #[error("missing argument type")]
    MissingArgumentType,
    #[error("invalid plural offset")]
    InvalidOffset,
    #[error("expected option selector")]
    ExpectedSelector,
    #[error("duplicate option selector '{0}'")]
    DuplicateSelector(String),
    #[error("expected '{{' after option selector")]
    ExpectedOptionBody,
    #[error("{0} argument has no options")]
    MissingOptions(String),
    #[error("{0} argument is missing the 'other' option")]
    MissingOther(String),
    #[error("options nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Deepest plural/select option nesting that is scanned
pub const MAX_NESTING: usize = 64;

/// Names of all arguments referenced by `pattern`
pub fn extract_arguments(pattern: &str) -> Result<BTreeSet<String>, IcuError> {
    let mut parser = Parser::new(pattern);
    parser.parse_message(false, false)?;
    Ok(parser.arguments)
}

/// Numeric (`0`, `12`) or identifier-like names
fn is_valid_argument_name(name: &str) -> bool {
    if name.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    arguments: BTreeSet<String>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            arguments: BTreeSet::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            self.bump();
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn error(&self, kind: IcuErrorKind) -> IcuError {
        IcuError {
            offset: self.pos,
            kind,
        }
    }

    /// Error for an argument opened at `start` that runs off the end
    fn unclosed(start: usize) -> IcuError {
        IcuError {
            offset: start,
            kind: IcuErrorKind::UnclosedArgument,
        }
    }

    /// Scan message text up to (not including) a closing brace, or to the
    /// end of input. A closing brace is only legal when `nested`.
    fn parse_message(&mut self, in_plural: bool, nested: bool) -> Result<(), IcuError> {
        loop {
            match self.peek() {
                None => return Ok(()),
                Some('{') => self.parse_argument(in_plural)?,
                Some('}') if nested => return Ok(()),
                Some('}') => return Err(self.error(IcuErrorKind::UnmatchedClosingBrace)),
                Some('\'') => self.skip_apostrophe(in_plural),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn skip_apostrophe(&mut self, in_plural: bool) {
        self.bump();
        match self.peek() {
            // '' is a literal apostrophe
            Some('\'') => {
                self.bump();
            }
            Some('{') | Some('}') => self.skip_quoted(),
            Some('#') if in_plural => self.skip_quoted(),
            // A lone apostrophe is literal
            _ => {}
        }
    }

    /// Skip quoted literal text up to the closing apostrophe. An
    /// unterminated quote runs to the end of the pattern.
    fn skip_quoted(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\'' {
                if self.peek() == Some('\'') {
                    self.bump();
                } else {
                    return;
                }
            }
        }
    }

    fn parse_argument(&mut self, in_plural: bool) -> Result<(), IcuError> {
        let start = self.pos;
        self.bump();
        self.skip_whitespace();

        let name_start = self.pos;
        let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'));
        if name.is_empty() {
            return Err(match self.peek() {
                None => Self::unclosed(start),
                Some(_) => self.error(IcuErrorKind::EmptyArgument),
            });
        }
        if !is_valid_argument_name(name) {
            return Err(IcuError {
                offset: name_start,
                kind: IcuErrorKind::InvalidArgumentName(name.to_string()),
            });
        }

        self.skip_whitespace();
        match self.peek() {
            Some('}') => {
                self.bump();
            }
            Some(',') => {
                self.bump();
                self.parse_formatted_argument(start, in_plural)?;
            }
            None => return Err(Self::unclosed(start)),
            Some(_) => return Err(self.error(IcuErrorKind::ExpectedCommaOrClosingBrace)),
        }

        self.arguments.insert(name.to_string());
        Ok(())
    }

    /// Everything after `{name,` up to and including the closing brace
    fn parse_formatted_argument(&mut self, start: usize, in_plural: bool) -> Result<(), IcuError> {
        self.skip_whitespace();
        let kind = self.take_while(|c| c.is_alphanumeric() || c == '_');
        if kind.is_empty() {
            return Err(match self.peek() {
                None => Self::unclosed(start),
                Some(_) => self.error(IcuErrorKind::MissingArgumentType),
            });
        }
        self.skip_whitespace();

        match kind {
            "plural" | "selectordinal" | "select" => {
                match self.peek() {
                    Some(',') => {
                        self.bump();
                    }
                    None => return Err(Self::unclosed(start)),
                    Some(_) => return Err(self.error(IcuErrorKind::ExpectedComma)),
                }
                let in_plural = in_plural || kind != "select";
                self.parse_options(kind, start, in_plural)?;
            }
            _ => match self.peek() {
                Some('}') => {}
                Some(',') => {
                    self.bump();
                    self.skip_style(start)?;
                }
                None => return Err(Self::unclosed(start)),
                Some(_) => return Err(self.error(IcuErrorKind::ExpectedCommaOrClosingBrace)),
            },
        }

        match self.peek() {
            Some('}') => {
                self.bump();
                Ok(())
            }
            None => Err(Self::unclosed(start)),
            Some(_) => Err(self.error(IcuErrorKind::ExpectedCommaOrClosingBrace)),
        }
    }

    /// Skip an argument style (`short`, `::currency/EUR`, `#,##0.00`) up to
    /// the argument's closing brace
    fn skip_style(&mut self, start: usize) -> Result<(), IcuError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return Err(Self::unclosed(start)),
                Some('\'') => self.skip_apostrophe(false),
                Some('{') => {
                    depth += 1;
                    self.bump();
                }
                Some('}') if depth == 0 => return Ok(()),
                Some('}') => {
                    depth -= 1;
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn parse_options(&mut self, kind: &str, start: usize, in_plural: bool) -> Result<(), IcuError> {
        let src = self.src;
        let mut selectors: Vec<&str> = Vec::new();

        self.skip_whitespace();
        if kind != "select" && src[self.pos..].starts_with("offset:") {
            self.pos += "offset:".len();
            self.skip_whitespace();
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                return Err(self.error(IcuErrorKind::InvalidOffset));
            }
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(Self::unclosed(start)),
                Some('}') => break,
                Some(_) => {}
            }

            let selector_start = self.pos;
            let selector = if self.peek() == Some('=') {
                self.bump();
                if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                    return Err(self.error(IcuErrorKind::ExpectedSelector));
                }
                &src[selector_start..self.pos]
            } else {
                self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '-')
            };
            if selector.is_empty() {
                return Err(self.error(IcuErrorKind::ExpectedSelector));
            }
            if selectors.contains(&selector) {
                return Err(IcuError {
                    offset: selector_start,
                    kind: IcuErrorKind::DuplicateSelector(selector.to_string()),
                });
            }
            selectors.push(selector);

            self.skip_whitespace();
            match self.peek() {
                Some('{') => {}
                None => return Err(Self::unclosed(start)),
                Some(_) => return Err(self.error(IcuErrorKind::ExpectedOptionBody)),
            }
            if self.depth == MAX_NESTING {
                return Err(self.error(IcuErrorKind::TooDeep(MAX_NESTING)));
            }
            let body_start = self.pos;
            self.bump();
            self.depth += 1;
            self.parse_message(in_plural, true)?;
            self.depth -= 1;
            if self.bump() != Some('}') {
                return Err(Self::unclosed(body_start));
            }
        }

        if selectors.is_empty() {
            return Err(self.error(IcuErrorKind::MissingOptions(kind.to_string())));
        }
        if !selectors.contains(&"other") {
            return Err(self.error(IcuErrorKind::MissingOther(kind.to_string())));
        }
        Ok(())
    }
}
