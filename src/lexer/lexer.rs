use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Returns `Ok(None)` when the matched text produces no token (whitespace, comments).
pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

lazy_static! {
    // Order matters: two-character operators must be tried before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^#[^\\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]*)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\"[^\"\\n]*\"?").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: bang_handler },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: dot_handler },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") }
    ];
}

pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 0,
            file: file_name,
        }
    }

    /// Position of the next unread character.
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column + 1, Rc::clone(&self.file))
    }

    /// Consumes `n` bytes, keeping the line and column counters in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());

        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }

        self.pos = end;
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn peek(&self) -> Option<char> {
        self.remainder().chars().nth(1)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                let position = self.current_position();
                return Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span { start: position.clone(), end: position }));
            }

            let pattern = PATTERNS.iter().find(|pattern| pattern.regex.is_match(self.remainder()));

            match pattern {
                Some(pattern) => {
                    if let Some(token) = (pattern.handler)(self, &pattern.regex)? {
                        return Ok(token);
                    }
                }
                None => {
                    let token = self.at().map(String::from).unwrap_or_default();
                    return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, self.current_position()));
                }
            }
        }
    }
}

fn matched_text(lexer: &Lexer, regex: &Regex) -> String {
    regex.find(lexer.remainder()).map(|m| m.as_str().to_string()).unwrap_or_default()
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
    Ok(None)
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let matched = matched_text(lexer, regex);
    let start = lexer.current_position();

    let whole = matched.split('.').next().unwrap_or_default();
    if whole.len() > 1 && whole.starts_with('0') {
        return Err(Error::new(ErrorImpl::LeadingZero { token: matched }, start));
    }

    if matched.ends_with('.') {
        return Err(Error::new(ErrorImpl::MissingFractionalDigit { token: matched }, start));
    }

    let kind = if matched.contains('.') { TokenKind::Double } else { TokenKind::Int };

    lexer.advance_n(matched.len());
    Ok(Some(MK_TOKEN!(kind, matched, Span { start, end: lexer.current_position() })))
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let matched = matched_text(lexer, regex);
    let start = lexer.current_position();

    lexer.advance_n(matched.len());

    if matched.len() < 2 || !matched.ends_with('"') {
        return match lexer.at() {
            Some('\n') => Err(Error::new(ErrorImpl::MultilineString, start)),
            _ => Err(Error::new(ErrorImpl::UnterminatedString, start)),
        };
    }

    // The lexeme keeps escape sequences as written; `print` expands them.
    let string_literal = matched[1..matched.len() - 1].to_string();

    Ok(Some(MK_TOKEN!(TokenKind::String, string_literal, Span { start, end: lexer.current_position() })))
}

fn char_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<Option<Token>, Error> {
    let start = lexer.current_position();
    lexer.advance_n(1);

    let Some(value) = lexer.at() else {
        return Err(Error::new(ErrorImpl::InvalidCharLiteral { found: String::from("EOF") }, lexer.current_position()));
    };
    lexer.advance_n(value.len_utf8());

    match lexer.at() {
        Some('\'') => lexer.advance_n(1),
        other => {
            let found = other.map(String::from).unwrap_or_else(|| String::from("EOF"));
            return Err(Error::new(ErrorImpl::InvalidCharLiteral { found }, lexer.current_position()));
        }
    }

    Ok(Some(MK_TOKEN!(TokenKind::Char, value.to_string(), Span { start, end: lexer.current_position() })))
}

fn bang_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<Option<Token>, Error> {
    let start = lexer.current_position();

    if lexer.peek() == Some('!') {
        return Err(Error::new(ErrorImpl::DoubleNegation, start));
    }

    lexer.advance_n(1);
    Ok(Some(MK_TOKEN!(TokenKind::Not, String::from("!"), Span { start, end: lexer.current_position() })))
}

fn dot_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<Option<Token>, Error> {
    let start = lexer.current_position();

    if lexer.peek().is_some_and(|ch| ch.is_ascii_digit()) {
        return Err(Error::new(ErrorImpl::MissingLeadingDigit, start));
    }

    lexer.advance_n(1);
    Ok(Some(MK_TOKEN!(TokenKind::Dot, String::from("."), Span { start, end: lexer.current_position() })))
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let value = matched_text(lexer, regex);
    let start = lexer.current_position();

    if value.starts_with('_') {
        return Err(Error::new(ErrorImpl::InvalidIdentifier { token: value }, start));
    }

    let kind = RESERVED_LOOKUP.get(value.as_str()).copied().unwrap_or(TokenKind::Identifier);
    lexer.advance_n(value.len());

    if kind == TokenKind::Identifier && lexer.at() == Some('"') {
        return Err(Error::new(ErrorImpl::MissingOpeningQuote { token: value }, start));
    }

    Ok(Some(MK_TOKEN!(kind, value, Span { start, end: lexer.current_position() })))
}

/// Lexes the whole source, including the trailing `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return Ok(tokens);
        }
    }
}
