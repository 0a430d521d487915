use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use crate::parser::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unquoted run of characters. Compared case-insensitively when used as a keyword.
    Word(String),
    /// `'...'` or `"..."` with the quotes removed and `''` unescaped.
    Quoted(String),
    Equals,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    /// The text of a word or quoted token.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(text) | TokenKind::Quoted(text) => Some(text),
            TokenKind::Equals | TokenKind::Semicolon => None,
        }
    }

    /// True for an unquoted word equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(text) if text.eq_ignore_ascii_case(keyword))
    }

    /// How the token appeared in the source, for messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Word(text) => format!("'{}'", text),
            TokenKind::Quoted(text) => format!("quoted '{}'", text),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
        }
    }
}

/// Split NEXUS source into tokens, dropping whitespace and `[...]` comments.
pub fn tokenize(source: &str, file_id: usize) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source,
        file_id,
        chars: source.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    file_id: usize,
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let Some(&(start, c)) = self.chars.peek() else {
                return Ok(None);
            };
            match c {
                // a leading byte-order mark counts as whitespace
                c if c.is_whitespace() || c == '\u{feff}' => {
                    self.chars.next();
                }
                '[' => self.skip_comment(start)?,
                ']' => {
                    return Err(ParseError::error(
                        "unmatched ']' outside of a comment",
                        start..start + 1,
                        self.file_id,
                    ));
                }
                ';' => {
                    self.chars.next();
                    return Ok(Some(Token {
                        kind: TokenKind::Semicolon,
                        span: start..start + 1,
                    }));
                }
                '=' => {
                    self.chars.next();
                    return Ok(Some(Token {
                        kind: TokenKind::Equals,
                        span: start..start + 1,
                    }));
                }
                '\'' | '"' => return self.quoted(start, c).map(Some),
                _ => return Ok(Some(self.word(start))),
            }
        }
    }

    /// Comments nest: `[a [b] c]` is a single comment.
    fn skip_comment(&mut self, start: usize) -> Result<(), ParseError> {
        let mut depth = 0usize;
        for (_, c) in self.chars.by_ref() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(
            ParseError::error("unterminated comment", start..self.source.len(), self.file_id)
                .with_note("comments are closed with ']'"),
        )
    }

    fn quoted(&mut self, start: usize, quote: char) -> Result<Token, ParseError> {
        self.chars.next();
        let mut text = String::new();
        while let Some((pos, c)) = self.chars.next() {
            if c != quote {
                text.push(c);
                continue;
            }
            // '' inside a single-quoted word is a literal quote
            if quote == '\'' && matches!(self.chars.peek(), Some((_, '\''))) {
                self.chars.next();
                text.push('\'');
                continue;
            }
            return Ok(Token {
                kind: TokenKind::Quoted(text),
                span: start..pos + c.len_utf8(),
            });
        }
        Err(ParseError::error(
            format!("unterminated quoted word (missing closing {})", quote),
            start..self.source.len(),
            self.file_id,
        ))
    }

    fn word(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ';' | '=' | '[' | ']' | '\'' | '"') {
                break;
            }
            end = pos + c.len_utf8();
            self.chars.next();
        }
        Token {
            kind: TokenKind::Word(self.source[start..end].to_string()),
            span: start..end,
        }
    }
}
