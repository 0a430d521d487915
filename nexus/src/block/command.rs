use std::fmt;
use std::ops::Range;

use crate::parser::lexer::{Token, TokenKind};

/// A semicolon-terminated command inside a block, e.g. `lset nst=6 rates=invgamma;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The leading keyword as written.
    pub name: String,
    /// Tokens after the keyword, up to but excluding the `;`.
    pub args: Vec<Token>,
    /// Byte span from the keyword through the terminating `;`.
    pub span: Range<usize>,
}

impl Command {
    pub fn is(&self, keyword: &str) -> bool {
        self.name.eq_ignore_ascii_case(keyword)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let mut glue = false;
        for token in &self.args {
            match &token.kind {
                TokenKind::Equals => {
                    write!(f, "=")?;
                    glue = true;
                    continue;
                }
                TokenKind::Word(text) if glue => write!(f, "{}", text)?,
                TokenKind::Word(text) => write!(f, " {}", text)?,
                TokenKind::Quoted(text) => {
                    let quoted = format!("'{}'", text.replace('\'', "''"));
                    if glue {
                        write!(f, "{}", quoted)?;
                    } else {
                        write!(f, " {}", quoted)?;
                    }
                }
                TokenKind::Semicolon => {}
            }
            glue = false;
        }
        write!(f, ";")
    }
}
