use std::ops::Range;

use crate::block::command::Command;
use crate::block::{Block, BlockBody, MRBAYES_BLOCK};
use crate::parser::error::ParseError;
use crate::parser::lexer::{self, Token, TokenKind};
use crate::parser::mrbayes;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse NEXUS source text into its blocks.
///
/// On success returns the blocks together with any warnings. On failure
/// returns every error found; warnings are dropped.
pub fn parse_blocks(
    source: &str,
    file_id: usize,
) -> Result<(Vec<Block>, Vec<ParseError>), Vec<ParseError>> {
    let tokens = lexer::tokenize(source, file_id).map_err(|err| vec![err])?;

    let mut state = ParseState::new(source, file_id, tokens);
    state.parse_header();
    if state.diagnostics.is_empty() {
        state.parse_top_level();
    }
    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'a> {
    source: &'a str,
    file_id: usize,
    tokens: Vec<Token>,
    pos: usize,
    blocks: Vec<Block>,
    /// Errors and warnings, in the order they were found.
    diagnostics: Vec<ParseError>,
}

struct BlockBuilder {
    name: String,
    commands: Vec<Command>,
    span_start: usize,
}

impl BlockBuilder {
    fn into_block(self, span_end: usize, file_id: usize, diagnostics: &mut Vec<ParseError>) -> Block {
        let body = if self.name.eq_ignore_ascii_case(MRBAYES_BLOCK) {
            BlockBody::MrBayes(mrbayes::interpret(self.commands, file_id, diagnostics))
        } else {
            BlockBody::Opaque(self.commands)
        };
        Block {
            name: self.name,
            body,
            span: self.span_start..span_end,
        }
    }
}

/// How a command inside a block ended.
enum CommandEnd {
    /// Terminated by `;` at the given byte offset.
    Semicolon(usize),
    /// Input ran out before a `;`.
    EndOfInput,
    /// An `END;` or `ENDBLOCK;` cut the command short and closes the block.
    /// `keyword` spans the END word, `semicolon` is where its `;` is.
    BlockEnd { keyword: Range<usize>, semicolon: usize },
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str, file_id: usize, tokens: Vec<Token>) -> Self {
        ParseState {
            source,
            file_id,
            tokens,
            pos: 0,
            blocks: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eof_span(&self) -> Range<usize> {
        self.source.len()..self.source.len()
    }

    fn error(&mut self, message: impl Into<String>, span: Range<usize>) {
        self.diagnostics
            .push(ParseError::error(message, span, self.file_id));
    }

    fn parse_header(&mut self) {
        match self.advance() {
            Some(token) if token.is_keyword("#NEXUS") => {}
            Some(token) => {
                let err = ParseError::error(
                    format!("missing #NEXUS header, found {}", token.describe()),
                    token.span,
                    self.file_id,
                )
                .with_note("a NEXUS file must start with #NEXUS");
                self.diagnostics.push(err);
            }
            None => {
                let span = self.eof_span();
                self.error("empty input: missing #NEXUS header", span);
            }
        }
    }

    /// Top level is a sequence of `BEGIN <name>;` ... `END;` blocks.
    /// A structural error here stops parsing: later tokens cannot be placed.
    fn parse_top_level(&mut self) {
        while let Some(token) = self.advance() {
            if !token.is_keyword("begin") {
                self.error(
                    format!("expected BEGIN, found {} outside of a block", token.describe()),
                    token.span,
                );
                return;
            }
            if !self.parse_block(token.span.start) {
                return;
            }
        }
    }

    /// Parse one block after its `BEGIN` keyword. Returns false when the rest
    /// of the input cannot be parsed.
    fn parse_block(&mut self, span_start: usize) -> bool {
        let name = match self.advance() {
            Some(Token {
                kind: TokenKind::Word(name) | TokenKind::Quoted(name),
                ..
            }) => name,
            Some(token) => {
                self.error(
                    format!("expected a block name after BEGIN, found {}", token.describe()),
                    token.span,
                );
                return false;
            }
            None => {
                self.error("unterminated block: input ends after BEGIN", span_start..self.source.len());
                return false;
            }
        };

        match self.advance() {
            Some(Token {
                kind: TokenKind::Semicolon,
                ..
            }) => {}
            Some(token) => {
                self.error(
                    format!("expected ';' after BEGIN {}, found {}", name, token.describe()),
                    token.span,
                );
                return false;
            }
            None => {
                self.error(
                    format!("unterminated block '{}': missing ';' after BEGIN {}", name, name),
                    span_start..self.source.len(),
                );
                return false;
            }
        }

        // END is only reserved mid-command in blocks whose commands are not interpreted
        let stop_at_end = !name.eq_ignore_ascii_case(MRBAYES_BLOCK);
        let mut builder = BlockBuilder {
            name,
            commands: Vec::new(),
            span_start,
        };

        loop {
            // empty commands (`;;`) are allowed
            while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
                self.pos += 1;
            }

            let Some(head) = self.advance() else {
                let err = ParseError::error(
                    format!("unterminated block '{}': input ends before END;", builder.name),
                    span_start..self.source.len(),
                    self.file_id,
                )
                .with_note("every BEGIN needs a matching END;");
                self.diagnostics.push(err);
                return false;
            };

            let (args, end) = self.collect_command_args(stop_at_end);

            if head.is_keyword("end") || head.is_keyword("endblock") {
                match end {
                    CommandEnd::Semicolon(end) if args.is_empty() => {
                        let block = builder.into_block(end + 1, self.file_id, &mut self.diagnostics);
                        self.blocks.push(block);
                        return true;
                    }
                    CommandEnd::Semicolon(_) => {
                        self.error(
                            format!("unexpected {} after END", args[0].describe()),
                            args[0].span.clone(),
                        );
                        return false;
                    }
                    CommandEnd::BlockEnd { keyword, .. } => {
                        self.error(
                            format!("unexpected END after END in block '{}'", builder.name),
                            keyword,
                        );
                        return false;
                    }
                    CommandEnd::EndOfInput => {
                        self.error(
                            format!("unterminated block '{}': missing ';' after END", builder.name),
                            head.span,
                        );
                        return false;
                    }
                }
            }

            if head.is_keyword("begin") {
                let err = ParseError::error(
                    format!("BEGIN inside block '{}'", builder.name),
                    head.span,
                    self.file_id,
                )
                .with_note(format!("block '{}' is missing its END;", builder.name));
                self.diagnostics.push(err);
                return false;
            }

            let name = match &head.kind {
                TokenKind::Word(name) => name.clone(),
                _ => {
                    self.error(
                        format!("expected a command name, found {}", head.describe()),
                        head.span.clone(),
                    );
                    // recover at the next command
                    match end {
                        CommandEnd::Semicolon(_) => continue,
                        CommandEnd::BlockEnd { .. } | CommandEnd::EndOfInput => return false,
                    }
                }
            };

            let span_end = match end {
                CommandEnd::Semicolon(end) => end + 1,
                CommandEnd::BlockEnd { semicolon, .. } => {
                    let span_end = args.last().map_or(head.span.end, |t| t.span.end);
                    builder.commands.push(Command {
                        name,
                        args,
                        span: head.span.start..span_end,
                    });
                    let block = builder.into_block(semicolon + 1, self.file_id, &mut self.diagnostics);
                    self.blocks.push(block);
                    return true;
                }
                CommandEnd::EndOfInput => {
                    let err = ParseError::error(
                        format!("unterminated command '{}' in block '{}'", name, builder.name),
                        head.span.start..self.source.len(),
                        self.file_id,
                    )
                    .with_note("commands end with ';'");
                    self.diagnostics.push(err);
                    return false;
                }
            };

            builder.commands.push(Command {
                name,
                args,
                span: head.span.start..span_end,
            });
        }
    }

    /// Collect tokens up to and including the next `;`.
    ///
    /// With `stop_at_end`, an unquoted `END` or `ENDBLOCK` followed by `;`
    /// ends the command and the block, e.g. `BEGIN taxa; ... END;`.
    fn collect_command_args(&mut self, stop_at_end: bool) -> (Vec<Token>, CommandEnd) {
        let mut args = Vec::new();
        while let Some(token) = self.advance() {
            if token.kind == TokenKind::Semicolon {
                return (args, CommandEnd::Semicolon(token.span.start));
            }
            if stop_at_end && (token.is_keyword("end") || token.is_keyword("endblock")) {
                if let Some(semicolon) = self.peek().filter(|t| t.kind == TokenKind::Semicolon) {
                    let semicolon = semicolon.span.start;
                    self.pos += 1;
                    return (
                        args,
                        CommandEnd::BlockEnd {
                            keyword: token.span,
                            semicolon,
                        },
                    );
                }
            }
            args.push(token);
        }
        (args, CommandEnd::EndOfInput)
    }

    fn finalize(self) -> Result<(Vec<Block>, Vec<ParseError>), Vec<ParseError>> {
        let (errors, warnings): (Vec<ParseError>, Vec<ParseError>) =
            self.diagnostics.into_iter().partition(ParseError::is_error);
        if errors.is_empty() {
            Ok((self.blocks, warnings))
        } else {
            Err(errors)
        }
    }
}
