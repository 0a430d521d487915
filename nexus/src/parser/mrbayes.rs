use std::ops::Range;

use crate::block::command::Command;
use crate::block::mrbayes::{self, MrBayesBlock, Switch};
use crate::parser::error::ParseError;
use crate::parser::lexer::{Token, TokenKind};

/// Interpret the commands of a `mrbayes` block.
///
/// Accepted forms:
///   `set autoclose=yes nowarn=yes;`
///   `autoclose=yes;` (shorthand for `set`)
///   `execute file.nex;` and `execute=file.nex;`
///   any other MrBayes command, kept as written.
/// Problems are pushed onto `diagnostics`; later settings override earlier ones.
pub(crate) fn interpret(
    commands: Vec<Command>,
    file_id: usize,
    diagnostics: &mut Vec<ParseError>,
) -> MrBayesBlock {
    let mut block = MrBayesBlock::default();

    for command in &commands {
        let shorthand = matches!(command.args.first(), Some(t) if t.kind == TokenKind::Equals);

        if command.is("execute") {
            block.execute = Some(execute_target(&command.args));
        } else if command.is("set") {
            apply_settings(&mut block, &command.args, file_id, diagnostics);
        } else if shorthand && mrbayes::is_set_option(&command.name) {
            let mut args = Vec::with_capacity(command.args.len() + 1);
            args.push(Token {
                kind: TokenKind::Word(command.name.clone()),
                span: name_span(command),
            });
            args.extend(command.args.iter().cloned());
            apply_settings(&mut block, &args, file_id, diagnostics);
        } else if !mrbayes::is_command(&command.name) {
            let err = ParseError::error(
                format!("unrecognized command '{}' in mrbayes block", command.name),
                name_span(command),
                file_id,
            );
            let err = if shorthand {
                err.with_note(format!("'{}' is not an option of the set command", command.name))
            } else {
                err
            };
            diagnostics.push(err);
        }
    }

    block.commands = commands;
    block
}

fn name_span(command: &Command) -> Range<usize> {
    command.span.start..command.span.start + command.name.len()
}

/// `execute` takes the rest of the command as the file name. Unquoted names
/// containing spaces are rejoined with single spaces.
fn execute_target(args: &[Token]) -> String {
    args.iter()
        .filter_map(Token::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply `key=value` pairs from a `set` command.
fn apply_settings(
    block: &mut MrBayesBlock,
    args: &[Token],
    file_id: usize,
    diagnostics: &mut Vec<ParseError>,
) {
    let mut i = 0;
    while i < args.len() {
        let key = &args[i];
        let Some(name) = key.text().filter(|_| matches!(key.kind, TokenKind::Word(_))) else {
            diagnostics.push(ParseError::error(
                format!("expected a setting name, found {}", key.describe()),
                key.span.clone(),
                file_id,
            ));
            return;
        };

        match args.get(i + 1) {
            Some(Token {
                kind: TokenKind::Equals,
                ..
            }) => {}
            _ => {
                diagnostics.push(
                    ParseError::error(
                        format!("expected '=' after '{}'", name),
                        key.span.clone(),
                        file_id,
                    )
                    .with_note(format!("write it as {}=<value>", name)),
                );
                return;
            }
        }

        let Some(value) = args.get(i + 2).filter(|t| t.text().is_some()) else {
            diagnostics.push(ParseError::error(
                format!("missing value for '{}'", name),
                key.span.start..args[i + 1].span.end,
                file_id,
            ));
            return;
        };
        let text = value.text().unwrap_or_default();

        if name.eq_ignore_ascii_case("autoclose") {
            if let Some(switch) = parse_switch(name, value, file_id, diagnostics) {
                block.autoclose = switch;
            }
        } else if name.eq_ignore_ascii_case("nowarn") {
            if let Some(switch) = parse_switch(name, value, file_id, diagnostics) {
                block.nowarn = switch;
            }
        } else if name.eq_ignore_ascii_case("execute") {
            block.execute = Some(text.to_string());
        } else if !mrbayes::is_set_option(name) {
            diagnostics.push(ParseError::warning(
                format!("unknown set option '{}'", name),
                key.span.clone(),
                file_id,
            ));
        }

        i += 3;
    }
}

fn parse_switch(
    name: &str,
    value: &Token,
    file_id: usize,
    diagnostics: &mut Vec<ParseError>,
) -> Option<Switch> {
    let text = value.text().unwrap_or_default();
    let switch = Switch::parse(text);
    if switch.is_none() {
        diagnostics.push(
            ParseError::error(
                format!("invalid value '{}' for {}", text, name.to_ascii_lowercase()),
                value.span.clone(),
                file_id,
            )
            .with_note("expected yes or no"),
        );
    }
    switch
}
