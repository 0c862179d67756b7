//! Command parser implementation.

use super::ast::Command;
use super::error::{ParseError, ParseResult};

/// Parser for the command language.
pub struct Parser;

impl Parser {
    /// Parse one input line into a command.
    pub fn parse(line: &str) -> ParseResult<Command> {
        let (keyword, rest) = split_word(line);
        if keyword.is_empty() {
            return Err(ParseError::Empty);
        }

        match keyword {
            "CREATE" => {
                let (file, rest) = Self::file_arg("CREATE", rest)?;
                Self::no_more_args("CREATE", 1, rest)?;
                Ok(Command::Create { file })
            }
            "READ" => {
                let (file, rest) = Self::file_arg("READ", rest)?;
                Self::no_more_args("READ", 1, rest)?;
                Ok(Command::Read { file })
            }
            "HISTORY" => {
                let (file, rest) = Self::file_arg("HISTORY", rest)?;
                Self::no_more_args("HISTORY", 1, rest)?;
                Ok(Command::History { file })
            }
            "INSERT" => {
                let (file, rest) = Self::file_arg("INSERT", rest)?;
                Ok(Command::Insert {
                    file,
                    content: payload(rest).to_string(),
                })
            }
            "UPDATE" => {
                let (file, rest) = Self::file_arg("UPDATE", rest)?;
                Ok(Command::Update {
                    file,
                    content: payload(rest).to_string(),
                })
            }
            "SNAPSHOT" => {
                let (file, rest) = Self::file_arg("SNAPSHOT", rest)?;
                Ok(Command::Snapshot {
                    file,
                    message: payload(rest).to_string(),
                })
            }
            "ROLLBACK" => {
                let (file, rest) = Self::file_arg("ROLLBACK", rest)?;
                let version = Self::optional_integer("ROLLBACK", 2, rest)?;
                Ok(Command::Rollback { file, version })
            }
            "RECENT_FILES" => {
                let k = Self::optional_integer("RECENT_FILES", 1, rest)?;
                Ok(Command::RecentFiles { k })
            }
            "BIGGEST_TREES" => {
                let k = Self::optional_integer("BIGGEST_TREES", 1, rest)?;
                Ok(Command::BiggestTrees { k })
            }
            "HELP" => {
                Self::no_more_args("HELP", 0, rest)?;
                Ok(Command::Help)
            }
            "EXIT" => {
                Self::no_more_args("EXIT", 0, rest)?;
                Ok(Command::Exit)
            }
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }

    fn file_arg<'a>(command: &'static str, rest: &'a str) -> ParseResult<(String, &'a str)> {
        let (file, rest) = split_word(rest);
        if file.is_empty() {
            return Err(ParseError::MissingArgument {
                command,
                what: "a file name",
            });
        }
        Ok((file.to_string(), rest))
    }

    fn no_more_args(command: &'static str, max: usize, rest: &str) -> ParseResult<()> {
        if rest.trim_matches(is_separator).is_empty() {
            Ok(())
        } else {
            Err(ParseError::TooManyArguments { command, max })
        }
    }

    /// At most one more argument, which must be a non-negative integer.
    fn optional_integer(
        command: &'static str,
        max: usize,
        rest: &str,
    ) -> ParseResult<Option<usize>> {
        let mut args = rest.split(is_separator).filter(|arg| !arg.is_empty());
        let Some(value) = args.next() else {
            return Ok(None);
        };
        if args.next().is_some() {
            return Err(ParseError::TooManyArguments { command, max });
        }
        parse_integer(command, value).map(Some)
    }
}

/// Word separators: space, tab and newline only.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// Split off the first separator-delimited word. The remainder starts at
/// the separator that ended the word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches(is_separator);
    match s.find(is_separator) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Everything after the single separator that follows the file name.
fn payload(rest: &str) -> &str {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if is_separator(c) => chars.as_str(),
        _ => rest,
    }
}

fn parse_integer(command: &'static str, value: &str) -> ParseResult<usize> {
    let invalid = || ParseError::InvalidInteger {
        command,
        value: value.to_string(),
    };
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}
