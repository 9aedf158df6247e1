//! Winnow-based parser for the line-oriented command protocol.
//!
//! Grammar:
//! ```text
//! script  = (line NEWLINE)* line?
//! line    = BLANK* (word (BLANK+ word)*)? BLANK*
//! word    = (any char except BLANK)+
//! BLANK   = any Unicode whitespace except "\n"
//! ```
//!
//! The first word of a line is the keyword; the rest are its arguments.
//! Arity and keyword checks are delegated to [`Command::from_words`].

use nestkv_core::{Command, Error};
use winnow::combinator::{eof, separated};
use winnow::prelude::*;
use winnow::token::take_while;
use winnow::ModalResult;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// A parse error with human-readable location information.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Every parse failure is an invalid command as far as the session is
/// concerned; the store is never touched.
impl From<ParseError> for Error {
    fn from(_: ParseError) -> Self {
        Self::InvalidCommand
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parse a single line into a command.
///
/// Returns `Ok(None)` for a blank or whitespace-only line.
///
/// # Errors
///
/// Returns a [`ParseError`] on line 1 when the keyword is unknown or the
/// argument count is wrong.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let mut stream: &str = line;
    let words = line_parser.parse_next(&mut stream).map_err(|e| ParseError {
        message: e.to_string(),
        line: 1,
        column: line.len() - stream.len() + 1,
    })?;

    let Some((keyword, args)) = words.split_first() else {
        return Ok(None);
    };

    Command::from_words(keyword, args).map(Some).map_err(|_| {
        let column = line.len() - line.trim_start_matches(is_blank).len() + 1;
        tracing::warn!(keyword, args = args.len(), "rejected command");
        ParseError {
            message: describe_invalid(keyword, args.len()),
            line: 1,
            column,
        }
    })
}

/// Parse a whole script, one command per line, skipping blank lines.
///
/// # Errors
///
/// Returns the first [`ParseError`], with `line` set to its 1-based line
/// number in `input`.
pub fn parse_script(input: &str) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        match parse_command(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(e) => {
                return Err(ParseError {
                    line: idx + 1,
                    ..e
                })
            }
        }
    }
    Ok(commands)
}

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

fn describe_invalid(keyword: &str, got: usize) -> String {
    match Command::arity(keyword) {
        Some(expected) => format!("`{keyword}` expects {expected} argument(s), got {got}"),
        None => format!("unknown command `{keyword}`"),
    }
}

// ---------------------------------------------------------------------------
// Whitespace helpers
// ---------------------------------------------------------------------------

/// Inline whitespace: any Unicode whitespace except the line feed.
fn is_blank(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

fn blanks(input: &mut &str) -> ModalResult<()> {
    take_while(1.., is_blank).void().parse_next(input)
}

fn opt_blanks(input: &mut &str) -> ModalResult<()> {
    take_while(0.., is_blank).void().parse_next(input)
}

// ---------------------------------------------------------------------------
// Line parsers
// ---------------------------------------------------------------------------

/// One or more non-whitespace characters.
fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| !c.is_whitespace()).parse_next(input)
}

/// A whole line: optional blanks, words separated by blanks, optional
/// blanks, end of input.
fn line_parser<'a>(input: &mut &'a str) -> ModalResult<Vec<&'a str>> {
    opt_blanks.parse_next(input)?;
    let words: Vec<&'a str> = separated(0.., word, blanks).parse_next(input)?;
    opt_blanks.parse_next(input)?;
    eof.parse_next(input)?;
    Ok(words)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, value: &str) -> Command {
        Command::Set {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Happy-path tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("SET a 10"), Ok(Some(set("a", "10"))));
        assert_eq!(
            parse_command("GET a"),
            Ok(Some(Command::Get {
                name: "a".to_string()
            }))
        );
        assert_eq!(
            parse_command("UNSET a"),
            Ok(Some(Command::Unset {
                name: "a".to_string()
            }))
        );
        assert_eq!(
            parse_command("NUMEQUALTO 10"),
            Ok(Some(Command::NumEqualTo {
                value: "10".to_string()
            }))
        );
        assert_eq!(parse_command("BEGIN"), Ok(Some(Command::Begin)));
        assert_eq!(parse_command("ROLLBACK"), Ok(Some(Command::Rollback)));
        assert_eq!(parse_command("COMMIT"), Ok(Some(Command::Commit)));
        assert_eq!(parse_command("END"), Ok(Some(Command::End)));
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(parse_command("SET  a  10"), Ok(Some(set("a", "10"))));
        assert_eq!(parse_command("\t SET a\t10 \r"), Ok(Some(set("a", "10"))));
        assert_eq!(parse_command("END   "), Ok(Some(Command::End)));
    }

    #[test]
    fn test_unicode_whitespace_separates_words() {
        assert_eq!(parse_command("SET\x0ba\x0b1"), Ok(Some(set("a", "1"))));
        assert_eq!(parse_command("SET\x0ca\x0c1\x0c"), Ok(Some(set("a", "1"))));
        assert_eq!(
            parse_command("SET\u{a0}a\u{85}1"),
            Ok(Some(set("a", "1")))
        );
        assert_eq!(parse_command("\x0b\x0c"), Ok(None));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("  \t "), Ok(None));
    }

    #[test]
    fn test_script() {
        let input = "SET a 10\n\nBEGIN\n  GET a\nEND\n";
        let commands = parse_script(input).expect("should parse");
        assert_eq!(
            commands,
            vec![
                set("a", "10"),
                Command::Begin,
                Command::Get {
                    name: "a".to_string()
                },
                Command::End,
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Error tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_wrong_arity() {
        let err = parse_command("SET a").expect_err("should fail");
        assert_eq!(err.message, "`SET` expects 2 argument(s), got 1");
        assert_eq!(err.column, 1);

        assert!(parse_command("GET a 10").is_err());
        assert!(parse_command("UNSET a 10").is_err());
        assert!(parse_command("NUMEQUALTO a 10").is_err());
        assert!(parse_command("BEGIN now").is_err());
        assert!(parse_command("END x").is_err());
    }

    #[test]
    fn test_unknown_keyword() {
        let err = parse_command("  FLUSH").expect_err("should fail");
        assert_eq!(err.message, "unknown command `FLUSH`");
        assert_eq!(err.column, 3);

        assert!(parse_command("set a 10").is_err());
        assert!(parse_command("SETX a 10").is_err());
    }

    #[test]
    fn test_script_error_has_line() {
        let input = "SET a 10\nBEGIN\nGET\n";
        let err = parse_script(input).expect_err("should fail");
        assert_eq!(err.line, 3);
        let msg = err.to_string();
        assert!(msg.contains("parse error at line 3"), "{msg}");
    }

    #[test]
    fn test_into_core_error() {
        let err = parse_command("NOPE").expect_err("should fail");
        assert_eq!(Error::from(err), Error::InvalidCommand);
    }
}
