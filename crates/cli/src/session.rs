//! The read loop: one line in, at most one line out.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

use derive_more::From;
use nestkv_core::{Error, Output, Session};
use nestkv_parser::{parse_command, ParseError};

/// Why a single input line produced an error line.
#[derive(Debug, From)]
pub enum LineError {
    Parse(ParseError),
    Store(Error),
}

impl LineError {
    /// The core error kind this line reports.
    #[must_use]
    pub fn kind(&self) -> Error {
        match self {
            Self::Parse(_) => Error::InvalidCommand,
            Self::Store(e) => e.clone(),
        }
    }
}

impl Display for LineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// One JSON object per line instead of the plain wire text.
    pub json: bool,
    /// Print each command before its result (plain mode only).
    pub echo: bool,
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines: usize,
    pub errors: usize,
    /// `END` was read (as opposed to running out of input).
    pub ended: bool,
}

/// Execute one line against `session`.
///
/// A blank line is not a command and reports `INVALID COMMAND`, like any
/// other unrecognised input.
fn execute_line(session: &mut Session, line: &str) -> Result<Output, LineError> {
    let command = parse_command(line)?.ok_or(Error::InvalidCommand)?;
    Ok(session.execute(command)?)
}

/// Decode one raw input line without its `\n` or `\r\n` terminator.
///
/// Invalid UTF-8 sequences become U+FFFD, so such a line is still executed
/// as a command rather than aborting the session.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Read commands from `reader` until `END` or end of input, writing results
/// to `writer`.
///
/// Failed commands are reported and the loop continues; only I/O errors
/// stop it early. Lines that are not valid UTF-8 are decoded lossily.
///
/// # Errors
///
/// Returns any error from reading `reader` or writing `writer`.
pub fn run_session<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    options: RunOptions,
) -> io::Result<SessionSummary> {
    let mut session = Session::new();
    let mut summary = SessionSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = decode_line(&buf);
        summary.lines += 1;
        let line_no = summary.lines;
        if matches!(line, Cow::Owned(_)) {
            tracing::warn!(line = line_no, "input line is not valid UTF-8");
        }

        if options.echo && !options.json {
            writeln!(writer, "> {}", line.trim())?;
        }

        let result = execute_line(&mut session, &line);
        if let Err(e) = &result {
            summary.errors += 1;
            tracing::debug!(line = line_no, error = %e, "command failed");
        }

        if options.json {
            let record = match &result {
                Ok(output) => serde_json::json!({
                    "line": line_no,
                    "ok": true,
                    "output": output.to_string(),
                }),
                Err(LineError::Parse(e)) => serde_json::json!({
                    "line": line_no,
                    "ok": false,
                    "error": e.to_string(),
                    "kind": Error::InvalidCommand,
                }),
                Err(LineError::Store(e)) => serde_json::json!({
                    "line": line_no,
                    "ok": false,
                    "error": e.to_string(),
                    "kind": e,
                }),
            };
            writeln!(writer, "{record}")?;
        } else {
            match &result {
                Ok(output) if output.is_silent() => {}
                Ok(output) => writeln!(writer, "{output}")?,
                Err(e) => writeln!(writer, "{e}")?,
            }
        }

        if session.is_ended() {
            summary.ended = true;
            break;
        }
    }

    writer.flush()?;
    tracing::info!(
        lines = summary.lines,
        errors = summary.errors,
        ended = summary.ended,
        "session finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (String, SessionSummary) {
        let mut out = Vec::new();
        let summary =
            run_session(input.as_bytes(), &mut out, RunOptions::default()).expect("in-memory io");
        (String::from_utf8(out).expect("utf-8 output"), summary)
    }

    #[test]
    fn test_blank_line_is_invalid() {
        let (out, summary) = run("\nEND\n");
        assert_eq!(out, "INVALID COMMAND\n");
        assert_eq!(summary.errors, 1);
        assert!(summary.ended);
    }

    #[test]
    fn test_line_error_kind() {
        let parse = parse_command("SET a").expect_err("invalid");
        assert_eq!(LineError::from(parse).kind(), Error::InvalidCommand);
        assert_eq!(
            LineError::from(Error::NoTransaction).to_string(),
            "NO TRANSACTION"
        );
    }
}
