//! wasm library for nestkv
//! compiled binary is uploaded as github action artifact

use nestkv_core::{Error, Session};
use nestkv_parser::{parse_command, tokenize_with_text, TokenKind};
use wasm_bindgen::prelude::*;

const fn token_class(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Set | TokenKind::Unset => "write",
        TokenKind::Get | TokenKind::NumEqualTo => "read",
        TokenKind::Begin | TokenKind::Rollback | TokenKind::Commit | TokenKind::End => {
            "control"
        }
        TokenKind::Word => "word",
        TokenKind::Whitespace | TokenKind::Newline => "space",
    }
}

/// Run a whole script in a fresh session and return one result per line.
///
/// Returns a JSON string:
/// ```json
/// {
///   "ended": true,
///   "results": [
///     {"line": 1, "ok": true, "output": ""},
///     {"line": 2, "ok": false, "error": "NULL"}
///   ],
///   "snapshot": {"a": "10"}
/// }
/// ```
///
/// Processing stops after `END`, like the command-line session. `snapshot`
/// is the active snapshot once the script has run.
#[must_use]
#[wasm_bindgen]
pub fn run_script(script: &str) -> String {
    let mut session = Session::new();
    let mut results: Vec<serde_json::Value> = Vec::new();

    for (idx, line) in script.lines().enumerate() {
        let outcome = match parse_command(line) {
            Ok(Some(command)) => session.execute(command),
            Ok(None) | Err(_) => Err(Error::InvalidCommand),
        };
        let record = match outcome {
            Ok(output) => serde_json::json!({
                "line": idx + 1,
                "ok": true,
                "output": output.to_string(),
            }),
            Err(error) => serde_json::json!({
                "line": idx + 1,
                "ok": false,
                "error": error.to_string(),
            }),
        };
        results.push(record);
        if session.is_ended() {
            break;
        }
    }

    serde_json::json!({
        "ended": session.is_ended(),
        "results": results,
        "snapshot": session.store().active(),
    })
    .to_string()
}

/// Classify every token of `script` for syntax highlighting.
///
/// Returns a JSON array of `{"start": .., "end": .., "class": ..}` objects
/// where `class` is one of `write`, `read`, `control`, `word`, `space`.
#[must_use]
#[wasm_bindgen]
pub fn highlight(script: &str) -> String {
    let spans: Vec<serde_json::Value> = tokenize_with_text(script)
        .into_iter()
        .map(|(token, _)| {
            serde_json::json!({
                "start": token.span.start,
                "end": token.span.end,
                "class": token_class(token.kind),
            })
        })
        .collect();
    serde_json::Value::Array(spans).to_string()
}
