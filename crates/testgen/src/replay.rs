//! Replay recorded commands through a real session and compare the results.

use nestkv_core::{Command, Error, Output, Session};
use serde::{Deserialize, Serialize};

use crate::generator::Script;

/// First point where the session disagreed with the recorded outputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mismatch {
    /// 0-based position in the command list.
    pub index: usize,
    pub command: Command,
    pub expected: Option<Result<Output, Error>>,
    pub actual: Result<Output, Error>,
}

/// Run every command through a fresh [`Session`] and collect the results.
#[must_use]
pub fn replay(commands: &[Command]) -> Vec<Result<Output, Error>> {
    let mut session = Session::new();
    commands.iter().map(|c| session.execute(c.clone())).collect()
}

/// Check that a fresh session reproduces `expected` exactly.
///
/// # Errors
///
/// Returns the first [`Mismatch`]. A script with fewer recorded outputs
/// than commands mismatches at the first unrecorded command.
pub fn check(commands: &[Command], expected: &[Result<Output, Error>]) -> Result<(), Mismatch> {
    for (index, (command, actual)) in commands.iter().zip(replay(commands)).enumerate() {
        let recorded = expected.get(index);
        if recorded != Some(&actual) {
            return Err(Mismatch {
                index,
                command: command.clone(),
                expected: recorded.cloned(),
                actual,
            });
        }
    }
    Ok(())
}

impl Script {
    /// Replay this script and compare against its recorded outputs.
    ///
    /// # Errors
    ///
    /// See [`check`].
    pub fn verify(&self) -> Result<(), Mismatch> {
        check(self.get_commands(), self.get_expected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_detects_mismatch() {
        let commands = vec![
            Command::Set {
                name: "a".into(),
                value: "1".into(),
            },
            Command::Get { name: "a".into() },
        ];
        let wrong = vec![Ok(Output::Nothing), Ok(Output::Value("2".into()))];
        let err = check(&commands, &wrong).expect_err("should mismatch");
        assert_eq!(err.index, 1);
        assert_eq!(err.actual, Ok(Output::Value("1".into())));

        let right = replay(&commands);
        assert_eq!(check(&commands, &right), Ok(()));
    }

    #[test]
    fn test_check_missing_expected() {
        let commands = vec![Command::Begin, Command::Commit];
        let err = check(&commands, &[Ok(Output::Nothing)]).expect_err("should mismatch");
        assert_eq!(err.index, 1);
        assert_eq!(err.expected, None);
    }
}
