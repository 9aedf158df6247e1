use alloc::string::String;
use core::fmt::{Display, Formatter, Result};

/// Error returned by a command or a store operation.
///
/// Every variant is recoverable: the store is left exactly as it was before
/// the failing call.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unknown keyword or wrong number of arguments.
    InvalidCommand,
    /// `ROLLBACK` or `COMMIT` with no open transaction.
    NoTransaction,
    /// `GET` of a variable that is not set in the active snapshot.
    NoValue { name: String },
    /// A command arrived after `END`.
    SessionEnded,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidCommand => write!(f, "INVALID COMMAND"),
            Self::NoTransaction => write!(f, "NO TRANSACTION"),
            Self::NoValue { .. } => write!(f, "NULL"),
            Self::SessionEnded => write!(f, "SESSION ENDED"),
        }
    }
}
