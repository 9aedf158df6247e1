use alloc::string::{String, ToString};
use core::fmt::{Display, Formatter, Result};

use crate::error::Error;

/// One line of the command protocol, already split into words.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Set { name: String, value: String },
    Get { name: String },
    Unset { name: String },
    NumEqualTo { value: String },
    Begin,
    Rollback,
    Commit,
    End,
}

impl Command {
    /// Number of arguments `keyword` takes, or `None` for an unknown
    /// keyword.
    ///
    /// Keywords are matched exactly; `set` is not `SET`.
    #[must_use]
    pub fn arity(keyword: &str) -> Option<usize> {
        match keyword {
            "SET" => Some(2),
            "GET" | "UNSET" | "NUMEQUALTO" => Some(1),
            "BEGIN" | "ROLLBACK" | "COMMIT" | "END" => Some(0),
            _ => None,
        }
    }

    /// Build a command from its keyword and ordered arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCommand`] for an unknown keyword or a wrong
    /// number of arguments.
    pub fn from_words<S: AsRef<str>>(
        keyword: &str,
        args: &[S],
    ) -> core::result::Result<Self, Error> {
        if Self::arity(keyword) != Some(args.len()) {
            return Err(Error::InvalidCommand);
        }
        let word = |i: usize| args[i].as_ref().to_string();
        let command = match keyword {
            "SET" => Self::Set {
                name: word(0),
                value: word(1),
            },
            "GET" => Self::Get { name: word(0) },
            "UNSET" => Self::Unset { name: word(0) },
            "NUMEQUALTO" => Self::NumEqualTo { value: word(0) },
            "BEGIN" => Self::Begin,
            "ROLLBACK" => Self::Rollback,
            "COMMIT" => Self::Commit,
            _ => Self::End,
        };
        Ok(command)
    }

    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Set { .. } => "SET",
            Self::Get { .. } => "GET",
            Self::Unset { .. } => "UNSET",
            Self::NumEqualTo { .. } => "NUMEQUALTO",
            Self::Begin => "BEGIN",
            Self::Rollback => "ROLLBACK",
            Self::Commit => "COMMIT",
            Self::End => "END",
        }
    }

    /// True for commands that write to the active snapshot.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Set { .. } | Self::Unset { .. })
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.keyword())?;
        match self {
            Self::Set { name, value } => write!(f, " {name} {value}"),
            Self::Get { name } | Self::Unset { name } => write!(f, " {name}"),
            Self::NumEqualTo { value } => write!(f, " {value}"),
            Self::Begin | Self::Rollback | Self::Commit | Self::End => Ok(()),
        }
    }
}
