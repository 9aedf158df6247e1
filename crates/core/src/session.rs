use alloc::string::{String, ToString};
use core::fmt::{Display, Formatter};

use derive_more::From;

use crate::command::Command;
use crate::error::Error;
use crate::store::TransactionStore;

/// What a successful command produces.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Output {
    /// The command succeeded silently.
    #[from(skip)]
    Nothing,
    /// `GET` result.
    Value(String),
    /// `NUMEQUALTO` result.
    Count(usize),
}

impl Output {
    /// True when there is nothing to print.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Nothing => Ok(()),
            Self::Value(value) => write!(f, "{value}"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Executes commands against one [`TransactionStore`] until `END`.
#[derive(Debug, Default)]
pub struct Session {
    store: TransactionStore,
    ended: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn store(&self) -> &TransactionStore {
        &self.store
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Apply one command.
    ///
    /// Variable commands go to the store's active snapshot without looking
    /// at whether a transaction is open.
    ///
    /// # Errors
    ///
    /// - [`Error::NoValue`] for `GET` of an unset variable.
    /// - [`Error::NoTransaction`] for `ROLLBACK`/`COMMIT` outside a
    ///   transaction.
    /// - [`Error::SessionEnded`] for any command after `END`.
    pub fn execute(&mut self, command: Command) -> Result<Output, Error> {
        if self.ended {
            return Err(Error::SessionEnded);
        }
        tracing::trace!(
            keyword = command.keyword(),
            mutation = command.is_mutation(),
            depth = self.store.depth(),
            "executing"
        );

        match command {
            Command::Set { name, value } => {
                self.store.active_mut().set(name, value);
                Ok(Output::Nothing)
            }
            Command::Get { name } => match self.store.active().get(&name) {
                Some(value) => Ok(Output::from(value.to_string())),
                None => Err(Error::NoValue { name }),
            },
            Command::Unset { name } => {
                self.store.active_mut().unset(&name);
                Ok(Output::Nothing)
            }
            Command::NumEqualTo { value } => {
                Ok(Output::from(self.store.active().count_equal_to(&value)))
            }
            Command::Begin => {
                self.store.begin();
                Ok(Output::Nothing)
            }
            Command::Rollback => self.store.rollback().map(|()| Output::Nothing),
            Command::Commit => self.store.commit().map(|()| Output::Nothing),
            Command::End => {
                self.ended = true;
                Ok(Output::Nothing)
            }
        }
    }
}
