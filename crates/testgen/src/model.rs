//! An undo-log implementation of the store, used as an oracle.
//!
//! Where `nestkv_core` copies the whole snapshot on every `BEGIN`, this model
//! keeps a single map and records, per open level, the previous value of
//! every name it overwrites. The two share no code, so agreement between
//! them on random scripts is meaningful.

use std::collections::BTreeMap;

use nestkv_core::{Command, Error, Output};

/// Previous value of a name before a write inside some level.
type UndoEntry = (String, Option<String>);

#[derive(Debug, Default, Clone)]
pub struct ReferenceStore {
    vars: BTreeMap<String, String>,
    undo: Vec<Vec<UndoEntry>>,
    ended: bool,
}

impl ReferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.undo.len()
    }

    fn record(&mut self, name: &str) {
        let previous = self.vars.get(name).cloned();
        if let Some(log) = self.undo.last_mut() {
            log.push((name.to_string(), previous));
        }
    }

    /// Apply `command` and return what a session must answer.
    ///
    /// # Errors
    ///
    /// The same error kinds a `nestkv_core::Session` reports.
    pub fn apply(&mut self, command: &Command) -> Result<Output, Error> {
        if self.ended {
            return Err(Error::SessionEnded);
        }
        match command {
            Command::Set { name, value } => {
                self.record(name);
                self.vars.insert(name.clone(), value.clone());
                Ok(Output::Nothing)
            }
            Command::Get { name } => self
                .vars
                .get(name)
                .map(|v| Output::Value(v.clone()))
                .ok_or_else(|| Error::NoValue { name: name.clone() }),
            Command::Unset { name } => {
                if self.vars.contains_key(name) {
                    self.record(name);
                    self.vars.remove(name);
                }
                Ok(Output::Nothing)
            }
            Command::NumEqualTo { value } => Ok(Output::Count(
                self.vars.values().filter(|v| *v == value).count(),
            )),
            Command::Begin => {
                self.undo.push(Vec::new());
                Ok(Output::Nothing)
            }
            Command::Rollback => {
                let log = self.undo.pop().ok_or(Error::NoTransaction)?;
                for (name, previous) in log.into_iter().rev() {
                    match previous {
                        Some(value) => self.vars.insert(name, value),
                        None => self.vars.remove(&name),
                    };
                }
                Ok(Output::Nothing)
            }
            Command::Commit => {
                if self.undo.is_empty() {
                    return Err(Error::NoTransaction);
                }
                self.undo.clear();
                Ok(Output::Nothing)
            }
            Command::End => {
                self.ended = true;
                Ok(Output::Nothing)
            }
        }
    }
}

/// Outputs the reference model produces for `commands`, in order.
#[must_use]
pub fn expected_outputs(commands: &[Command]) -> Vec<Result<Output, Error>> {
    let mut model = ReferenceStore::new();
    commands.iter().map(|c| model.apply(c)).collect()
}
