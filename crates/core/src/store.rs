use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::error::Error;
use crate::snapshot::Snapshot;

/// Whether a transaction is open, and how deeply nested it is.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransactionState {
    NoTransaction,
    InTransaction { depth: NonZeroUsize },
}

/// A base snapshot plus a stack of nested transaction levels.
///
/// `levels` is ordered oldest to newest. The active snapshot is the last
/// level, or `base` when no transaction is open. Each level is an
/// independent duplicate of whatever was active when it was pushed, so
/// writes to the top never reach the levels beneath it.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    base: Snapshot,
    levels: Vec<Snapshot>,
}

impl TransactionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot that reads go to.
    #[must_use]
    pub fn active(&self) -> &Snapshot {
        self.levels.last().unwrap_or(&self.base)
    }

    /// The snapshot that writes go to.
    pub fn active_mut(&mut self) -> &mut Snapshot {
        self.levels.last_mut().unwrap_or(&mut self.base)
    }

    #[must_use]
    pub fn state(&self) -> TransactionState {
        NonZeroUsize::new(self.levels.len()).map_or(TransactionState::NoTransaction, |depth| {
            TransactionState::InTransaction { depth }
        })
    }

    /// Number of open levels; `0` outside a transaction.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Open a new level holding a copy of the active snapshot.
    pub fn begin(&mut self) {
        let level = self.active().duplicate();
        self.levels.push(level);
        tracing::debug!(depth = self.levels.len(), "transaction begun");
    }

    /// Discard the innermost level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTransaction`] when no level is open; the store is
    /// left untouched.
    pub fn rollback(&mut self) -> Result<(), Error> {
        self.levels.pop().ok_or(Error::NoTransaction)?;
        tracing::debug!(depth = self.levels.len(), "transaction rolled back");
        Ok(())
    }

    /// Promote the innermost level to be the new base and close every open
    /// level at once.
    ///
    /// Intermediate levels are dropped without being applied; the innermost
    /// level already contains their effects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTransaction`] when no level is open; the store is
    /// left untouched.
    pub fn commit(&mut self) -> Result<(), Error> {
        let top = self.levels.pop().ok_or(Error::NoTransaction)?;
        let closed = self.levels.len() + 1;
        self.levels.clear();
        self.base = top;
        tracing::debug!(closed, "transactions committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> TransactionState {
        TransactionState::InTransaction {
            depth: NonZeroUsize::new(n).unwrap(),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = TransactionStore::new();
        assert_eq!(store.state(), TransactionState::NoTransaction);
        assert_eq!(store.depth(), 0);
        assert!(store.active().is_empty());
    }

    #[test]
    fn test_begin_copies_active() {
        let mut store = TransactionStore::new();
        store.begin();
        assert_eq!(store.state(), depth(1));
        assert_eq!(store.active(), &store.base);

        store.active_mut().set("a", "10");
        store.begin();
        assert_eq!(store.state(), depth(2));
        assert_eq!(store.levels[0], store.levels[1]);
        assert_eq!(store.active().get("a"), Some("10"));
    }

    #[test]
    fn test_writes_confined_to_top() {
        let mut store = TransactionStore::new();
        store.active_mut().set("a", "1");
        store.begin();
        store.active_mut().set("a", "2");
        store.active_mut().set("b", "2");

        assert_eq!(store.base.get("a"), Some("1"));
        assert!(!store.base.exists("b"));
    }

    #[test]
    fn test_rollback_without_transaction() {
        let mut store = TransactionStore::new();
        store.active_mut().set("a", "1");
        assert_eq!(store.rollback(), Err(Error::NoTransaction));
        assert_eq!(store.active().get("a"), Some("1"));
        assert_eq!(store.state(), TransactionState::NoTransaction);
    }

    #[test]
    fn test_rollback_pops_only_last() {
        let mut store = TransactionStore::new();
        store.begin();
        store.active_mut().set("a", "1");
        let first = store.active().clone();
        store.begin();
        store.active_mut().set("a", "2");

        assert_eq!(store.rollback(), Ok(()));
        assert_eq!(store.depth(), 1);
        assert_eq!(store.active(), &first);

        assert_eq!(store.rollback(), Ok(()));
        assert_eq!(store.state(), TransactionState::NoTransaction);
        assert_eq!(store.active().get("a"), None);
    }

    #[test]
    fn test_commit_without_transaction() {
        let mut store = TransactionStore::new();
        store.active_mut().set("a", "1");
        assert_eq!(store.commit(), Err(Error::NoTransaction));
        assert_eq!(store.active().get("a"), Some("1"));
    }

    #[test]
    fn test_commit_flattens_all_levels() {
        let mut store = TransactionStore::new();
        store.begin();
        store.active_mut().set("a", "1");
        store.begin();
        store.active_mut().set("b", "2");
        store.begin();
        store.active_mut().unset("a");

        assert_eq!(store.commit(), Ok(()));
        assert_eq!(store.state(), TransactionState::NoTransaction);
        assert_eq!(store.active().get("a"), None);
        assert_eq!(store.active().get("b"), Some("2"));
        assert_eq!(store.commit(), Err(Error::NoTransaction));
        assert_eq!(store.rollback(), Err(Error::NoTransaction));
    }

    #[test]
    fn test_nested_rollback_then_commit() {
        let mut store = TransactionStore::new();
        store.begin();
        store.active_mut().set("a", "1");
        store.begin();
        store.active_mut().set("a", "2");
        store.rollback().unwrap();
        assert_eq!(store.active().get("a"), Some("1"));

        store.begin();
        store.active_mut().set("a", "2");
        store.commit().unwrap();
        assert_eq!(store.active().get("a"), Some("2"));
        assert_eq!(store.depth(), 0);
    }
}
