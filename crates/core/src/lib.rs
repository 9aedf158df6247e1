//! In-memory key-value storage with nested transactions.
//!
//! `nestkv_core` holds the state of one session: a base [`Snapshot`] and a
//! stack of transaction levels kept by [`TransactionStore`]. Every variable
//! command reads and writes the *active* snapshot, which is the innermost
//! open level or the base when no transaction is open.
//!
//! 1. **BEGIN** pushes a deep copy of the active snapshot.
//! 2. **ROLLBACK** pops the innermost level, restoring the one beneath it.
//! 3. **COMMIT** promotes the innermost level to be the new base and closes
//!    every open level in one step.
//!
//! Levels never alias each other, so isolation between nesting depths holds
//! without any bookkeeping beyond the stack itself.
//!
//! # Entry point
//!
//! Most callers drive a [`Session`] with parsed [`Command`]s and print the
//! resulting [`Output`] or [`Error`]:
//!
//! ```rust
//! use nestkv_core::{Command, Output, Session};
//!
//! let mut session = Session::new();
//! session.execute(Command::Set { name: "a".into(), value: "10".into() }).unwrap();
//! session.execute(Command::Begin).unwrap();
//! session.execute(Command::Set { name: "a".into(), value: "20".into() }).unwrap();
//! session.execute(Command::Rollback).unwrap();
//! let out = session.execute(Command::Get { name: "a".into() });
//! assert_eq!(out, Ok(Output::Value("10".into())));
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` derives on
//!   [`Snapshot`], [`Command`], [`Output`] and [`Error`].
//!
//! This crate is `no_std` compatible (requires `alloc`). The text protocol
//! parser lives in the separate `nestkv_parser` crate.

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod command;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod store;

pub use command::Command;
pub use error::Error;
pub use session::{Output, Session};
pub use snapshot::Snapshot;
pub use store::{TransactionState, TransactionStore};
