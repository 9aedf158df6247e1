//! Random command scripts for exercising `nestkv_core`.
//!
//! Scripts are generated with their expected outputs already recorded, using
//! an undo-log reference model ([`model::ReferenceStore`]) that shares no
//! code with the snapshot-copying store under test.

pub mod generator;
pub mod model;
pub mod replay;

pub use generator::{generate_mult_scripts, generate_script, Script, ScriptParams};
pub use replay::{check, replay, Mismatch};
