//! Command-line front end for `fixture-verifier`.
//!
//! The `fixcheck` binary is a thin wrapper over [`cli::run`]; the library
//! target exists so argument parsing and command execution can be tested
//! without spawning a process.

pub mod cli;
pub mod logging;
