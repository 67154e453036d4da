//! Command-line front end for l2switch
//!
//! [`args`] holds the argument definitions; [`run`] wires configuration,
//! the raw-socket transport and the dispatcher together.

pub mod args;
pub mod run;

pub use args::Cli;
pub use run::{prepare, run};
