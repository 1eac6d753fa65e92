//! Command descriptors and the commands shipped with mycli
//!
//! A command is produced by a factory that receives the fully loaded
//! [`Context`](crate::context::Context) and returns a [`CommandSpec`]: a usage pattern,
//! a description, an option schema and a handler. The dispatcher turns these into
//! subcommands of the CLI.

pub mod create;
pub mod descriptor;
pub mod echo;
pub mod say;

pub use descriptor::{CommandError, CommandSpec, OptionSpec};
