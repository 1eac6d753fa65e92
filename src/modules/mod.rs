//! Capabilities contributed by mycli itself
//!
//! Each submodule exposes a `unit()` returning the [`ModuleUnit`] that registers it.

use crate::loader::ModuleUnit;

pub mod log;
pub mod pipes;

/// Every module shipped with mycli.
#[must_use]
pub fn builtin() -> Vec<ModuleUnit> {
    vec![log::unit(), pipes::unit()]
}
