//! Framework helper commands.

/// Submodule defining the `/help` command.
pub mod help;
/// Submodule defining the `register` prefix command.
pub mod register;
