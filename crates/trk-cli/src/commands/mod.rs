//! CLI subcommand implementations.

pub mod edit;
pub mod print;
pub mod start;
pub mod stop;
pub mod util;
