//! CLI commands

pub mod check;
pub mod css;
pub mod list;
