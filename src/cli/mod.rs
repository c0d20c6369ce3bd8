//! Command-line interface for the `agraph` binary.

pub mod commands;
