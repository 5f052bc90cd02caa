//! # arcpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the arcpack CLI so `main.rs` can route
//! to them. Each command defines its own arguments structure and handler.
//!
//! - `archive`: Build a ZIP or TAR-family archive from files and directories
//!

/// Builds archives. Defines `ArchiveArgs` and `handle_archive`.
pub mod archive;
