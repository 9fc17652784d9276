// src/cli/handlers/mod.rs

// One module per command family: each exposes its parser(s) and the command
// struct that executes (and, if reversible, undoes) it.

pub mod add;
pub mod appointment;
pub mod archive;
pub mod clear;
pub mod commons;
pub mod delete;
pub mod edit;
pub mod find;
pub mod help;
pub mod list;
pub mod scheme;
pub mod statistics;
pub mod undo;
