//! The `fisc` command-line front end: argument parsing, config file
//! merging, logging setup and text/JSON rendering over [`fisc_core`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
