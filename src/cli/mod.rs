//! Command-line interface components
//!
//! This module contains CLI-specific code for the enterprise-lookup client,
//! including argument parsing and command handlers.

pub mod args;
pub mod commands;

pub use args::{
    CheckoutArgs, Cli, Commands, ExportAction, ExportArgs, GlobalArgs, SearchArgs,
};
pub use commands::{handle_checkout, handle_export, handle_search};
