//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

mod completions;
mod config;
mod types;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use types::handle_types;
pub use validate::handle_validate;
