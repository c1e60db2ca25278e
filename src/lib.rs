//! snapshell: natural-language to shell-command suggestions, grounded in the
//! packages installed on the local machine.

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod llm;
pub mod package_manager;
pub mod shell;
pub mod suggest;
pub mod terminal;
pub mod utils;

pub use error::{Result, SnapshellError};
