pub mod ci;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod release_notes;
pub mod resolver;
pub mod templates;
pub mod ui;
pub mod warning;

pub use error::{CiError, Result};
