//! CLI command implementations.

pub mod content;
pub mod directory;
pub mod init;
pub mod list;
pub mod settings;
