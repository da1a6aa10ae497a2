pub mod completions;
pub mod config;
pub mod format;
pub mod stages;
