//! Nexusctl library - exposes the CLI modules for integration tests

pub mod cli;
pub mod display;
pub mod errors;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod progress;
