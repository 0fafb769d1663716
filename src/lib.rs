// Library surface for the binary and for headless/integration tests.
pub mod answer;
pub mod app;
pub mod app_dirs;
pub mod challenge;
pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod terminal;
pub mod ui;
