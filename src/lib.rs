// The binary entry point is main.rs; the module tree lives here so that
// integration tests can drive the session without a terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod store;
pub mod text;
pub mod ui;
