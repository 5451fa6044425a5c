//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Each window gets a shell webview for its chrome and a
//! `ShellState` whose layout reporter feeds the shared view reconciler.

mod core;
mod dispatch;
mod event_handler;
mod init;
mod polling;
mod shell;
mod shutdown;

pub use self::core::ChorusApp;
