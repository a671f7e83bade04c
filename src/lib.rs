// FocusFlow client
// Library exports

// Core modules
pub mod api;
pub mod cli;
pub mod config;
pub mod poll;
pub mod retry;
pub mod session;
pub mod store;
pub mod verify;
