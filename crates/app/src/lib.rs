//! `formcheck-app` library crate.
//!
//! Wires the validation core and the message store into a form session:
//! configuration, initial data loading, field navigation and the session
//! controller. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod loader;
pub mod navigation;
pub mod session;
