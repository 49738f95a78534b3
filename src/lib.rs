//! confab: a terminal client for team channels, messages, and projects.
//!
//! The interesting part is [`console`], a screen-stack navigation engine
//! with cooperative cancellation and paged browsing. [`screens`] builds the
//! application on top of it against the [`services`] traits, which
//! [`store::MemoryStore`] implements over a JSON file.

pub mod config;
pub mod console;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod screens;
pub mod services;
pub mod session;
pub mod store;
pub mod types;
