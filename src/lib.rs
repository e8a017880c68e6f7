//! Back-navigation coordinator for a single-page mobile shell.
//!
//! [`Coordinator`] owns the page stack and is the only writer of navigation
//! state. [`Shell`] wires it to whatever back-button channels the host
//! exposes and mirrors the stack into host session history when running in
//! a plain browser.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod history;
pub mod page;
pub mod platform;
pub mod scenario;
pub mod shell;
pub mod sim;
pub mod sync;

pub use coordinator::Coordinator;
pub use page::PageId;
pub use shell::{HostEnvironment, Shell};
