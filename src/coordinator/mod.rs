mod core;
mod listeners;

pub use core::Coordinator;
pub use listeners::{ListenerId, ListenerSet, PageListener};
