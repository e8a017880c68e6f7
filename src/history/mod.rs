pub mod state;

pub use state::{DEFAULT_HISTORY_CAPACITY, NavigationStack, Reconciliation};
