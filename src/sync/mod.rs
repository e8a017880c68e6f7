mod host;
mod synchronizer;

pub use host::{HistoryPayload, HostHistory};
pub use synchronizer::HistorySynchronizer;
