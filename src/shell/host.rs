use crate::error::AppResult;
use crate::platform::{BackChannel, ChannelKind, HostCapabilities};
use crate::sync::HostHistory;

/// What the embedding runtime offers the shell at startup.
pub trait HostEnvironment {
    fn probe(&self) -> HostCapabilities;

    /// Only called for kinds the detector selected from `probe`.
    fn channel(&mut self, kind: ChannelKind) -> AppResult<Box<dyn BackChannel>>;

    fn host_history(&mut self) -> Option<Box<dyn HostHistory>>;
}
