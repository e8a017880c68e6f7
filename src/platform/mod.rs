//! Host back-button plumbing: capability detection, per-channel
//! registrations and the normalizer that turns raw host events into
//! canonical navigation signals.

mod channel;
mod detect;
mod normalizer;

pub use channel::{BackChannel, ChannelRegistration, SignalSink};
pub use detect::{ChannelKind, Detection, HostCapabilities, HostMode, detect};
pub use normalizer::Normalizer;
