use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::AppResult;
use crate::event::RawSignal;

use super::detect::ChannelKind;

/// Sending half of the platform boundary. Cheap to clone; may be moved into
/// host callbacks on any thread.
#[derive(Debug, Clone)]
pub struct SignalSink {
    tx: UnboundedSender<RawSignal>,
}

impl SignalSink {
    pub(crate) fn new(tx: UnboundedSender<RawSignal>) -> Self {
        Self { tx }
    }

    /// Returns `false` once the shell has shut down.
    pub fn back_pressed(&self, channel: ChannelKind) -> bool {
        self.tx.send(RawSignal::BackPressed { channel }).is_ok()
    }

    pub fn history_changed(&self, state: Option<Value>) -> bool {
        self.tx.send(RawSignal::HistoryChanged { state }).is_ok()
    }
}

/// One host mechanism that can deliver back gestures.
///
/// Implementations must suppress the host's default action for a gesture
/// before reporting it through the sink.
pub trait BackChannel {
    fn kind(&self) -> ChannelKind;

    fn register(&mut self, sink: SignalSink) -> AppResult<()>;

    /// Must drop the sink handed to `register`.
    fn unregister(&mut self);

    /// Lets the suppressed default proceed for the last gesture.
    fn release_default(&mut self) {}
}

/// A live listener registration; deregisters when dropped.
pub struct ChannelRegistration {
    channel: Box<dyn BackChannel>,
}

impl ChannelRegistration {
    pub fn register(mut channel: Box<dyn BackChannel>, sink: SignalSink) -> AppResult<Self> {
        channel.register(sink)?;
        log::debug!("registered {} back channel", channel.kind());
        Ok(Self { channel })
    }

    pub fn kind(&self) -> ChannelKind {
        self.channel.kind()
    }

    pub fn release_default(&mut self) {
        self.channel.release_default();
    }
}

impl Drop for ChannelRegistration {
    fn drop(&mut self) {
        self.channel.unregister();
        log::debug!("unregistered {} back channel", self.channel.kind());
    }
}

impl std::fmt::Debug for ChannelRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistration")
            .field("kind", &self.kind())
            .finish()
    }
}
