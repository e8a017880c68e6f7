use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::error::{AppError, AppResult};
use crate::event::{NavSignal, RawSignal};

use super::channel::{BackChannel, ChannelRegistration, SignalSink};
use super::detect::ChannelKind;

/// Funnels every registered channel into one queue and turns each drained
/// turn of raw events into canonical signals.
pub struct Normalizer {
    rx: UnboundedReceiver<RawSignal>,
    sink: Option<SignalSink>,
    registrations: Vec<ChannelRegistration>,
    coalesce_within_turn: bool,
}

impl Normalizer {
    pub fn new(coalesce_within_turn: bool) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            rx,
            sink: Some(SignalSink::new(tx)),
            registrations: Vec::new(),
            coalesce_within_turn,
        }
    }

    /// `None` after `detach`.
    pub fn sink(&self) -> Option<SignalSink> {
        self.sink.clone()
    }

    /// Registers every channel or none of them: a failure unwinds the
    /// registrations already made in this call.
    pub fn attach(&mut self, channels: Vec<Box<dyn BackChannel>>) -> AppResult<()> {
        let Some(sink) = self.sink.as_ref() else {
            return Err(AppError::invalid_argument("normalizer is already detached"));
        };

        let mut attached = Vec::with_capacity(channels.len());
        for channel in channels {
            attached.push(ChannelRegistration::register(channel, sink.clone())?);
        }
        self.registrations.extend(attached);
        Ok(())
    }

    pub fn registered(&self) -> Vec<ChannelKind> {
        self.registrations.iter().map(|reg| reg.kind()).collect()
    }

    /// Drains everything queued right now as one event-loop turn.
    pub fn drain_turn(&mut self) -> Vec<NavSignal> {
        let mut raw = Vec::new();
        while let Ok(signal) = self.rx.try_recv() {
            raw.push(signal);
        }
        self.normalize(raw)
    }

    /// Waits for the next raw event, then drains the rest of its turn.
    /// Returns `None` once detached and every channel sink is gone.
    pub async fn next_turn(&mut self) -> Option<Vec<NavSignal>> {
        let first = self.rx.recv().await?;
        let mut raw = vec![first];
        while let Ok(signal) = self.rx.try_recv() {
            raw.push(signal);
        }
        Some(self.normalize(raw))
    }

    pub fn release_default(&mut self, kind: ChannelKind) {
        if let Some(reg) = self.registrations.iter_mut().find(|reg| reg.kind() == kind) {
            reg.release_default();
        }
    }

    pub fn detach(&mut self) {
        self.registrations.clear();
        self.sink = None;
    }

    fn normalize(&self, raw: Vec<RawSignal>) -> Vec<NavSignal> {
        let mut out = Vec::with_capacity(raw.len());
        // Channels that already reported the gesture in progress. A repeat
        // from one of them is the next gesture.
        let mut gesture: Vec<ChannelKind> = Vec::new();
        for signal in raw {
            match signal {
                RawSignal::BackPressed { channel } => {
                    if gesture.contains(&channel) {
                        gesture.clear();
                    } else if !gesture.is_empty() && self.coalesce_within_turn {
                        log::debug!("dropping duplicate back signal from {channel}");
                        gesture.push(channel);
                        continue;
                    }
                    gesture.push(channel);
                    out.push(NavSignal::Back { source: channel });
                }
                RawSignal::HistoryChanged { state } => {
                    out.push(NavSignal::HostHistory { state });
                }
            }
        }
        out
    }
}

impl Drop for Normalizer {
    fn drop(&mut self) {
        self.detach();
    }
}
