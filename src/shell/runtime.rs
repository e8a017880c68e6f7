use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::AppResult;
use crate::event::{NavSignal, SignalOutcome};
use crate::page::PageId;
use crate::platform::{Detection, HostMode, Normalizer, detect};
use crate::sync::HistorySynchronizer;

use super::host::HostEnvironment;

/// One navigation session: the coordinator plus the platform listeners
/// feeding it. Construct exactly one per running application.
pub struct Shell {
    coordinator: Coordinator,
    normalizer: Normalizer,
    detection: Detection,
}

impl Shell {
    pub fn start(config: &Config, host: &mut dyn HostEnvironment) -> AppResult<Self> {
        let caps = host.probe();
        let detection = detect(&caps, &config.signals.webview_markers);

        let mut normalizer = Normalizer::new(config.signals.coalesce_within_turn);
        let channels = detection
            .channels
            .iter()
            .map(|kind| host.channel(*kind))
            .collect::<AppResult<Vec<_>>>()?;
        normalizer.attach(channels)?;

        let sync = match detection.mode {
            HostMode::Browser if config.sync.enabled => host
                .host_history()
                .map(HistorySynchronizer::new)
                .unwrap_or_else(HistorySynchronizer::inert),
            _ => HistorySynchronizer::inert(),
        };
        let coordinator = Coordinator::new(
            PageId::new(config.history.initial_page.as_str()),
            config.history.capacity,
            sync,
        );

        log::info!(
            "navigation shell started in {:?} mode at {} (channels: {:?}, host sync: {})",
            detection.mode,
            coordinator.current(),
            normalizer.registered(),
            coordinator.is_syncing_host_history()
        );

        Ok(Self {
            coordinator,
            normalizer,
            detection,
        })
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    /// Processes every platform signal queued so far as one turn.
    pub fn pump(&mut self) -> Vec<SignalOutcome> {
        let signals = self.normalizer.drain_turn();
        self.dispatch(signals)
    }

    /// Waits for the next turn of platform signals. `None` after shutdown.
    pub async fn next_turn(&mut self) -> Option<Vec<SignalOutcome>> {
        let signals = self.normalizer.next_turn().await?;
        Some(self.dispatch(signals))
    }

    pub fn shutdown(&mut self) {
        self.normalizer.detach();
        log::info!("navigation shell stopped at {}", self.coordinator.current());
    }

    fn dispatch(&mut self, signals: Vec<NavSignal>) -> Vec<SignalOutcome> {
        signals
            .into_iter()
            .map(|signal| {
                let source = match &signal {
                    NavSignal::Back { source } => Some(*source),
                    NavSignal::HostHistory { .. } => None,
                };
                let outcome = self.coordinator.handle_signal(signal);
                if outcome == SignalOutcome::PassThrough
                    && let Some(source) = source
                {
                    self.normalizer.release_default(source);
                }
                outcome
            })
            .collect()
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("coordinator", &self.coordinator)
            .field("detection", &self.detection)
            .finish()
    }
}
