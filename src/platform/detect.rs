use std::fmt;

use serde::Deserialize;

/// The closed set of back-signal delivery mechanisms a host may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Hybrid-app plugin object with a back-button callback registration.
    PluginBridge,
    /// Native WebView shell posting messages to the page.
    MessageChannel,
    /// The browser's own history-change notification.
    BrowserHistory,
}

impl ChannelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PluginBridge => "plugin-bridge",
            Self::MessageChannel => "message-channel",
            Self::BrowserHistory => "browser-history",
        }
    }

    pub fn is_bridge(self) -> bool {
        matches!(self, Self::PluginBridge | Self::MessageChannel)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Nothing to intercept; no back signal is ever raised.
    Detached,
    /// Plain browser tab (or bridge-less WebView) with session history.
    Browser,
    /// At least one native bridge; host session history is not meaningful.
    Hybrid,
}

/// Raw facts reported by the host at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    pub plugin_bridge: bool,
    pub message_channel: bool,
    pub session_history: bool,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub mode: HostMode,
    pub channels: Vec<ChannelKind>,
    pub in_webview: bool,
}

impl Detection {
    pub fn is_hybrid(&self) -> bool {
        self.mode == HostMode::Hybrid
    }
}

/// Picks the channels to listen on. Bridges are probed independently, so a
/// misconfigured embedding may yield both of them.
pub fn detect(caps: &HostCapabilities, webview_markers: &[String]) -> Detection {
    let in_webview = webview_markers
        .iter()
        .any(|marker| !marker.is_empty() && caps.user_agent.contains(marker.as_str()));

    let mut channels = Vec::new();
    if caps.plugin_bridge {
        channels.push(ChannelKind::PluginBridge);
    }
    if caps.message_channel {
        channels.push(ChannelKind::MessageChannel);
    }

    let mode = if !channels.is_empty() {
        HostMode::Hybrid
    } else if caps.session_history {
        channels.push(ChannelKind::BrowserHistory);
        HostMode::Browser
    } else {
        HostMode::Detached
    };

    if channels.len() > 1 {
        log::warn!(
            "multiple back channels detected ({}); duplicate signals will be coalesced per turn",
            channels
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if in_webview && mode == HostMode::Browser {
        log::info!("webview user agent without a native bridge; using browser history");
    }
    log::debug!("host mode {mode:?}, channels {channels:?}, webview {in_webview}");

    Detection {
        mode,
        channels,
        in_webview,
    }
}
