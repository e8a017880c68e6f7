use super::{pages, start};
use crate::event::SignalOutcome;
use crate::platform::{ChannelKind, HostCapabilities, HostMode};
use crate::sim::SimulatedHost;

fn dual_bridge_host() -> SimulatedHost {
    SimulatedHost::new(HostCapabilities {
        plugin_bridge: true,
        message_channel: true,
        session_history: true,
        ..HostCapabilities::default()
    })
}

#[test]
fn hardware_back_pops_then_passes_through_at_root() {
    let host = SimulatedHost::hybrid();
    let mut shell = start(&host);
    assert_eq!(shell.detection().mode, HostMode::Hybrid);
    assert!(shell.detection().in_webview);

    shell.coordinator_mut().navigate_to("grades");
    host.press_back();
    assert_eq!(shell.pump(), vec![SignalOutcome::Absorbed]);
    assert_eq!(pages(&shell), ["dashboard"]);
    assert!(!host.exit_requested());

    host.press_back();
    assert_eq!(shell.pump(), vec![SignalOutcome::PassThrough]);
    assert_eq!(host.released_defaults(), vec![ChannelKind::PluginBridge]);
    assert!(host.exit_requested());
    assert_eq!(host.suppressed_defaults(), 2);
}

#[test]
fn hybrid_shell_never_writes_host_history() {
    let host = SimulatedHost::hybrid();
    let mut shell = start(&host);
    shell.coordinator_mut().navigate_to("grades");
    shell.coordinator_mut().go_back();
    shell.coordinator_mut().reset_to("library");

    assert_eq!(host.history_writes(), 0);
    assert_eq!(host.history_pages(), vec![None]);
}

#[test]
fn one_gesture_on_two_bridges_pops_once() {
    let host = dual_bridge_host();
    let mut shell = start(&host);
    shell.coordinator_mut().navigate_to("grades");
    shell.coordinator_mut().navigate_to("attendance");

    assert_eq!(host.press_back(), 2);
    assert_eq!(shell.pump(), vec![SignalOutcome::Absorbed]);
    assert_eq!(pages(&shell), ["dashboard", "grades"]);
}

#[test]
fn two_gestures_on_one_bridge_pop_twice_in_one_turn() {
    let host = SimulatedHost::hybrid();
    let mut shell = start(&host);
    for page in ["grades", "attendance", "library"] {
        shell.coordinator_mut().navigate_to(page);
    }

    assert_eq!(host.press_back(), 1);
    assert_eq!(host.press_back(), 1);
    assert_eq!(
        shell.pump(),
        vec![SignalOutcome::Absorbed, SignalOutcome::Absorbed]
    );
    assert_eq!(pages(&shell), ["dashboard", "grades"]);
    assert!(host.released_defaults().is_empty());
}

#[tokio::test]
async fn next_turn_delivers_queued_gesture() {
    let host = SimulatedHost::hybrid();
    let mut shell = start(&host);
    shell.coordinator_mut().navigate_to("announcements");

    host.press_back();
    let outcomes = shell.next_turn().await.expect("shell is running");
    assert_eq!(outcomes, vec![SignalOutcome::Absorbed]);
    assert_eq!(shell.coordinator().current(), &"dashboard");
}
