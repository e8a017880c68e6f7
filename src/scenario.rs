//! Scripted navigation sessions replayed against [`SimulatedHost`].

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::event::SignalOutcome;
use crate::page::PageId;
use crate::platform::HostCapabilities;
use crate::shell::Shell;
use crate::sim::SimulatedHost;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub host: HostCapabilities,
    #[serde(default)]
    pub initial: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Navigate {
        page: String,
    },
    /// Physical back gesture on the simulated device.
    Back,
    /// In-app back affordance.
    UiBack,
    /// Browser forward control.
    Forward,
    Reset {
        page: String,
    },
    Expect {
        #[serde(default)]
        current: Option<String>,
        #[serde(default)]
        history: Option<Vec<String>>,
        #[serde(default)]
        exit_requested: Option<bool>,
    },
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Back => "back",
            Self::UiBack => "ui-back",
            Self::Forward => "forward",
            Self::Reset { .. } => "reset",
            Self::Expect { .. } => "expect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub outcomes: Vec<SignalOutcome>,
    pub current: PageId,
    pub history: Vec<PageId>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self
            .history
            .iter()
            .map(PageId::as_str)
            .collect::<Vec<_>>()
            .join(" > ");
        write!(
            f,
            "{:>3} {:<9} current={} history=[{}]",
            self.index, self.action, self.current, history
        )?;
        if !self.outcomes.is_empty() {
            write!(f, " signals={:?}", self.outcomes)?;
        }
        Ok(())
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read scenario: {}", path.display()),
            )
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        toml::from_str(raw).map_err(|source| {
            AppError::invalid_argument(format!("failed to parse scenario: {source}"))
        })
    }

    /// Replays every step, reporting each one as it completes. Stops at the
    /// first failed expectation.
    pub async fn run(
        &self,
        config: &Config,
        mut on_step: impl FnMut(&StepReport),
    ) -> AppResult<Vec<StepReport>> {
        let mut config = config.clone();
        if let Some(initial) = &self.initial {
            config.history.initial_page = initial.clone();
        }
        let host = SimulatedHost::new(self.host.clone());
        let mut shell = Shell::start(&config, &mut host.clone())?;

        let mut reports = Vec::with_capacity(self.steps.len());
        for (offset, step) in self.steps.iter().enumerate() {
            let index = offset + 1;
            let outcomes = match step {
                Step::Navigate { page } => {
                    shell.coordinator_mut().navigate_to(page.as_str());
                    Vec::new()
                }
                Step::Back => settle(&mut shell, host.press_back()).await,
                Step::Forward => settle(&mut shell, host.press_forward()).await,
                Step::UiBack => {
                    if !shell.coordinator_mut().go_back() {
                        log::info!("step {index}: ui back at root");
                    }
                    Vec::new()
                }
                Step::Reset { page } => {
                    shell.coordinator_mut().reset_to(page.as_str());
                    Vec::new()
                }
                Step::Expect {
                    current,
                    history,
                    exit_requested,
                } => {
                    check_expectation(
                        index,
                        &shell,
                        &host,
                        current.as_deref(),
                        history.as_deref(),
                        *exit_requested,
                    )?;
                    Vec::new()
                }
            };

            let report = StepReport {
                index,
                action: step.label(),
                outcomes,
                current: shell.coordinator().current().clone(),
                history: shell.coordinator().history(),
            };
            on_step(&report);
            reports.push(report);
        }

        shell.shutdown();
        Ok(reports)
    }
}

async fn settle(shell: &mut Shell, raised: usize) -> Vec<SignalOutcome> {
    if raised == 0 {
        return Vec::new();
    }
    shell.next_turn().await.unwrap_or_default()
}

fn check_expectation(
    index: usize,
    shell: &Shell,
    host: &SimulatedHost,
    current: Option<&str>,
    history: Option<&[String]>,
    exit_requested: Option<bool>,
) -> AppResult<()> {
    let coordinator = shell.coordinator();
    if let Some(expected) = current
        && coordinator.current() != expected
    {
        return Err(AppError::scenario(
            index,
            format!(
                "expected current page {expected}, found {}",
                coordinator.current()
            ),
        ));
    }
    if let Some(expected) = history {
        let actual = coordinator.history();
        let matches = actual.len() == expected.len()
            && actual.iter().zip(expected).all(|(a, e)| a == e.as_str());
        if !matches {
            return Err(AppError::scenario(
                index,
                format!("expected history {expected:?}, found {actual:?}"),
            ));
        }
    }
    if let Some(expected) = exit_requested
        && host.exit_requested() != expected
    {
        return Err(AppError::scenario(
            index,
            format!("expected exit_requested = {expected}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Scenario, Step};
    use crate::config::Config;
    use crate::error::AppError;
    use crate::event::SignalOutcome;

    const HYBRID_SCRIPT: &str = r#"
        initial = "dashboard"

        [host]
        plugin_bridge = true

        [[step]]
        action = "navigate"
        page = "grades"

        [[step]]
        action = "back"

        [[step]]
        action = "expect"
        current = "dashboard"
        history = ["dashboard"]

        [[step]]
        action = "back"

        [[step]]
        action = "expect"
        exit_requested = true
    "#;

    #[test]
    fn parses_tagged_steps() {
        let scenario = Scenario::from_toml(HYBRID_SCRIPT).expect("scenario should parse");
        assert!(scenario.host.plugin_bridge);
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(
            scenario.steps[0],
            Step::Navigate {
                page: "grades".to_string()
            }
        );
        assert_eq!(scenario.steps[1], Step::Back);
    }

    #[test]
    fn rejects_unknown_actions() {
        let err = Scenario::from_toml("[[step]]\naction = \"teleport\"\n")
            .expect_err("unknown action should fail");
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn replays_hybrid_session() {
        let scenario = Scenario::from_toml(HYBRID_SCRIPT).expect("scenario should parse");
        let mut lines = Vec::new();
        let reports = scenario
            .run(&Config::default(), |report| lines.push(report.to_string()))
            .await
            .expect("scenario should pass");

        assert_eq!(reports.len(), 5);
        assert_eq!(reports[1].outcomes, vec![SignalOutcome::Absorbed]);
        assert_eq!(reports[3].outcomes, vec![SignalOutcome::PassThrough]);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("current=grades"));
    }

    #[tokio::test]
    async fn failed_expectation_names_the_step() {
        let scenario = Scenario::from_toml(
            r#"
            [host]
            session_history = true

            [[step]]
            action = "navigate"
            page = "grades"

            [[step]]
            action = "expect"
            history = ["grades"]
            "#,
        )
        .expect("scenario should parse");

        let err = scenario
            .run(&Config::default(), |_| {})
            .await
            .expect_err("expectation should fail");
        assert!(matches!(err, AppError::Scenario { step: 2, .. }));
    }
}
