use std::path::PathBuf;

use clap::Parser;

use navshell::config::Config;
use navshell::error::AppResult;
use navshell::scenario::Scenario;

/// Replay a navigation scenario against a simulated host.
#[derive(Debug, Parser)]
#[command(name = "navshell", version)]
struct Cli {
    /// Scenario file (TOML).
    scenario: PathBuf,

    /// Config file; defaults to the standard lookup.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let scenario = Scenario::load(&cli.scenario)?;

    let reports = scenario
        .run(&config, |report| println!("{report}"))
        .await?;
    log::info!("{} steps passed", reports.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn accepts_scenario_with_optional_config() {
        let cli = Cli::try_parse_from(["navshell", "session.toml"]).expect("path should parse");
        assert_eq!(cli.scenario, PathBuf::from("session.toml"));
        assert_eq!(cli.config, None);

        let cli = Cli::try_parse_from(["navshell", "session.toml", "--config", "nav.toml"])
            .expect("config flag should parse");
        assert_eq!(cli.config, Some(PathBuf::from("nav.toml")));
    }

    #[test]
    fn rejects_missing_or_extra_args() {
        assert!(Cli::try_parse_from(["navshell"]).is_err());
        assert!(Cli::try_parse_from(["navshell", "a.toml", "b.toml"]).is_err());
    }
}
