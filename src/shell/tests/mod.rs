mod hybrid_session;

use crate::config::Config;
use crate::page::PageId;
use crate::shell::Shell;
use crate::sim::SimulatedHost;

fn start(host: &SimulatedHost) -> Shell {
    let mut host = host.clone();
    Shell::start(&Config::default(), &mut host).expect("shell should start")
}

fn pages(shell: &Shell) -> Vec<String> {
    shell
        .coordinator()
        .history()
        .iter()
        .map(PageId::as_str)
        .map(str::to_string)
        .collect()
}
