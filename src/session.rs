use std::io::BufRead;

use anyhow::Result;
use tokio::sync::mpsc::Sender;

use crate::{looper::Looper, types::LooperToInterfaceMessage};

const EXIT_TOKENS: [&str; 5] = ["exit", "quit", "bye", "exit()", "quit()"];
const HELP_TOKENS: [&str; 2] = ["help", "?"];

#[derive(Debug, PartialEq, Eq)]
pub enum SessionInput<'a> {
    Exit,
    Help,
    Query(&'a str),
}

pub fn classify(line: &str) -> SessionInput<'_> {
    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();

    if EXIT_TOKENS.contains(&lowered.as_str()) {
        SessionInput::Exit
    } else if HELP_TOKENS.contains(&lowered.as_str()) {
        SessionInput::Help
    } else {
        SessionInput::Query(trimmed)
    }
}

/// Read lines until an exit token or end of input, forwarding every query
/// to the looper.
pub async fn run<R: BufRead>(
    mut looper: Looper,
    mut input: R,
    interface: Sender<LooperToInterfaceMessage>,
) -> Result<()> {
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            interface.send(LooperToInterfaceMessage::Goodbye).await?;
            return Ok(());
        }

        match classify(&line) {
            SessionInput::Exit => {
                interface.send(LooperToInterfaceMessage::Goodbye).await?;
                return Ok(());
            }
            SessionInput::Help => {
                interface.send(LooperToInterfaceMessage::Help).await?;
                interface.send(LooperToInterfaceMessage::TurnComplete).await?;
            }
            SessionInput::Query(query) => {
                tracing::debug!(%query, "new query");
                let report = looper.send(query).await?;
                tracing::debug!(outcome = ?report.outcome, steps = report.steps_used, "query report");
            }
        }
    }
}
