use std::io::{self, Write};

use indicatif::ProgressBar;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::{
    config::LooperConfig,
    looper::Looper,
    services::OpenAIChatHandler,
    theme::Theme,
    tools::ToolContext,
    types::LooperToInterfaceMessage,
    workspace::Workspace,
};

mod config;
mod error;
mod looper;
mod mapping;
mod prompt;
mod services;
mod session;
mod theme;
mod tools;
mod types;
mod workspace;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so they never mix with the conversation on stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("looper=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = LooperConfig::from_env()?;
    tracing::info!(model = %config.model, max_steps = config.max_steps, "starting looper");

    let (tx, mut rx) = mpsc::channel(10000);
    let tools = ToolContext::new(Workspace::current_process_dir()?, config.weather_url.clone());
    let handler = OpenAIChatHandler::new(&config);
    let looper = Looper::new(
        Box::new(handler),
        tools,
        tx.clone(),
        config.max_steps,
        config.transcript_limit,
    );

    let interface = tokio::spawn(async move {
        let theme = Theme::default();
        let mut spinner: Option<ProgressBar> = None;

        println!("{}", theme.greeting());
        print!("{}", theme.prompt());
        io::stdout().flush().ok();

        while let Some(message) = rx.recv().await {
            if let Some(sp) = spinner.take() {
                sp.finish_and_clear();
            }

            match message {
                LooperToInterfaceMessage::Thinking => {
                    spinner = Some(theme.thinking_spinner());
                }
                LooperToInterfaceMessage::ToolCall(name) => {
                    if let Some(line) = theme.render(&LooperToInterfaceMessage::ToolCall(name.clone())) {
                        println!("{line}");
                    }
                    spinner = Some(theme.tool_spinner(&name));
                }
                LooperToInterfaceMessage::TurnComplete => {
                    print!("{}", theme.prompt());
                    io::stdout().flush().ok();
                }
                other => {
                    if let Some(line) = theme.render(&other) {
                        println!("{line}");
                    }
                    if other == LooperToInterfaceMessage::Goodbye {
                        break;
                    }
                }
            }
        }
    });

    session::run(looper, io::stdin().lock(), tx).await?;
    interface.await?;

    Ok(())
}
