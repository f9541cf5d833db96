// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use chatrelay_client::{GatewayClient, Mode, Outcome, Renderer, SkipReason};
use clap::Parser;
use cli::{Cli, Commands};
use terminal::TerminalSink;

mod cli;
mod logging;
mod terminal;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Chat {
            prompt,
            stream,
            server,
        } => {
            let mode = if stream { Mode::Streaming } else { Mode::Buffered };
            chat(&server, &prompt, mode)?;
        }
    }

    Ok(())
}

fn chat(server: &str, prompt: &str, mode: Mode) -> Result<()> {
    let renderer = Renderer::new(GatewayClient::new(server)?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut sink = TerminalSink::new(std::io::stdout());
    let outcome = runtime.block_on(renderer.run(prompt, mode, &mut sink));
    sink.finish()?;

    match outcome {
        Outcome::Completed(_) => Ok(()),
        Outcome::Failed(message) => Err(Error::Custom(message)),
        Outcome::Skipped(SkipReason::EmptyPrompt) => {
            Err(Error::Custom("prompt is empty; nothing to send".into()))
        }
        Outcome::Skipped(SkipReason::InFlight) => {
            Err(Error::Custom("a request is already in flight".into()))
        }
    }
}
