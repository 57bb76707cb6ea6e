//! csv-analyst - ask questions about a CSV file in plain English
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use csv_analyst::core::ProviderType;
use csv_analyst::{api, Agent, Config, Repl, Transcript};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// csv-analyst - ask questions about a CSV file in plain English
#[derive(Parser, Debug)]
#[command(name = "csv-analyst")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// CSV file to analyze
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Model name
    #[arg(long, short = 'm', global = true)]
    model: Option<String>,

    /// Model provider (openai or ollama)
    #[arg(long, global = true)]
    provider: Option<ProviderType>,

    /// Enable debug output
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Single prompt mode (non-interactive, chat only)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

impl Args {
    /// Reject flag combinations clap cannot express
    fn check(&self) -> Result<(), clap::Error> {
        if self.prompt.is_some() && matches!(self.command, Some(Command::Serve { .. })) {
            return Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                "--prompt cannot be used with serve",
            ));
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat in the terminal (default)
    Chat,
    /// Serve the REST API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Err(e) = args.check() {
        e.exit();
    }

    // Build configuration
    let (mut config, config_warning) = Config::load_checked();

    // Apply CLI overrides
    if let Some(ref data) = args.data {
        config.dataset.path = data.clone();
    }

    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }

    if let Some(provider) = args.provider {
        config.llm.provider = provider;
    }

    if args.debug {
        config.agent.debug = true;
    }

    if let Some(Command::Serve { ref host, port }) = args.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = port;
        }
    }

    init_logging(config.agent.debug);
    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    config.validate()?;
    info!(
        data = %config.dataset.path.display(),
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Loaded configuration"
    );

    let agent = Arc::new(
        Agent::from_config(&config)
            .with_context(|| format!("Failed to start agent for {}", config.dataset.path.display()))?,
    );

    match args.command {
        Some(Command::Serve { .. }) => {
            api::serve(&config, agent).await?;
        }
        Some(Command::Chat) | None => {
            // Single prompt mode
            if let Some(prompt) = args.prompt {
                let response = agent.respond(&prompt, &mut Transcript::new()).await?;
                println!("{}", response);
                return Ok(());
            }

            // Interactive REPL mode
            let mut repl = Repl::new(agent);
            repl.run().await?;
        }
    }

    Ok(())
}

/// Log to stderr so answers on stdout stay clean
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "csv_analyst=debug,tower_http=debug"
    } else {
        "csv_analyst=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
