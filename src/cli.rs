use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::agent::{SpotlightAgent, TurnEvent};
use crate::config;
use crate::library;
use crate::providers::MistralProvider;
use crate::session::SessionState;
use crate::skills::builtin_skills;
use crate::tools::registry::ToolCatalog;
use crate::tools::stats::MemoryStats;

#[derive(Parser)]
#[command(name = "lotus")]
#[command(about = "Lotus - music listening assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model to use, overrides config and environment
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the assistant a question about your listening
    Chat {
        /// The question to ask
        question: String,
    },
    /// List the tools the assistant can call
    Tools {
        /// Substring filter on tool name and description
        #[arg(long)]
        filter: Option<String>,
    },
    /// List the built-in skills
    Skills,
    /// Display version information
    Version,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chat { question } => run_chat(&question, cli.model, cli.config).await,
        Commands::Tools { filter } => {
            run_tools(filter.as_deref().unwrap_or(""));
            Ok(())
        }
        Commands::Skills => {
            run_skills();
            Ok(())
        }
        Commands::Version => {
            println!("lotus {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_chat(
    question: &str,
    cli_model: Option<String>,
    cli_config: Option<PathBuf>,
) -> Result<()> {
    let config = config::load_config(cli_model, cli_config)?;

    let Some(api_key) = config.api_key.filter(|k| !k.is_empty()) else {
        bail!(
            "No API key configured. Set LOTUS_API_KEY or MISTRAL_API_KEY, \
             or add api_key to ~/.lotus/config.json"
        );
    };

    let provider = MistralProvider::new(api_key, config.model)
        .context("Failed to initialize the Mistral provider")?;
    let agent = SpotlightAgent::new(Arc::new(provider), Arc::new(MemoryStats::new()));

    let mut session = SessionState::new();
    let ticket = session
        .begin_request(question)
        .context("Failed to start the request")?;

    let events = agent
        .run_turn(&mut session, &ticket)
        .await
        .context("The assistant turn failed")?;

    for event in events {
        match event {
            TurnEvent::ToolCall { name } => eprintln!("[tool] {}", name),
            TurnEvent::ToolResult { .. } => {}
            TurnEvent::Notice(notice) => eprintln!("[notice] {}", notice),
            TurnEvent::Text(text) => println!("{}", text),
        }
    }

    Ok(())
}

fn run_tools(filter: &str) {
    let catalog = ToolCatalog::new();
    let entries = library::library_entries(&catalog, filter);

    if entries.is_empty() {
        println!("No tools match '{}'", filter);
        return;
    }

    for entry in entries {
        let params = entry.parameter_preview();
        if params.is_empty() {
            println!("{:<20} {}", entry.name, entry.description);
        } else {
            println!("{:<20} {} ({})", entry.name, entry.description, params);
        }
    }
}

fn run_skills() {
    for profile in builtin_skills() {
        println!("{:<12} {}", profile.id, profile.label);
    }
}
