use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod ask;
pub mod chat;
pub mod status;
mod view;

use crate::core::{AppConfig, logging};

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session about the document
    Chat {},
    /// Ask a single question and print the answer
    Ask {
        #[arg(long)]
        question: String,
    },
    /// Check that the backend is running
    Status {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base address of the chat backend, overrides DOCCHAT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    logging::init();

    let config = AppConfig::default().with_api_url(args.api_url);

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) => {
            chat::run(config).await?;
        }
        Some(Command::Ask { question }) => {
            ask::run(question, config).await?;
        }
        Some(Command::Status {}) => {
            status::run(config).await?;
        }
        None => {}
    }

    Ok(())
}
