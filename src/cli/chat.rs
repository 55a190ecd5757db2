use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use super::view::{ConsoleView, run_exchange};
use crate::backend::HttpBackend;
use crate::chat::ChatSession;
use crate::core::AppConfig;

#[derive(Debug, PartialEq)]
enum ReplCommand<'a> {
    History,
    Exit,
    Ask(&'a str),
}

fn parse_line(line: &str) -> ReplCommand<'_> {
    match line.trim() {
        "/history" => ReplCommand::History,
        "/exit" | "/quit" => ReplCommand::Exit,
        _ => ReplCommand::Ask(line),
    }
}

pub async fn run(config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let backend = Arc::new(HttpBackend::new(&config.api_url));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ChatSession::builder(backend).events(tx).build();
    let mut view = ConsoleView::new(config.render_markdown);
    view.print_header();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => match parse_line(&line) {
                ReplCommand::History => view.print_history(&session.transcript()),
                ReplCommand::Exit => break,
                ReplCommand::Ask(text) => {
                    if !text.trim().is_empty() {
                        let _ = rl.add_history_entry(text);
                    }
                    run_exchange(&session, &mut rx, &mut view, text).await?;
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
