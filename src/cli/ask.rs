use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::view::{ConsoleView, run_exchange};
use crate::backend::HttpBackend;
use crate::chat::ChatSession;
use crate::core::AppConfig;

/// Asks a single question, streaming the answer to stdout.
pub async fn run(question: String, config: AppConfig) -> Result<()> {
    let backend = Arc::new(HttpBackend::new(&config.api_url));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ChatSession::builder(backend).events(tx).build();
    let mut view = ConsoleView::new(config.render_markdown);

    run_exchange(&session, &mut rx, &mut view, &question).await?;

    Ok(())
}
