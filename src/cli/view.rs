//! Console output for a running session.
//!
//! Increments are printed raw as they arrive. On a terminal with
//! markdown enabled, the raw answer is then erased and printed again
//! formatted. Escape codes are only ever written to a terminal.
use std::io::{IsTerminal, Write, stdout};

use anyhow::{Error, Result};
use termimad::crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{self, Clear, ClearType},
};
use tokio::sync::mpsc;

use crate::chat::{ChatSession, Sender, SessionEvent, Status, Transcript};
use crate::render::{PlainRenderer, Renderer, TerminalRenderer};

const TITLE: &str = "Local PDF Chatbot";
const SUBTITLE: &str = "Ask questions about your document";
const PENDING: &str = "Bot is thinking...";

#[derive(Debug, PartialEq)]
enum Delta<'a> {
    Append(&'a str),
    Replace(&'a str),
}

/// What to print to get from `shown` to `text`.
fn delta<'a>(shown: &str, text: &'a str) -> Delta<'a> {
    match text.strip_prefix(shown) {
        Some(rest) => Delta::Append(rest),
        None => Delta::Replace(text),
    }
}

/// Terminal rows taken up by `printed` when wrapped at `cols`. Counts
/// chars, so wide glyphs can make this an underestimate.
fn rows_used(printed: &str, cols: usize) -> usize {
    let cols = cols.max(1);
    printed
        .split('\n')
        .map(|line| line.chars().count().div_ceil(cols).max(1))
        .sum()
}

pub struct ConsoleView {
    /// Current text of the answer being streamed
    shown: String,
    /// Everything written for the current answer, for erasing it later
    printed: String,
    pending: bool,
    markdown: Option<TerminalRenderer>,
    terminal: bool,
}

impl ConsoleView {
    pub fn new(render_markdown: bool) -> Self {
        Self::with_terminal(render_markdown, stdout().is_terminal())
    }

    fn with_terminal(render_markdown: bool, terminal: bool) -> Self {
        Self {
            shown: String::new(),
            printed: String::new(),
            pending: false,
            markdown: render_markdown.then(TerminalRenderer::default),
            terminal,
        }
    }

    pub fn print_header(&self) {
        println!("{}\n{}\n", TITLE, SUBTITLE);
    }

    /// Updates the console for one event. `pending` is whether the
    /// session is waiting on the first text of the answer.
    pub fn handle(
        &mut self,
        event: &SessionEvent,
        pending: bool,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        match event {
            SessionEvent::Appended { message, .. } if message.is_bot() => {
                self.shown.clear();
                self.printed.clear();
            }
            SessionEvent::Appended { .. } => {}
            SessionEvent::StatusChanged(Status::Busy) => {
                if pending && self.terminal {
                    write!(out, "{}", PENDING)?;
                    self.pending = true;
                }
            }
            SessionEvent::Updated { message, .. } => {
                self.clear_pending(out)?;
                let text = message.text();
                match delta(&self.shown, text) {
                    Delta::Append(rest) => {
                        write!(out, "{}", rest)?;
                        self.printed.push_str(rest);
                    }
                    Delta::Replace(text) => {
                        write!(out, "\n{}", text)?;
                        self.printed.push('\n');
                        self.printed.push_str(text);
                    }
                }
                self.shown = text.to_string();
            }
            SessionEvent::StatusChanged(Status::Idle) => {
                self.clear_pending(out)?;
                writeln!(out)?;
                self.render_final(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn clear_pending(&mut self, out: &mut impl Write) -> Result<(), Error> {
        if self.pending {
            write!(out, "\r")?;
            queue!(out, Clear(ClearType::CurrentLine))?;
            self.pending = false;
        }
        Ok(())
    }

    /// Replaces the raw answer with its markdown rendering.
    fn render_final(&mut self, out: &mut impl Write) -> Result<(), Error> {
        let Some(renderer) = &self.markdown else {
            return Ok(());
        };
        if !self.terminal || self.shown.is_empty() {
            return Ok(());
        }

        let cols = terminal::size().map(|(cols, _)| cols as usize).unwrap_or(80);
        let rows = rows_used(&self.printed, cols);
        queue!(
            out,
            MoveToPreviousLine(rows as u16),
            Clear(ClearType::FromCursorDown)
        )?;
        writeln!(out, "{}", renderer.render(&self.shown, Sender::Bot))?;
        Ok(())
    }

    /// Prints the full transcript, formatted when markdown is enabled
    /// and stdout is a terminal.
    pub fn print_history(&self, transcript: &Transcript) {
        match &self.markdown {
            Some(renderer) if self.terminal => print_transcript(renderer, transcript),
            _ => print_transcript(&PlainRenderer, transcript),
        }
    }
}

fn print_transcript(renderer: &impl Renderer, transcript: &Transcript) {
    for msg in transcript.iter() {
        println!("{}\n", renderer.render_message(msg));
    }
}

/// Runs one exchange for `text`, updating `view` as events arrive.
/// Does nothing when the session doesn't admit the submission.
pub async fn run_exchange(
    session: &ChatSession,
    rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    view: &mut ConsoleView,
    text: &str,
) -> Result<(), Error> {
    let Some(exchange) = session.begin(text) else {
        return Ok(());
    };
    let handle = tokio::spawn(exchange.run());

    let mut out = stdout();
    while let Some(event) = rx.recv().await {
        view.handle(&event, session.show_pending_indicator(), &mut out)?;
        if event == SessionEvent::StatusChanged(Status::Idle) {
            break;
        }
    }

    let outcome = handle.await?;
    tracing::debug!("Exchange outcome: {:?}", outcome);
    Ok(())
}
