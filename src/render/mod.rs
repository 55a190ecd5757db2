//! Turning message text into something to print.
//!
//! Renderers are called again and again with growing prefixes of the
//! same answer so they must cope with half-finished markup such as an
//! unclosed code fence or a dangling `**`.
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use crate::chat::{Message, Sender};

pub trait Renderer {
    fn render(&self, text: &str, sender: Sender) -> String;

    fn render_message(&self, msg: &Message) -> String {
        self.render(msg.text(), msg.sender())
    }
}

/// Prints text exactly as received.
#[derive(Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, text: &str, sender: Sender) -> String {
        match sender {
            Sender::User => format!("> {}", text),
            Sender::Bot => text.to_string(),
        }
    }
}

/// Markdown rendering for the terminal.
pub struct TerminalRenderer {
    skin: MadSkin,
    width: Option<usize>,
}

impl TerminalRenderer {
    /// `width` wraps output at a fixed column, `None` uses the
    /// terminal's width.
    pub fn new(width: Option<usize>) -> Self {
        let mut skin = MadSkin::default_dark();
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Blue);
        skin.bold.set_fg(Color::White);
        skin.inline_code.set_fg(Color::Yellow);
        skin.code_block.set_fg(Color::Yellow);

        Self { skin, width }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, text: &str, sender: Sender) -> String {
        match sender {
            // Questions are shown verbatim
            Sender::User => format!("> {}", text),
            Sender::Bot => self.skin.text(text, self.width).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = PlainRenderer;
        assert_eq!(renderer.render("**hi**", Sender::Bot), "**hi**");
        assert_eq!(renderer.render("question", Sender::User), "> question");
    }

    #[test]
    fn test_render_message_uses_sender() {
        let renderer = PlainRenderer;
        assert_eq!(renderer.render_message(&Message::user("q")), "> q");
    }

    #[test]
    fn test_terminal_renderer_keeps_words() {
        let renderer = TerminalRenderer::new(Some(80));
        let out = renderer.render("# Summary\n\nThe **answer** is here.", Sender::Bot);
        assert!(out.contains("Summary"));
        assert!(out.contains("answer"));
    }

    #[test]
    fn test_terminal_renderer_tolerates_partial_markup() {
        let renderer = TerminalRenderer::new(Some(80));
        let full = "Some **bold** text\n```rust\nfn main() {}\n```";
        // Every prefix renders, including ones cut mid-markup
        for (i, _) in full.char_indices() {
            let _ = renderer.render(&full[..i], Sender::Bot);
        }
        let out = renderer.render("Some **bol", Sender::Bot);
        assert!(out.contains("Some"));
    }

    #[test]
    fn test_terminal_renderer_user_verbatim() {
        let renderer = TerminalRenderer::new(Some(80));
        assert_eq!(renderer.render("**q**", Sender::User), "> **q**");
    }
}
