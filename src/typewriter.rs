//! Character-by-character reveal of the current article excerpt.
use std::sync::Arc;

/// Reveal progress over one piece of text.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: Arc<str>,
    /// Byte offset of the end of the revealed prefix; always a char boundary.
    revealed: usize,
}

impl Typewriter {
    pub fn new(text: Arc<str>) -> Self {
        Self { text, revealed: 0 }
    }

    /// Start over with new text. Same text restarts the animation too.
    pub fn restart(&mut self, text: Arc<str>) {
        self.text = text;
        self.revealed = 0;
    }

    /// Reveal one more character. Returns false once everything is shown.
    pub fn step(&mut self) -> bool {
        match self.text[self.revealed..].chars().next() {
            Some(c) => {
                self.revealed += c.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Show the whole text immediately.
    pub fn finish(&mut self) {
        self.revealed = self.text.len();
    }

    pub fn visible(&self) -> &str {
        &self.text[..self.revealed]
    }

    pub fn is_complete(&self) -> bool {
        self.revealed == self.text.len()
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Arc::from(""))
    }
}
