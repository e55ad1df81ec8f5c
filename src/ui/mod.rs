//! Presentation state for a terminal front end.
//!
//! Nothing here is needed by the calculator core; it only reads the
//! session's display accessors and forwards history actions.

pub mod display;
pub mod history_panel;

pub use display::{DisplayLines, render_display};
pub use history_panel::{HistoryAction, HistoryPanel};

use crate::session::CalculatorSession;

/// Everything the terminal front end shows.
#[derive(Clone, Debug, Default)]
pub struct CalculatorView {
    pub history_panel: HistoryPanel,
}

impl CalculatorView {
    pub fn new(ellipsis_width: usize) -> Self {
        Self {
            history_panel: HistoryPanel::new(ellipsis_width),
        }
    }

    /// Render the display, followed by the history panel when it is open.
    pub fn render(&self, session: &CalculatorSession) -> String {
        let mut text = render_display(session).to_text();
        if self.history_panel.is_open() {
            let rows = self.history_panel.render(session);
            text.push_str("\n--- history ---");
            if rows.is_empty() {
                text.push_str("\n  (empty)");
            }
            for row in rows {
                text.push('\n');
                text.push_str(&row);
            }
        }
        text
    }
}
