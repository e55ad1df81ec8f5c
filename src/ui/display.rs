//! Calculator display rendering.
//!
//! Renders the display area as plain text lines:
//! - The previous expression, muted, above the input
//! - The input with grouped digits, followed by the pending `)` hint
//! - The result with a "= " prefix

use crate::session::CalculatorSession;

/// The text content of the display area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLines {
    /// Shown above the input line; `None` when there is nothing to show.
    pub previous: Option<String>,
    pub input: String,
    /// Closing parentheses `=` would add.
    pub paren_hint: String,
    pub result: String,
}

impl DisplayLines {
    /// Render as text, one line per display row.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        if let Some(previous) = &self.previous {
            lines.push(format!("  {previous}"));
        }
        lines.push(format!("> {}{}", self.input, self.paren_hint));
        lines.push(format!("= {}", self.result));
        lines.join("\n")
    }
}

/// Read the display content from a session.
pub fn render_display(session: &CalculatorSession) -> DisplayLines {
    let previous = session.previous_expression();

    DisplayLines {
        previous: (!previous.is_empty()).then_some(previous),
        input: session.display_expression(),
        paren_hint: session.paren_hint(),
        result: session.result_display(),
    }
}
