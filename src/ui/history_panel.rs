//! History panel state.
//!
//! Tracks whether the panel is open and which row is selected. It only
//! reads the session to build its rows; actions on the selected row call
//! the session's reuse and delete operations.

use crate::calculator::ELLIPSIS_WIDTH;
use crate::history::HistoryError;
use crate::items::HistoryItem;
use crate::session::CalculatorSession;

/// What to do with the selected history row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    ReuseExpression,
    ReuseResult,
    Delete,
}

#[derive(Clone, Debug)]
pub struct HistoryPanel {
    open: bool,
    selected_index: Option<usize>,
    max_width: usize,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new(ELLIPSIS_WIDTH)
    }
}

impl HistoryPanel {
    pub fn new(max_width: usize) -> Self {
        Self {
            open: false,
            selected_index: None,
            max_width,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Get selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Set selected index, ignoring indices past the end of the history.
    pub fn set_selected(&mut self, index: usize, session: &CalculatorSession) {
        if index < session.history().len() {
            self.selected_index = Some(index);
        }
    }

    pub fn select_next(&mut self, session: &CalculatorSession) {
        let len = session.history().len();
        self.selected_index = match self.selected_index {
            _ if len == 0 => None,
            Some(i) => Some((i + 1).min(len - 1)),
            None => Some(0),
        };
    }

    pub fn select_prev(&mut self, session: &CalculatorSession) {
        let len = session.history().len();
        self.selected_index = match self.selected_index {
            _ if len == 0 => None,
            Some(i) => Some(i.saturating_sub(1).min(len - 1)),
            None => Some(len - 1),
        };
    }

    /// Display rows for the whole history, oldest first.
    pub fn items(&self, session: &CalculatorSession) -> Vec<HistoryItem> {
        session
            .history()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                HistoryItem::from_entry(index, entry, session.formatter(), self.max_width)
            })
            .collect()
    }

    /// Render the panel as text lines, marking the selected row.
    pub fn render(&self, session: &CalculatorSession) -> Vec<String> {
        self.items(session)
            .iter()
            .map(|item| {
                let marker = if self.selected_index == Some(item.index) {
                    '>'
                } else {
                    ' '
                };
                format!(
                    "{marker} [{}] {} = {}",
                    item.index, item.expression, item.display_result
                )
            })
            .collect()
    }

    /// Apply an action to the selected row. Reusing an entry closes the panel.
    pub fn confirm(
        &mut self,
        action: HistoryAction,
        session: &mut CalculatorSession,
    ) -> Result<(), HistoryError> {
        let index = self.selected_index.unwrap_or(0);
        match action {
            HistoryAction::ReuseExpression => {
                session.reuse_expression(index)?;
                self.close();
            }
            HistoryAction::ReuseResult => {
                session.reuse_result(index)?;
                self.close();
            }
            HistoryAction::Delete => {
                session.delete_history(index)?;
                let len = session.history().len();
                self.selected_index = self
                    .selected_index
                    .filter(|_| len > 0)
                    .map(|i| i.min(len - 1));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{FastevalEvaluator, LocaleFormatter, MAX_DIGIT_RUN};
    use crate::history::{HistoryEntry, HistoryStore, MemoryBackend};

    fn session_with(entries: Vec<HistoryEntry>) -> CalculatorSession {
        CalculatorSession::new(
            Box::new(FastevalEvaluator),
            Box::new(LocaleFormatter::default()),
            HistoryStore::load(Box::new(MemoryBackend::with_entries(entries))),
            MAX_DIGIT_RUN,
        )
    }

    fn three_entries() -> CalculatorSession {
        session_with(vec![
            HistoryEntry::new("1+1", "2"),
            HistoryEntry::new("2*2", "4"),
            HistoryEntry::new("9-10", "-1"),
        ])
    }

    #[test]
    fn test_toggle() {
        let mut panel = HistoryPanel::default();
        assert!(!panel.is_open());
        panel.toggle();
        assert!(panel.is_open());
        panel.toggle();
        assert!(!panel.is_open());
    }

    #[test]
    fn test_selection_is_clamped() {
        let s = three_entries();
        let mut panel = HistoryPanel::default();

        panel.select_prev(&s);
        assert_eq!(panel.selected_index(), Some(2));
        panel.select_next(&s);
        assert_eq!(panel.selected_index(), Some(2));
        panel.set_selected(0, &s);
        panel.select_prev(&s);
        assert_eq!(panel.selected_index(), Some(0));
        panel.set_selected(7, &s);
        assert_eq!(panel.selected_index(), Some(0));
    }

    #[test]
    fn test_empty_history_has_no_selection() {
        let s = session_with(Vec::new());
        let mut panel = HistoryPanel::default();
        panel.select_next(&s);
        assert_eq!(panel.selected_index(), None);
        assert!(panel.render(&s).is_empty());
    }

    #[test]
    fn test_render_marks_selection() {
        let s = three_entries();
        let mut panel = HistoryPanel::default();
        panel.set_selected(1, &s);
        assert_eq!(
            panel.render(&s),
            vec![
                "  [0] 1+1 = 2".to_string(),
                "> [1] 2×2 = 4".to_string(),
                "  [2] 9-10 = -1".to_string(),
            ]
        );
    }

    #[test]
    fn test_confirm_reuse_closes_panel() {
        let mut s = three_entries();
        let mut panel = HistoryPanel::default();
        panel.toggle();
        panel.set_selected(2, &s);

        panel.confirm(HistoryAction::ReuseResult, &mut s).unwrap();
        assert_eq!(s.raw_expression(), "(-1)");
        assert!(!panel.is_open());

        panel.confirm(HistoryAction::ReuseExpression, &mut s).unwrap();
        assert_eq!(s.raw_expression(), "9-10");
    }

    #[test]
    fn test_confirm_delete_moves_selection() {
        let mut s = three_entries();
        let mut panel = HistoryPanel::default();
        panel.set_selected(2, &s);

        panel.confirm(HistoryAction::Delete, &mut s).unwrap();
        assert_eq!(s.history().len(), 2);
        assert_eq!(panel.selected_index(), Some(1));
    }
}
