//! History item representing one past calculation, ready for display.

use crate::calculator::{Formatter, ellipsis};
use crate::history::HistoryEntry;

/// A history row as shown in the history panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItem {
    /// Unique identifier for this item.
    pub id: String,
    /// Position in the history list, oldest first.
    pub index: usize,
    /// The expression, shortened and with operator glyphs.
    pub expression: String,
    /// The result with operator glyphs (exponents keep their sign).
    pub display_result: String,
    /// The result without separators, for the clipboard.
    pub clipboard_result: String,
}

impl HistoryItem {
    /// Create a history item from a stored entry.
    pub fn from_entry(
        index: usize,
        entry: &HistoryEntry,
        formatter: &dyn Formatter,
        max_width: usize,
    ) -> Self {
        let expression = ellipsis(
            &formatter.format_number_in_expression(&formatter.strip_grouping(&entry.expression)),
            max_width,
        );

        Self {
            id: format!("history-{index}"),
            index,
            expression: formatter.to_display_symbols(&expression),
            display_result: formatter.to_display_symbols(&entry.result),
            clipboard_result: formatter.strip_grouping(&entry.result),
        }
    }

    /// Get the text to copy to clipboard.
    pub fn text_for_clipboard(&self) -> &str {
        &self.clipboard_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{ELLIPSIS_WIDTH, LocaleFormatter};

    #[test]
    fn test_short_entry() {
        let f = LocaleFormatter::default();
        let item = HistoryItem::from_entry(
            2,
            &HistoryEntry::new("1,500*2", "3,000"),
            &f,
            ELLIPSIS_WIDTH,
        );
        assert_eq!(item.id, "history-2");
        assert_eq!(item.expression, "1,500×2");
        assert_eq!(item.display_result, "3,000");
        assert_eq!(item.text_for_clipboard(), "3000");
    }

    #[test]
    fn test_long_entry_is_shortened() {
        let f = LocaleFormatter::default();
        let entry = HistoryEntry::new("1,234,567*8,901,234/567,890", "19,350,233.62");
        let item = HistoryItem::from_entry(0, &entry, &f, ELLIPSIS_WIDTH);
        assert_eq!(item.expression, "1,234,56...÷567,890");
    }
}
