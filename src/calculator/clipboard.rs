//! Clipboard functionality for copying calculator results.

use arboard::Clipboard;

use super::evaluation::EvaluationResult;
use super::format::Formatter;

/// The text copied for a result: the raw number, without separators.
///
/// Returns `None` for the error sentinel, which is not worth copying.
pub fn clipboard_text(result: &EvaluationResult, formatter: &dyn Formatter) -> Option<String> {
    match result {
        EvaluationResult::Value(evaluated) => Some(formatter.strip_grouping(&evaluated.display)),
        EvaluationResult::Error => None,
    }
}

/// Copy a result to the system clipboard.
///
/// Returns the copied text on success, or an error message on failure.
pub fn copy_result(result: &EvaluationResult, formatter: &dyn Formatter) -> Result<String, String> {
    let text = clipboard_text(result, formatter)
        .ok_or_else(|| "Nothing to copy: the last evaluation failed".to_string())?;

    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;
    clipboard
        .set_text(text.clone())
        .map_err(|e| format!("Failed to copy to clipboard: {}", e))?;

    Ok(text)
}
