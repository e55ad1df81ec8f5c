mod history;

pub use history::HistoryItem;
