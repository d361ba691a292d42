pub mod atomic_file;
pub mod csv_parser;
pub mod derived;
pub mod history_store;

pub use derived::with_derived_fields;
pub use history_store::{merge_bars, HistoryStore};
