pub mod exam;
pub mod outcome;
pub mod search;

pub use exam::ExamConfig;
pub use outcome::{BatchLedger, BatchSummary, ItemOutcome, UnresolvedReason};
pub use search::{SearchQuery, SearchResult};
