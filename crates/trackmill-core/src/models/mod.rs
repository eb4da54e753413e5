pub mod changelog;
pub mod fields;
pub mod issue;
pub mod report;

pub use changelog::ChangelogEntry;
pub use fields::{FieldValue, Fields};
pub use issue::{Assignee, HistoryChange, Issue, Link};
pub use report::ReportRow;
