//! Activity report row

use serde::{Deserialize, Serialize};

/// One row of the activity report. Dates are preformatted `YYYY-MM-DD`
/// (empty when absent), estimation is in 8-hour workdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Assignee")]
    pub assignee: String,
    #[serde(rename = "Created")]
    pub created: String,
    #[serde(rename = "Started")]
    pub started: String,
    #[serde(rename = "Estimation")]
    pub estimation: f64,
    #[serde(rename = "Resolved")]
    pub resolved: String,
}

impl ReportRow {
    pub const HEADER: [&'static str; 8] = [
        "ID",
        "Title",
        "URL",
        "Assignee",
        "Created",
        "Started",
        "Estimation",
        "Resolved",
    ];

    /// CSV fields in header order. Title and Assignee are always wrapped in
    /// quotes, with embedded quotes doubled; the remaining fields never
    /// contain the delimiter.
    pub fn csv_record(&self) -> [String; 8] {
        [
            self.id.clone(),
            quote(&self.title),
            self.url.clone(),
            quote(&self.assignee),
            self.created.clone(),
            self.started.clone(),
            self.estimation.to_string(),
            self.resolved.clone(),
        ]
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
