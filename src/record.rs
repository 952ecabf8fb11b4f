use std::fmt;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

/// Stand-in for a field that is absent or reads "N/A" on a successfully fetched page.
pub const MISSING_SENTINEL: &str = "0";

/// Maximum number of characters of an error description kept in a record's status.
pub const MAX_ERROR_CHARS: usize = 80;

/// Column headers shared by the printed table and the exported files.
pub const COLUMN_HEADERS: [&str; 5] = [
    "Website",
    "Est. Reach",
    "Est. Impressions",
    "Monthly Visitors",
    "Status",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Ok,
    Error(String),
}

impl RecordStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, RecordStatus::Error(_))
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Ok => f.write_str("OK"),
            RecordStatus::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The three values pulled out of a provider page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficFields {
    pub estimated_reach: String,
    pub estimated_impressions: String,
    pub monthly_visitors: String,
}

/// Outcome of one extraction. Fields are private so a record is either a
/// success with every value present or a failure with every value absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficRecord {
    #[serde(rename = "Website")]
    website: String,
    #[serde(rename = "Est. Reach")]
    estimated_reach: Option<String>,
    #[serde(rename = "Est. Impressions")]
    estimated_impressions: Option<String>,
    #[serde(rename = "Monthly Visitors")]
    monthly_visitors: Option<String>,
    #[serde(rename = "Status")]
    status: RecordStatus,
}

impl TrafficRecord {
    pub fn success(website: impl Into<String>, fields: TrafficFields) -> Self {
        Self {
            website: website.into(),
            estimated_reach: Some(fields.estimated_reach),
            estimated_impressions: Some(fields.estimated_impressions),
            monthly_visitors: Some(fields.monthly_visitors),
            status: RecordStatus::Ok,
        }
    }

    pub fn failure(website: impl Into<String>, error: &dyn fmt::Display) -> Self {
        Self {
            website: website.into(),
            estimated_reach: None,
            estimated_impressions: None,
            monthly_visitors: None,
            status: RecordStatus::Error(crate::utils::truncate_chars(
                &error.to_string(),
                MAX_ERROR_CHARS,
            )),
        }
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn estimated_reach(&self) -> Option<&str> {
        self.estimated_reach.as_deref()
    }

    pub fn estimated_impressions(&self) -> Option<&str> {
        self.estimated_impressions.as_deref()
    }

    pub fn monthly_visitors(&self) -> Option<&str> {
        self.monthly_visitors.as_deref()
    }

    pub fn status(&self) -> &RecordStatus {
        &self.status
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    /// Row cells in `COLUMN_HEADERS` order; missing values render empty.
    pub fn cells(&self) -> [String; 5] {
        [
            self.website.clone(),
            self.estimated_reach.clone().unwrap_or_default(),
            self.estimated_impressions.clone().unwrap_or_default(),
            self.monthly_visitors.clone().unwrap_or_default(),
            self.status.to_string(),
        ]
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub records: Vec<TrafficRecord>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl BatchReport {
    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }
}
