/// All server-assigned identifiers are positive integers.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar day with no time component (`log_date`).
pub type LogDate = chrono::NaiveDate;
