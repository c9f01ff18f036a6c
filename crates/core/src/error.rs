/// Errors raised while interpreting user-supplied values for the data contracts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid task status '{0}': expected one of todo, in_progress, done")]
    InvalidStatus(String),

    #[error("Invalid log date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),
}
