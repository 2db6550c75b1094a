use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Duplicate observation for date {0}")]
    DuplicateDate(NaiveDate),

    #[error("Timestamp {0} ms cannot be mapped to a calendar date")]
    InvalidTimestamp(f64),

    #[error("Window holds {len} observations but its capacity is {capacity}")]
    WindowOverflow { len: usize, capacity: usize },
}
