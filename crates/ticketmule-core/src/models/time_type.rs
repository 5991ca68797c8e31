use serde::{Deserialize, Serialize};

/// One row of the time-type lookup table (e.g. "Billable", "Overtime").
/// The server returns them as an ordered list with no paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeType {
    pub id: i64,
    pub name: String,
}
