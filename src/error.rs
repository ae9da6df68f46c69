use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    //a raw row could not be turned into a trade record (fatal to that row only)
    #[error("Malformed record at row {row}: field '{field}' {reason}")]
    MalformedRecord {
        row: usize,
        field: String,
        reason: String,
    },

    //no closed trades left after filtering
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    //a single ratio metric has no defined value for this dataset
    #[error("Metric '{metric}' is undefined: {reason}")]
    DivisionUndefined { metric: String, reason: String },
}

impl ReportError {
    pub fn malformed(row: usize, field: &str, reason: impl Into<String>) -> Self {
        ReportError::MalformedRecord {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn undefined(metric: &str, reason: impl Into<String>) -> Self {
        ReportError::DivisionUndefined {
            metric: metric.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
