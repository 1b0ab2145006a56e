/// Error types for the palm yield pipeline
use thiserror::Error;

/// Main error type for pipeline operations.
///
/// None of these failures are transient; callers surface them instead of
/// retrying or substituting a default value.
#[derive(Error, Debug)]
pub enum PalmError {
    /// A required year has no records
    #[error("No records found for year {0}")]
    MissingYear(i32),

    /// Percent change requested against a zero base
    #[error("Cannot compute change for {metric}: previous value is zero")]
    DivisionByZero { metric: String },

    /// Scenario projection lookup miss
    #[error("No {scenario} projection for {year}-{month:02}")]
    RecordNotFound {
        scenario: String,
        year: i32,
        month: u32,
    },

    /// Feature vector shape disagrees with what a model expects
    #[error("Schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    /// Unknown scenario identifier
    #[error("Unknown scenario: {0}")]
    InvalidScenario(String),

    /// Selector outside its allowed range
    #[error("{field} {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A column needed for a feature is absent from the source row
    #[error("Column {column} is missing from {source_name} data")]
    MissingColumn {
        column: &'static str,
        source_name: String,
    },

    /// An operation that needs at least one record received none
    #[error("No records to {0}")]
    EmptyInput(&'static str),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to read a data or model file
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON model file or payload could not be encoded or decoded
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Backing table store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using PalmError
pub type Result<T> = std::result::Result<T, PalmError>;

impl PalmError {
    /// Range check helper shared by the month/year selectors.
    pub fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
        if value < min || value > max {
            return Err(PalmError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PalmError;

    #[test]
    fn check_range_is_inclusive() {
        assert!(PalmError::check_range("month", 1, 1, 12).is_ok());
        assert!(PalmError::check_range("month", 12, 1, 12).is_ok());
        assert!(matches!(
            PalmError::check_range("month", 13, 1, 12),
            Err(PalmError::OutOfRange { value: 13, .. })
        ));
    }

    #[test]
    fn messages_name_the_failing_key() {
        let err = PalmError::RecordNotFound {
            scenario: "SSP245".to_string(),
            year: 2031,
            month: 4,
        };
        assert_eq!(err.to_string(), "No SSP245 projection for 2031-04");
        assert_eq!(
            PalmError::MissingYear(2019).to_string(),
            "No records found for year 2019"
        );
    }
}
