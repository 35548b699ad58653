use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Workbook error: {source}")]
    WorkbookError {
        #[from]
        source: calamine::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Project table unavailable: {0}")]
    TableUnavailable(String),

    #[error("Malformed goals: {0}")]
    MalformedGoals(String),

    #[error("Goal store error: {0}")]
    GoalStoreError(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

/// How a failure is recovered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The table or goal source could not be reached or read. Render defaults or
    /// the "no data" state with a visible warning.
    SourceUnreachable,
    /// Content was reachable but not in the expected shape.
    ParseFailure,
    NotFound,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::IoError { .. }
            | EngineError::WorkbookError { .. }
            | EngineError::TableUnavailable(_) => ErrorKind::SourceUnreachable,
            EngineError::CsvSystemError { source } => {
                if source.is_io_error() {
                    ErrorKind::SourceUnreachable
                } else {
                    ErrorKind::ParseFailure
                }
            }
            EngineError::JsonError { .. } | EngineError::MalformedGoals(_) => ErrorKind::ParseFailure,
            EngineError::ProjectNotFound(_) => ErrorKind::NotFound,
            EngineError::ConfigError(_)
            | EngineError::GoalStoreError(_)
            | EngineError::ProcessingError(_)
            | EngineError::AnyhowError(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_source_unreachable() {
        let err = EngineError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.kind(), ErrorKind::SourceUnreachable);
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_goal_shape_errors_are_parse_failures() {
        let err = EngineError::MalformedGoals("negative sales goal".into());
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(EngineError::from(json_err).kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let err = EngineError::ProjectNotFound("9999".into());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Project not found: 9999");
    }
}
