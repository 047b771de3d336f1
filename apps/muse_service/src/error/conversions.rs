use super::*;

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Validation(err) => AppError::Validation(err),
            other => AppError::History(other),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("History task failed: {}", err))
    }
}

impl From<String> for ConfigError {
    fn from(error: String) -> Self {
        ConfigError::Invalid(error)
    }
}
