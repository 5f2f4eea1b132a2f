use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum WardenError {
    #[error("username '{0}' is already taken")]
    ConstraintViolation(String),

    #[error("no account matches '{0}'")]
    NotFound(String),

    /// Unknown username and wrong password both land here.
    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("this action requires the admin role")]
    Forbidden,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("account store unavailable: {0}")]
    StoreUnavailable(#[source] SqlxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WardenError {
    /// Whether the menu loop should keep running after reporting this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WardenError::Io(_))
    }
}

impl From<SqlxError> for WardenError {
    fn from(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                // SQLite reports "UNIQUE constraint failed: users.username"
                WardenError::ConstraintViolation(db_err.message().to_string())
            }
            _ => WardenError::StoreUnavailable(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_a_store_error() {
        let err: WardenError = SqlxError::RowNotFound.into();
        assert!(matches!(err, WardenError::StoreUnavailable(_)));
    }

    #[test]
    fn only_io_errors_end_the_session() {
        assert!(WardenError::AuthenticationFailure.is_recoverable());
        assert!(WardenError::StoreUnavailable(SqlxError::PoolClosed).is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!WardenError::from(io).is_recoverable());
    }
}
