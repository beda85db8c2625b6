use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Custom error type for database operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Error that occurs during database interactions (e.g., SQL query failure).
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// Configuration error (e.g., invalid database URL or missing parameters).
    #[error("Configuration error: {0}")]
    Config(String),
    /// Connection error (e.g., issues with network or database connection).
    #[error("Connection error: {0}")]
    Connection(String),
    /// General error with a custom message.
    #[error("Error: {0}")]
    General(String),
}

/// Stable category of an engine failure, derived from the MySQL server
/// error number rather than the human-readable message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A unique or primary key constraint rejected a duplicate value.
    UniqueViolation,
    /// A foreign key constraint blocked the statement.
    ForeignKeyViolation,
    Other,
}

impl DbError {
    /// Classifies the underlying engine error, if any.
    pub fn kind(&self) -> ErrorKind {
        if let DbError::Sqlx(sqlx::Error::Database(db)) = self {
            if let Some(mysql) = db.try_downcast_ref::<MySqlDatabaseError>() {
                return match mysql.number() {
                    // ER_DUP_ENTRY, ER_DUP_ENTRY_WITH_KEY_NAME
                    1062 | 1586 => ErrorKind::UniqueViolation,
                    // ER_ROW_IS_REFERENCED_2, ER_NO_REFERENCED_ROW_2
                    1451 | 1452 => ErrorKind::ForeignKeyViolation,
                    _ => ErrorKind::Other,
                };
            }
        }
        ErrorKind::Other
    }
}

/// Invalid column combinations caught when a descriptor is built, before
/// anything reaches the differ or the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate column `{0}` in descriptor")]
    DuplicateColumn(String),
    #[error("multiple primary key columns: `{0}` and `{1}`")]
    MultiplePrimaryKeys(String, String),
    #[error("column `{column}`: AUTO_INCREMENT requires an integer type, got `{data_type}`")]
    AutoIncrementNotInteger { column: String, data_type: String },
    #[error("column `{0}`: a primary key column cannot carry a DEFAULT")]
    DefaultOnPrimary(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_engine_errors_classify_as_other() {
        assert_eq!(DbError::Sqlx(sqlx::Error::RowNotFound).kind(), ErrorKind::Other);
        assert_eq!(DbError::Connection("refused".into()).kind(), ErrorKind::Other);
        assert_eq!(DbError::General("boom".into()).kind(), ErrorKind::Other);
    }
}
