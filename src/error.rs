use rusqlite::ffi;
use thiserror::Error;

/// Convenience alias for library results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the records store and the seeder.
///
/// Absence of a row is never an error here: queries against unknown names
/// return empty results or `None`. The variants below cover genuine faults.
#[derive(Debug, Error)]
pub enum Error {
    /// A unique index or check constraint rejected a row (duplicate email,
    /// duplicate name, grade value out of range).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A foreign key referenced a parent row that does not exist.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Seeding parameters are unusable (min above max, empty counts,
    /// more subjects requested than the name pool provides).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other SQLite failure, passed through unchanged.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    /// Classify a raw SQLite error by its extended result code.
    ///
    /// Foreign-key failures become [`Error::Integrity`]; unique, check,
    /// not-null and primary-key failures become [`Error::ConstraintViolation`].
    /// Everything else stays a plain SQLite error.
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref msg) = err {
            let detail = msg.clone().unwrap_or_else(|| code.to_string());
            return match code.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Error::Integrity(detail),
                ffi::SQLITE_CONSTRAINT_UNIQUE
                | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                | ffi::SQLITE_CONSTRAINT_CHECK
                | ffi::SQLITE_CONSTRAINT_NOTNULL => Error::ConstraintViolation(detail),
                _ => Error::Sqlite(err),
            };
        }
        Error::Sqlite(err)
    }
}
