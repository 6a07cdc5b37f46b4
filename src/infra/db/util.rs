use crate::application::repos::RepoError;

const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.message().starts_with(UNIQUE_PREFIX) =>
        {
            let constraint = db
                .constraint()
                .map(str::to_string)
                .or_else(|| {
                    db.message()
                        .strip_prefix(UNIQUE_PREFIX)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "unknown".to_string());
            RepoError::Duplicate { constraint }
        }
        sqlx::Error::Database(db) if db.message().contains("database is locked") => {
            RepoError::Timeout
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        other => RepoError::from_persistence(other),
    }
}
