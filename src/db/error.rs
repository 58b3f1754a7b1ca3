use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    /// A write collided with a unique or check constraint, e.g. two
    /// concurrent schedule upserts for the same employee.
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        // Foreign-key and not-null failures stay internal errors.
        let constraint = err
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation() || db_err.is_check_violation())
            .and_then(|db_err| db_err.constraint())
            .map(str::to_string);

        match constraint {
            Some(name) => DatabaseError::ConstraintViolation(name),
            None => DatabaseError::Sqlx(err),
        }
    }
}
