//! Unified service-layer error type
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`, `BoxError`)
//! and the API-layer error (`AppError`). It enables `?` propagation without manual
//! `.map_err(|e| { tracing::error!(...); AppError::new(...) })` boilerplate.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (sqlx, argon2, etc.)
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ErrorCode> for ServiceError {
    fn from(code: ErrorCode) -> Self {
        ServiceError::App(AppError::new(code))
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Postgres unique-violation check (SQLSTATE 23505)
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Postgres foreign-key-violation check (SQLSTATE 23503)
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

/// Report a unique violation as `code`; other errors stay database errors
pub fn on_unique_violation(e: sqlx::Error, code: ErrorCode) -> ServiceError {
    if is_unique_violation(&e) {
        ServiceError::App(AppError::new(code))
    } else {
        e.into()
    }
}

/// Report a foreign-key violation as `code`; other errors stay database errors
pub fn on_foreign_key_violation(e: sqlx::Error, code: ErrorCode) -> ServiceError {
    if is_foreign_key_violation(&e) {
        ServiceError::App(AppError::new(code))
    } else {
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    /// Postgres error carrying only a SQLSTATE
    #[derive(Debug, thiserror::Error)]
    #[error("sqlstate {0}")]
    struct SqlState(&'static str);

    impl sqlx::error::DatabaseError for SqlState {
        fn message(&self) -> &str {
            self.0
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    fn db_error(state: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(SqlState(state)))
    }

    fn app_code(err: ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    #[test]
    fn test_db_error_maps_to_internal() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err = ServiceError::from(ErrorCode::CategoryInUse);
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CategoryInUse);
    }

    #[test]
    fn test_constraint_violations_map_to_domain_codes() {
        assert!(is_foreign_key_violation(&db_error("23503")));
        assert!(is_unique_violation(&db_error("23505")));

        let err = on_foreign_key_violation(db_error("23503"), ErrorCode::CategoryInUse);
        assert_eq!(app_code(err), ErrorCode::CategoryInUse);

        let err = on_unique_violation(db_error("23505"), ErrorCode::EmailExists);
        assert_eq!(app_code(err), ErrorCode::EmailExists);
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        let err = on_foreign_key_violation(db_error("23505"), ErrorCode::CategoryInUse);
        assert_eq!(app_code(err), ErrorCode::InternalError);

        let err = on_unique_violation(db_error("40001"), ErrorCode::EmailExists);
        assert_eq!(app_code(err), ErrorCode::InternalError);
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
    }
}
