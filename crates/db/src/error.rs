//! Translation of database errors into application errors.
//!
//! Postgres reports constraint and privilege failures through SQLSTATE
//! codes. Those are the caller's fault and map to 4xx variants; everything
//! else stays a `Database` error whose details are only logged.

use assessoria_shared::AppError;
use sea_orm::{DbErr, RuntimeErr};

/// `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// `check_violation`.
pub const CHECK_VIOLATION: &str = "23514";
/// `insufficient_privilege`, raised by row-level security on writes.
pub const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Returns the SQLSTATE code carried by `err`, if any.
#[must_use]
pub fn sql_state(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(e) => e
            .as_database_error()
            .and_then(|d| d.code())
            .map(std::borrow::Cow::into_owned),
        _ => None,
    }
}

/// Classifies a database error.
#[must_use]
pub fn db_error(err: DbErr) -> AppError {
    if let DbErr::RecordNotFound(what) = &err {
        return AppError::NotFound(what.clone());
    }
    if matches!(err, DbErr::RecordNotUpdated) {
        return AppError::NotFound("record not found".to_string());
    }

    match sql_state(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict("record already exists".to_string()),
        Some(CHECK_VIOLATION) => {
            AppError::Validation("value rejected by a database constraint".to_string())
        }
        Some(INSUFFICIENT_PRIVILEGE) => {
            AppError::Forbidden("operation not permitted for this user".to_string())
        }
        _ => {
            tracing::error!(error = %err, "database error");
            AppError::Database(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err = db_error(DbErr::RecordNotFound("goal".to_string()));
        assert!(matches!(err, AppError::NotFound(ref m) if m == "goal"));
    }

    #[test]
    fn test_record_not_updated_maps_to_not_found() {
        assert!(matches!(
            db_error(DbErr::RecordNotUpdated),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_errors_without_sql_state_are_database_errors() {
        let err = DbErr::Custom("boom".to_string());
        assert_eq!(sql_state(&err), None);
        assert!(matches!(db_error(err), AppError::Database(_)));

        let internal = DbErr::Exec(RuntimeErr::Internal("closed".to_string()));
        assert_eq!(sql_state(&internal), None);
        assert_eq!(db_error(internal).status_code(), 500);
    }
}
