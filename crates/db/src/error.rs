use taxonomy_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error onto the domain error taxonomy.
///
/// - Unique violations on `uq_*` constraints become `Conflict`.
/// - Foreign key violations become `Conflict` (a referenced row vanished).
/// - Everything else is logged and becomes `Internal` with a generic message.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return CoreError::Conflict(conflict_message(constraint));
                }
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::Conflict("Referenced record no longer exists".into());
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    CoreError::Internal("Database operation failed".into())
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_categories_parent_name" => {
            "A category with this name already exists under this parent".into()
        }
        "uq_users_email" => "User with this email already exists".into(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}
