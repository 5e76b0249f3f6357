//! Collection and id validation.

use autoop_error::{AutoopResult, DatabaseError, DatabaseErrorKind};

/// Check that `key` can be used as a collection name or entry id.
///
/// Keys become single path segments in storage, so they must be non-empty,
/// must not be `.` or `..`, must not contain `/`, `\` or NUL, and must not
/// start with `.` (reserved for in-flight storage writes).
///
/// ```
/// use autoop_database::validate_key;
///
/// assert!(validate_key("artifacts").is_ok());
/// assert!(validate_key("../etc").unwrap_err().is_invalid_path());
/// ```
pub fn validate_key(key: &str) -> AutoopResult<()> {
    let reason = if key.is_empty() {
        Some("must not be empty")
    } else if key.starts_with('.') {
        Some("must not start with '.'")
    } else if key.contains(['/', '\\', '\0']) {
        Some("must not contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DatabaseError::new(DatabaseErrorKind::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        })
        .into()),
        None => Ok(()),
    }
}
