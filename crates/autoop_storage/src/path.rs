//! Logical storage path handling.

use autoop_error::{AutoopError, AutoopResult, StorageError, StorageErrorKind};

/// Normalize a logical storage path.
///
/// Empty and `.` segments are dropped, `..` removes the preceding segment.
/// A leading `/` is relative to the storage root, not the filesystem root.
/// The result is `/`-joined and may be empty, meaning the root itself.
///
/// # Errors
///
/// `StorageErrorKind::InvalidPath` if a `..` would climb above the root, or
/// the path contains a backslash, a NUL byte, or a drive prefix.
///
/// # Examples
///
/// ```
/// use autoop_storage::normalize;
///
/// assert_eq!(normalize("models/./v1/../a.bin").unwrap(), "models/a.bin");
/// assert_eq!(normalize("/models").unwrap(), "models");
/// assert!(normalize("../outside").is_err());
/// ```
pub fn normalize(path: &str) -> AutoopResult<String> {
    if path.contains('\\') || path.contains('\0') {
        return Err(invalid(path));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    return Err(invalid(path));
                }
            }
            s if s.len() == 2 && s.ends_with(':') && segments.is_empty() => {
                return Err(invalid(path));
            }
            s => segments.push(s),
        }
    }

    Ok(segments.join("/"))
}

/// Join logical path parts with `/`, skipping empty parts.
///
/// ```
/// use autoop_storage::join;
///
/// assert_eq!(join(&["", "artifacts", "m1"]), "artifacts/m1");
/// ```
pub fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

#[track_caller]
fn invalid(path: &str) -> AutoopError {
    StorageError::new(StorageErrorKind::InvalidPath(path.to_string())).into()
}
