use crate::util::error::SourceError;
use log::debug;
use std::{fs, io, path::Path, str::FromStr};

/// Read a value from a sysfs file with consistent error handling
///
/// # Arguments
///
/// * `path` - The file path to read from
///
/// # Returns
///
/// Returns the trimmed contents of the file as a String
///
/// # Errors
///
/// Returns a `SourceError` variant based on the specific error:
/// - `SourceError::PermissionDenied` if permission is denied
/// - `SourceError::PathMissing` if the path doesn't exist
/// - `SourceError::ReadError` for other I/O errors
pub fn read_sysfs_string(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let p = path.as_ref();
    fs::read_to_string(p)
        .map_err(|e| {
            let error_msg = format!("Path: {:?}, Error: {}", p.display(), e);
            match e.kind() {
                io::ErrorKind::PermissionDenied => SourceError::PermissionDenied(error_msg),
                io::ErrorKind::NotFound => {
                    SourceError::PathMissing(format!("Path '{}' does not exist", p.display()))
                }
                _ => SourceError::ReadError(error_msg),
            }
        })
        .map(|s| s.trim().to_string())
}

/// Read a sysfs file and parse its trimmed contents into `T`
///
/// Empty files are reported as `SourceError::ParseError`.
pub fn read_sysfs_value<T: FromStr>(path: impl AsRef<Path>) -> Result<T, SourceError> {
    let p = path.as_ref();
    let content = read_sysfs_string(p)?;
    content.parse::<T>().map_err(|_| {
        SourceError::ParseError(format!(
            "Could not parse '{}' from {:?}",
            content,
            p.display()
        ))
    })
}

/// Read a file holding a single integer.
///
/// Any failure (missing, unreadable, empty, non-numeric) is `None`.
pub fn read_scalar_file(path: impl AsRef<Path>) -> Option<i64> {
    match read_sysfs_value::<i64>(path.as_ref()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Scalar source unavailable: {e}");
            None
        }
    }
}
