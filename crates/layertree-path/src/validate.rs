//! Validation functions for layer tree paths.

use crate::util::is_valid_index;
use crate::PathError;

/// Maximum allowed path depth.
pub const MAX_PATH_LENGTH: usize = 64;

/// Maximum allowed length of a formatted path or menu key.
const MAX_KEY_LENGTH: usize = 1024;

/// Validate a path (sequence of indices).
///
/// # Errors
///
/// Returns [`PathError::PathTooLong`] if the path is deeper than
/// [`MAX_PATH_LENGTH`].
///
/// # Example
///
/// ```
/// use layertree_path::validate_path;
///
/// validate_path(&[0, 1, 2]).unwrap();
/// validate_path(&vec![0; 100]).unwrap_err();
/// ```
pub fn validate_path(path: &[usize]) -> Result<(), PathError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(PathError::PathTooLong);
    }
    Ok(())
}

/// Validate a slash-separated path string such as `0/3/1`.
///
/// The empty string is the root path and is valid.
///
/// # Errors
///
/// - [`PathError::InvalidKey`] if the string is too long
/// - [`PathError::InvalidIndex`] if a step is not a canonical non-negative integer
/// - [`PathError::PathTooLong`] if there are too many steps
pub fn validate_path_str(path: &str) -> Result<(), PathError> {
    if path.len() > MAX_KEY_LENGTH {
        return Err(PathError::InvalidKey);
    }
    if path.is_empty() {
        return Ok(());
    }
    let mut depth = 0;
    for step in path.split('/') {
        if !is_valid_index(step) {
            return Err(PathError::InvalidIndex);
        }
        depth += 1;
    }
    if depth > MAX_PATH_LENGTH {
        return Err(PathError::PathTooLong);
    }
    Ok(())
}
