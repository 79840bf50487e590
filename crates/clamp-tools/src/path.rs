//! Safe substitution of caller-supplied values into request paths.

use crate::error::ToolError;

/// Validate `value` as one path segment and percent-encode it.
///
/// Separators and the `.` / `..` segments are refused: a URL parser would
/// otherwise resolve them and send the call to a different endpoint.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<String, ToolError> {
    let value = value.trim();
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\', '?', '#']) {
        return Err(ToolError::InvalidParameters(format!(
            "{field} must be a single path segment, got {value:?}"
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment_unchanged() {
        assert_eq!(path_segment("file_key", " Fp24FuzPwH0L74ODSrCnQo ").unwrap(), "Fp24FuzPwH0L74ODSrCnQo");
        assert_eq!(path_segment("id", "a-b_c.d~e").unwrap(), "a-b_c.d~e");
    }

    #[test]
    fn test_dot_segments_rejected() {
        for value in [".", "..", "", "  ", "../teams/1", "a/b", "a\\b", "a?b", "a#b"] {
            let err = path_segment("file_key", value).unwrap_err();
            assert!(matches!(err, ToolError::InvalidParameters(_)), "{value:?} accepted");
        }
    }

    #[test]
    fn test_encoded_dots_stay_literal() {
        assert_eq!(path_segment("file_key", "%2e%2e").unwrap(), "%252e%252e");
        assert_eq!(path_segment("id", "a b:c").unwrap(), "a%20b%3Ac");
    }
}
