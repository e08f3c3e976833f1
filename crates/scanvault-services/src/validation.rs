//! Request preconditions checked before any pipeline step runs.

use scanvault_core::models::ScanRequest;
use scanvault_core::AppError;

/// Longest filename accepted, in bytes.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Reject oversized content with `PayloadTooLarge`.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large (max {} bytes)",
            max_size
        )));
    }
    Ok(())
}

/// Filenames become part of the storage key, so path separators and the `.`/`..` names are
/// refused. Any other name, dots included, is kept as sent.
pub fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::InvalidInput("Filename is required".to_string()));
    }
    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Filename exceeds {} bytes",
            MAX_FILENAME_LENGTH
        )));
    }
    if filename.contains('/') || filename.contains('\\') || is_dot_name(filename) {
        return Err(AppError::InvalidInput(
            "Filename must not contain path separators or be '.' or '..'".to_string(),
        ));
    }
    if filename.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(
            "Filename contains control characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_identity(identity: &str) -> Result<(), AppError> {
    if identity.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing username".to_string()));
    }
    if identity.contains('/') || identity.contains('\\') || is_dot_name(identity) {
        return Err(AppError::InvalidInput(
            "Username must not contain path separators or be '.' or '..'".to_string(),
        ));
    }
    Ok(())
}

fn is_dot_name(name: &str) -> bool {
    name == "." || name == ".."
}

/// All preconditions of a scan request.
pub fn validate_scan_request(request: &ScanRequest, max_size: usize) -> Result<(), AppError> {
    validate_identity(&request.identity)?;
    if request.content.is_empty() {
        return Err(AppError::InvalidInput("Missing file".to_string()));
    }
    validate_file_size(request.content.len(), max_size)?;
    validate_filename(&request.filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_boundary() {
        assert!(validate_file_size(2_097_152, 2_097_152).is_ok());
        let err = validate_file_size(2_097_153, 2_097_152).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn filename_rules() {
        assert!(validate_filename("report.pdf").is_ok());
        assert!(validate_filename("unknown").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
        assert!(validate_filename("../secret").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("report.").is_ok());
        assert!(validate_filename("v1..2.txt").is_ok());
        assert!(validate_filename("a/b.txt").is_err());
        assert!(validate_filename("a\\b.txt").is_err());
        assert!(validate_filename("bad\nname").is_err());
        assert!(validate_filename(&"x".repeat(256)).is_err());
        assert!(validate_filename(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn identity_rules() {
        assert!(validate_identity("alice").is_ok());
        assert!(validate_identity("bob..smith").is_ok());
        assert!(validate_identity("..").is_err());
        assert!(validate_identity(".").is_err());
        assert!(validate_identity("a/b").is_err());
        assert!(validate_identity("a\\b").is_err());
    }

    #[test]
    fn request_preconditions() {
        let ok = ScanRequest::new("alice", "a.txt", b"data".to_vec());
        assert!(validate_scan_request(&ok, 10).is_ok());

        let no_identity = ScanRequest::new("  ", "a.txt", b"data".to_vec());
        assert!(validate_scan_request(&no_identity, 10).is_err());

        let no_content = ScanRequest::new("alice", "a.txt", Vec::new());
        assert!(validate_scan_request(&no_content, 10).is_err());

        let too_big = ScanRequest::new("alice", "a.txt", vec![0u8; 11]);
        assert!(matches!(
            validate_scan_request(&too_big, 10),
            Err(AppError::PayloadTooLarge(_))
        ));
    }
}
