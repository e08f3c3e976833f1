//! Multipart parsing for the scan endpoint

use crate::constants::UNKNOWN_FILENAME;
use crate::error::HttpAppError;
use axum::extract::Multipart;
use scanvault_core::models::ScanRequest;
use scanvault_core::AppError;

const USERNAME_FIELD: &str = "username";
const FILE_FIELD: &str = "file";

/// Read the `username` text field and the `file` part into a [`ScanRequest`].
///
/// Each field may appear once. Unknown fields are skipped. The filename comes from the file
/// part and defaults to `"unknown"`.
pub async fn extract_scan_request(mut multipart: Multipart) -> Result<ScanRequest, HttpAppError> {
    let mut username: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            USERNAME_FIELD => {
                if username.is_some() {
                    return Err(duplicate_field(USERNAME_FIELD));
                }
                username = Some(field.text().await?);
            }
            FILE_FIELD => {
                if file.is_some() {
                    return Err(duplicate_field(FILE_FIELD));
                }
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(UNKNOWN_FILENAME)
                    .to_string();
                let data = field.bytes().await?;
                file = Some((filename, data.to_vec()));
            }
            _ => {
                tracing::debug!(field = %field_name, "Ignoring unexpected multipart field");
            }
        }
    }

    let username = username
        .ok_or_else(|| AppError::InvalidInput("Missing username".to_string()))?;
    let (filename, content) =
        file.ok_or_else(|| AppError::InvalidInput("Missing file".to_string()))?;

    Ok(ScanRequest::new(username, filename, content))
}

fn duplicate_field(name: &str) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Multiple '{}' fields are not allowed; send exactly one",
        name
    )))
}
