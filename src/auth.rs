use crate::error::ReportError;
use subtle::ConstantTimeEq;

/// Check an upload secret against the configured one
///
/// Comparison time depends only on the lengths of the inputs, not on where
/// they first differ.
///
/// # Arguments
/// * `configured` - Secret from the configuration; None disables uploads
/// * `provided` - Secret submitted with the upload form
///
/// # Returns
/// * `Result<(), ReportError>` - `UploadDisabled` when no secret is configured,
///   `Unauthorized` when the secrets differ
///
/// # Examples
/// ```
/// use heads_up::auth::verify_upload_secret;
///
/// assert!(verify_upload_secret(Some("s3cret"), "s3cret").is_ok());
/// assert!(verify_upload_secret(Some("s3cret"), "guess").is_err());
/// assert!(verify_upload_secret(None, "anything").is_err());
/// ```
pub fn verify_upload_secret(configured: Option<&str>, provided: &str) -> Result<(), ReportError> {
    let configured = configured.ok_or(ReportError::UploadDisabled)?;
    if ct_eq(configured.as_bytes(), provided.trim().as_bytes()) {
        Ok(())
    } else {
        Err(ReportError::Unauthorized)
    }
}

/// Constant-time byte slice equality.
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}
