use thiserror::Error;

use crate::api::yahoo::ApiError;

/// Application errors
#[derive(Debug, Error)]
pub enum St13Error {
    #[error("Data provider error: {0}")]
    Api(#[from] ApiError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("No valid data remaining after cleaning")]
    NoValidData,
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract clean error message from provider error strings
///
/// Removes the error-chain prefixes like:
/// "Data provider error: Not Found: No data found, symbol may be delisted"
///
/// Returns only the meaningful error message:
/// "No data found, symbol may be delisted"
pub fn extract_clean_error(error_msg: &str) -> String {
    if error_msg.starts_with("Data provider error:") {
        // Find the last colon, everything after it is the actual error message
        if let Some(last_colon) = error_msg.rfind(": ") {
            error_msg[last_colon + 2..].trim().to_string()
        } else {
            error_msg.to_string()
        }
    } else {
        error_msg.to_string()
    }
}
