use serde::de::IgnoredAny;

use crate::error::AppError;

/// Decides what a provider response means for the caller.
///
/// The body has already been read as text. A successful JSON body is handed
/// back untouched, so the caller receives the provider's exact bytes.
pub fn interpret(status: u16, text: String) -> Result<String, AppError> {
    if !(200..300).contains(&status) {
        return Err(AppError::Upstream {
            status,
            details: text,
        });
    }

    match serde_json::from_str::<IgnoredAny>(&text) {
        Ok(_) => Ok(text),
        Err(_) => Err(AppError::NonJsonPayload { details: text }),
    }
}
