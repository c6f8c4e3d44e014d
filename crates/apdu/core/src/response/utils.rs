//! Utility functions for APDU response handling

use tracing::debug;

use crate::response::error::ResponseError;
use crate::response::status::StatusWord;

/// Extract status word as a StatusWord object and payload from raw APDU response data
///
/// # Errors
/// Returns an error if the data is too short to contain a valid status word.
pub fn extract_status_and_payload(data: &[u8]) -> Result<(StatusWord, &[u8]), ResponseError> {
    if data.len() < 2 {
        debug!("Response too short: {} bytes", data.len());
        return Err(ResponseError::Incomplete);
    }

    let (payload, sw) = data.split_at(data.len() - 2);
    Ok((StatusWord::new(sw[0], sw[1]), payload))
}
