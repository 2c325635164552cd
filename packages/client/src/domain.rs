//! Reconnection policy of the client, as pure functions.

use crate::error::ClientError;

/// Whether the error rules out any further connection attempt (e.g. a malformed server URL).
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Whether another connection attempt is allowed after `error`.
///
/// `current_attempt` counts the attempts already made in the current series.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Reconnection attempts already spent when `error` ended the session.
///
/// Losing a connection that had been established starts a fresh series of attempts.
pub fn attempts_spent(error: &ClientError, current_attempt: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 0,
        _ => current_attempt,
    }
}
