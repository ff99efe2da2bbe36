//! Error handling and exit codes.

use bitchain_core::constants::exit_codes;
use bitchain_core::ChainError;

/// Map an evaluation error to the process exit code.
pub fn handle_error(err: &ChainError) -> i32 {
    match err {
        ChainError::InvalidInput(_) => exit_codes::ERROR_GENERIC,
        ChainError::OutOfMemory { .. } => exit_codes::ERROR_OUT_OF_MEMORY,
        ChainError::Config(_) => exit_codes::ERROR_CONFIG,
        ChainError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(handle_error(&ChainError::InvalidInput("n".into())), 1);
        assert_eq!(handle_error(&ChainError::Mismatch { max_diff: 1.0 }), 3);
        assert_eq!(handle_error(&ChainError::Config("bad".into())), 4);
        assert_eq!(handle_error(&ChainError::OutOfMemory { bytes: 8 }), 5);
    }
}
