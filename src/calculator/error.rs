//! Calculation error kinds
//!
//! Every failure the request path can produce, with its HTTP mapping.

use hyper::StatusCode;
use thiserror::Error;

/// Generic message returned to clients for unanticipated faults.
pub const INTERNAL_ERROR_MSG: &str = "Internal server error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// An operand is missing, non-numeric, or not finite
    #[error("Invalid numbers provided")]
    InvalidInput,

    /// Divisor is zero on the divide endpoint
    #[error("Division by zero")]
    DivisionByZero,

    /// Anything validation did not produce; the detail is for the log only
    #[error("Unhandled fault: {0}")]
    Unhandled(String),
}

impl CalcError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::DivisionByZero => StatusCode::BAD_REQUEST,
            Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response envelope
    pub fn client_message(&self) -> String {
        match self {
            Self::Unhandled(_) => INTERNAL_ERROR_MSG.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(CalcError::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(CalcError::DivisionByZero.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CalcError::InvalidInput.client_message(),
            "Invalid numbers provided"
        );
        assert_eq!(CalcError::DivisionByZero.client_message(), "Division by zero");
    }

    #[test]
    fn test_unhandled_hides_detail_from_client() {
        let err = CalcError::Unhandled("worker exploded".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.to_string().contains("worker exploded"));
    }
}
