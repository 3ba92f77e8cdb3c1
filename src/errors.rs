use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const NOT_ELIGIBLE_MESSAGE: &str =
    "You can only leave a review if you have a Confirmed Booking and Payment is Done.";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Date already booked")]
    DateAlreadyBooked,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("{}", NOT_ELIGIBLE_MESSAGE)]
    NotEligible,

    #[error("Invalid action")]
    InvalidAction,

    #[error("{0}")]
    MalformedRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> Self {
        ServiceError::Storage(e.into())
    }
}

impl ServiceError {
    pub fn message(&self) -> String {
        match self {
            ServiceError::Storage(_) => "Internal error, please try again".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Storage(e) = &self {
            tracing::error!(error = %e, "storage failure");
        }

        // Every outcome is HTTP 200; callers branch on `success`.
        let body = serde_json::json!({ "success": false, "message": self.message() });
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_text() {
        assert_eq!(ServiceError::DateAlreadyBooked.to_string(), "Date already booked");
        assert_eq!(ServiceError::BookingNotFound.to_string(), "Booking not found");
        assert_eq!(ServiceError::InvalidAction.to_string(), "Invalid action");
        assert_eq!(ServiceError::NotEligible.to_string(), NOT_ELIGIBLE_MESSAGE);
    }

    #[test]
    fn test_storage_message_is_generic() {
        let err = ServiceError::Storage(anyhow::anyhow!("disk I/O error"));
        assert!(!err.message().contains("disk"));
    }

    #[tokio::test]
    async fn test_into_response_is_ok_with_envelope() {
        let res = ServiceError::BookingNotFound.into_response();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Booking not found");
    }
}
