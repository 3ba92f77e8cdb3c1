pub mod cache;
pub mod calendar;
pub mod http;
pub mod sync;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{BookingRecord, ReviewRecord};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActionReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Reply(ActionReply),
    // Reply unreadable; the write may still have landed.
    Unreadable,
}

// Connection never established.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Rejected(String),

    #[error("response could not be read, refresh to check the result")]
    Unreadable,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClientError {
    fn from_delivery(delivery: Delivery) -> Result<(), ClientError> {
        match delivery {
            Delivery::Reply(reply) if reply.success => Ok(()),
            Delivery::Reply(reply) => Err(ClientError::Rejected(
                reply.message.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            Delivery::Unreadable => Err(ClientError::Unreadable),
        }
    }
}

#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn fetch_bookings(&self) -> anyhow::Result<Vec<BookingRecord>>;
    async fn fetch_reviews(&self) -> anyhow::Result<Vec<ReviewRecord>>;
    async fn post_action(&self, body: serde_json::Value) -> Result<Delivery, TransportError>;
}
