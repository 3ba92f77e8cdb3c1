use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::{ActionReply, BookingApi, Delivery, TransportError};
use crate::models::{BookingRecord, ReviewRecord};

pub struct HttpBookingApi {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    async fn read(&self, action: &str) -> anyhow::Result<ListReply> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("action", action)])
            .send()
            .await
            .with_context(|| format!("failed to call {action}"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{action} failed with HTTP {status}");
        }

        let reply: ListReply = resp
            .json()
            .await
            .with_context(|| format!("failed to parse {action} response"))?;

        if !reply.success {
            anyhow::bail!(
                "{action} failed: {}",
                reply.message.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(reply)
    }
}

#[derive(Deserialize)]
struct ListReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    bookings: Vec<BookingRecord>,
    #[serde(default)]
    reviews: Vec<ReviewRecord>,
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn fetch_bookings(&self) -> anyhow::Result<Vec<BookingRecord>> {
        Ok(self.read("get_bookings").await?.bookings)
    }

    async fn fetch_reviews(&self) -> anyhow::Result<Vec<ReviewRecord>> {
        Ok(self.read("get_reviews").await?.reviews)
    }

    async fn post_action(&self, body: serde_json::Value) -> Result<Delivery, TransportError> {
        // text/plain keeps the cross-origin POST free of a preflight
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body.to_string())
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            // Only a failed connect proves nothing was delivered.
            Err(e) if e.is_connect() => return Err(TransportError(e.to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "write failed after connecting, outcome unknown");
                return Ok(Delivery::Unreadable);
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "write answered with non-2xx status");
            return Ok(Delivery::Unreadable);
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read write response body");
                return Ok(Delivery::Unreadable);
            }
        };

        match serde_json::from_str::<ActionReply>(&text) {
            Ok(reply) => Ok(Delivery::Reply(reply)),
            Err(e) => {
                tracing::warn!(error = %e, "write response was not a JSON envelope");
                Ok(Delivery::Unreadable)
            }
        }
    }
}
