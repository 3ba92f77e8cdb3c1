use chrono::NaiveDate;
use serde_json::json;

use super::cache::{BookingCache, SnapshotStore};
use super::{BookingApi, ClientError, Delivery};
use crate::models::{format_date, normalize_mobile, BookingRecord, BookingStatus, PaymentStatus, ReviewRecord};

#[derive(Debug, Clone)]
pub struct BookingForm {
    pub full_name: String,
    pub mobile: String,
    pub location: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { message: String },
    Unconfirmed,
    TransportFailed { error: String },
}

impl SubmitOutcome {
    pub fn user_message(&self) -> String {
        match self {
            SubmitOutcome::Accepted => "Booking Successful!".to_string(),
            SubmitOutcome::Rejected { message } => format!("Booking failed: {message}"),
            SubmitOutcome::Unconfirmed => {
                "Booking request sent! If the date does not show as booked, please refresh.".to_string()
            }
            SubmitOutcome::TransportFailed { error } => {
                format!("Could not reach the booking service ({error}). Please try again.")
            }
        }
    }
}

pub struct SyncClient<A, S> {
    api: A,
    store: S,
    cache: BookingCache,
}

impl<A: BookingApi, S: SnapshotStore> SyncClient<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            cache: BookingCache::default(),
        }
    }

    pub fn cache(&self) -> &BookingCache {
        &self.cache
    }

    pub fn load_cached(&mut self) -> bool {
        match self.store.load() {
            Ok(Some(bookings)) => {
                self.cache.replace(bookings);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable booking snapshot");
                false
            }
        }
    }

    pub async fn refresh(&mut self) -> anyhow::Result<()> {
        let bookings = self.api.fetch_bookings().await?;
        if let Err(e) = self.store.save(&bookings) {
            tracing::warn!(error = %e, "failed to persist booking snapshot");
        }
        self.cache.replace(bookings);
        Ok(())
    }

    pub async fn start<F>(&mut self, mut render: F) -> anyhow::Result<()>
    where
        F: FnMut(&BookingCache),
    {
        if self.load_cached() {
            render(&self.cache);
        }
        let refreshed = self.refresh().await;
        if let Err(e) = &refreshed {
            tracing::warn!(error = %e, "booking refresh failed, showing cached data");
        }
        render(&self.cache);
        refreshed
    }

    pub async fn submit_booking(&mut self, form: &BookingForm) -> SubmitOutcome {
        let body = json!({
            "action": "book",
            "booked_date": format_date(form.date),
            "full_name": form.full_name,
            "mo_number": form.mobile,
            "location": form.location,
        });

        let outcome = match self.api.post_action(body).await {
            Ok(Delivery::Reply(reply)) if reply.success => SubmitOutcome::Accepted,
            Ok(Delivery::Reply(reply)) => SubmitOutcome::Rejected {
                message: reply.message.unwrap_or_else(|| "Unknown error".to_string()),
            },
            Ok(Delivery::Unreadable) => SubmitOutcome::Unconfirmed,
            Err(e) => SubmitOutcome::TransportFailed { error: e.0 },
        };

        if matches!(outcome, SubmitOutcome::Accepted | SubmitOutcome::Unconfirmed) {
            self.cache.apply_optimistic(form.date, &form.full_name);
        }
        tracing::info!(date = %form.date, outcome = ?outcome, "booking submitted");
        outcome
    }

    pub async fn update_booking(
        &self,
        date: NaiveDate,
        status: Option<BookingStatus>,
        payment: Option<PaymentStatus>,
        admin_notes: Option<&str>,
    ) -> Result<(), ClientError> {
        let mut body = json!({ "action": "update_booking", "booked_date": format_date(date) });
        if let Some(status) = status {
            body["status"] = json!(status.as_str());
        }
        if let Some(payment) = payment {
            body["payment_status"] = json!(payment.as_str());
        }
        if let Some(notes) = admin_notes {
            body["admin_notes"] = json!(notes);
        }
        ClientError::from_delivery(self.api.post_action(body).await?)
    }

    pub async fn toggle_payment(&self, record: &BookingRecord) -> Result<PaymentStatus, ClientError> {
        let date = record_date(record)?;
        let next = match PaymentStatus::parse(&record.payment_status) {
            Some(PaymentStatus::Paid) => PaymentStatus::Pending,
            _ => PaymentStatus::Paid,
        };
        self.update_booking(date, None, Some(next), None).await?;
        Ok(next)
    }

    pub async fn toggle_status(&self, record: &BookingRecord) -> Result<BookingStatus, ClientError> {
        let date = record_date(record)?;
        let next = match BookingStatus::parse(&record.status) {
            Some(BookingStatus::Confirmed) => BookingStatus::Pending,
            _ => BookingStatus::Confirmed,
        };
        self.update_booking(date, Some(next), None, None).await?;
        Ok(next)
    }

    pub async fn verify_reviewer(&mut self, mobile: &str) -> anyhow::Result<Option<String>> {
        self.refresh().await?;
        let wanted = normalize_mobile(mobile);
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .cache
            .bookings()
            .iter()
            .find(|b| normalize_mobile(&b.mo_number) == wanted && b.is_review_eligible())
            .map(|b| b.full_name.clone()))
    }

    pub async fn submit_review(&self, mobile: &str, review: &str, rating: u8) -> Result<(), ClientError> {
        let body = json!({
            "action": "add_review",
            "mobile": mobile.trim(),
            "review": review,
            "rating": rating,
        });
        ClientError::from_delivery(self.api.post_action(body).await?)
    }

    pub async fn reviews(&self) -> anyhow::Result<Vec<ReviewRecord>> {
        self.api.fetch_reviews().await
    }
}

fn record_date(record: &BookingRecord) -> Result<NaiveDate, ClientError> {
    record
        .date()
        .ok_or_else(|| ClientError::Rejected(format!("Invalid booked_date: {}", record.booked_date)))
}

pub fn sorted_for_admin(bookings: &[BookingRecord]) -> Vec<BookingRecord> {
    let mut out = bookings.to_vec();
    out.sort_by(|a, b| b.date().cmp(&a.date()));
    out
}
