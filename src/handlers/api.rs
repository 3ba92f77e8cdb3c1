use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::errors::ServiceError;
use crate::models::{BookingRecord, ReviewRecord};
use crate::services::booking::{self, BookingUpdate, NewBooking};
use crate::services::review;
use crate::state::AppState;

type ApiResult = Result<Json<Value>, ServiceError>;

// GET /api?action=...
#[derive(Debug, Deserialize)]
pub struct ReadQuery {
    pub action: Option<String>,
    pub mobile: Option<String>,
    pub name: Option<String>,
}

pub async fn read_action(State(state): State<Arc<AppState>>, Query(query): Query<ReadQuery>) -> ApiResult {
    let tz = state.config.tz_offset;

    match query.action.as_deref() {
        Some("get_bookings") => {
            let bookings = {
                let db = state.conn()?;
                booking::list_bookings(&db, &tz)?
            };
            let records: Vec<BookingRecord> = bookings.iter().map(|b| b.to_record()).collect();
            Ok(Json(json!({ "success": true, "bookings": records })))
        }
        Some("get_reviews") => {
            let reviews = {
                let db = state.conn()?;
                review::list_reviews(&db)?
            };
            let records: Vec<ReviewRecord> = reviews.iter().map(|r| r.to_record()).collect();
            Ok(Json(json!({ "success": true, "reviews": records })))
        }
        Some("find_bookings") => {
            let mobile = query.mobile.as_deref().unwrap_or("");
            let name = query.name.as_deref().unwrap_or("");
            let bookings = {
                let db = state.conn()?;
                booking::find_bookings(&db, &tz, mobile, name)?
            };
            let records: Vec<BookingRecord> = bookings.iter().map(|b| b.to_record()).collect();
            Ok(Json(json!({ "success": true, "bookings": records })))
        }
        _ => Err(ServiceError::InvalidAction),
    }
}

// POST /api
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mo_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub booked_date: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub booked_date: String,
    #[serde(default, deserialize_with = "lenient_present_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_present_string")]
    pub payment_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_present_string")]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub review: String,
    #[serde(default)]
    pub rating: Option<Value>,
}

// Cross-origin browsers post JSON as text/plain.
pub async fn write_action(State(state): State<Arc<AppState>>, body: String) -> ApiResult {
    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| ServiceError::MalformedRequest(format!("Malformed request body: {e}")))?;

    let action = payload
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let tz = state.config.tz_offset;

    match action.as_str() {
        "book" => {
            let req: BookRequest = parse_payload(payload)?;
            let input = NewBooking {
                full_name: req.full_name,
                mobile: req.mo_number,
                location: req.location,
                booked_date: req.booked_date,
            };
            let db = state.conn()?;
            booking::create_booking(&db, &tz, &input)?;
            Ok(Json(json!({ "success": true, "message": "Booking Created" })))
        }
        "update_booking" => {
            let req: UpdateBookingRequest = parse_payload(payload)?;
            let update = BookingUpdate {
                status: req.status,
                payment_status: req.payment_status,
                admin_notes: req.admin_notes,
            };
            let db = state.conn()?;
            booking::update_booking(&db, &tz, &req.booked_date, &update)?;
            Ok(Json(json!({ "success": true, "message": "Updated" })))
        }
        "add_review" => {
            let req: AddReviewRequest = parse_payload(payload)?;
            let rating = coerce_rating(req.rating.as_ref());
            let db = state.conn()?;
            review::add_review(&db, &tz, &req.mobile, &req.review, rating)?;
            Ok(Json(json!({ "success": true, "message": "Review Added Successfully!" })))
        }
        _ => Err(ServiceError::InvalidAction),
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, ServiceError> {
    serde_json::from_value(payload)
        .map_err(|e| ServiceError::MalformedRequest(format!("Malformed request body: {e}")))
}

fn coerce_rating(raw: Option<&Value>) -> Option<i64> {
    match raw? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

// Only called when the field is present; `null` clears the cell.
fn lenient_present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Some)
}
