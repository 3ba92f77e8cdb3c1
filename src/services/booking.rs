use chrono::{FixedOffset, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::db::rows::{self, Row, Table};
use crate::errors::ServiceError;
use crate::models::{
    format_date, normalize_date, normalize_mobile, normalize_value, Booking, BookingStatus,
    PaymentStatus,
};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub full_name: String,
    pub mobile: String,
    pub location: String,
    pub booked_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub admin_notes: Option<String>,
}

impl BookingUpdate {
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut out = vec![];
        if let Some(status) = &self.status {
            out.push(("status", Value::Text(status.clone())));
        }
        if let Some(payment) = &self.payment_status {
            out.push(("payment_status", Value::Text(payment.clone())));
        }
        if let Some(notes) = &self.admin_notes {
            out.push(("admin_notes", Value::Text(notes.clone())));
        }
        out
    }
}

pub(crate) fn now_stamp(offset: &FixedOffset) -> String {
    Utc::now()
        .with_timezone(offset)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn booking_from_row(row: &Row, offset: &FixedOffset) -> Booking {
    let booked_date = normalize_value(row.value("booked_date"), offset)
        .map(format_date)
        .unwrap_or_else(|| row.text("booked_date"));

    Booking {
        full_name: row.text("full_name"),
        mobile: row.text("mo_number"),
        location: row.text("location"),
        booked_date,
        created_at: row.text("created_at"),
        status_raw: or_default(row.text("status"), BookingStatus::Pending.as_str()),
        payment_raw: or_default(row.text("payment_status"), PaymentStatus::Pending.as_str()),
        admin_notes: row.text("admin_notes"),
    }
}

pub fn list_bookings(conn: &Connection, offset: &FixedOffset) -> Result<Vec<Booking>, ServiceError> {
    let rows = rows::scan_all(conn, Table::Bookings)?;
    Ok(rows.iter().map(|row| booking_from_row(row, offset)).collect())
}

// Duplicate scan and append share one transaction.
pub fn create_booking(
    conn: &Connection,
    offset: &FixedOffset,
    input: &NewBooking,
) -> Result<Booking, ServiceError> {
    let date = normalize_date(&input.booked_date, offset)
        .ok_or_else(|| ServiceError::MalformedRequest(format!("Invalid booked_date: {}", input.booked_date)))?;
    if input.full_name.trim().is_empty() {
        return Err(ServiceError::MalformedRequest("full_name is required".to_string()));
    }
    if normalize_mobile(&input.mobile).is_empty() {
        return Err(ServiceError::MalformedRequest("mo_number is required".to_string()));
    }

    let tx = conn.unchecked_transaction()?;

    let taken = rows::scan_all(&tx, Table::Bookings)?
        .iter()
        .any(|row| normalize_value(row.value("booked_date"), offset) == Some(date));
    if taken {
        tracing::info!(date = %date, "booking rejected, date already booked");
        return Err(ServiceError::DateAlreadyBooked);
    }

    let booking = Booking {
        full_name: input.full_name.trim().to_string(),
        mobile: input.mobile.clone(),
        location: input.location.trim().to_string(),
        booked_date: format_date(date),
        created_at: now_stamp(offset),
        status_raw: BookingStatus::Pending.as_str().to_string(),
        payment_raw: PaymentStatus::Pending.as_str().to_string(),
        admin_notes: String::new(),
    };

    rows::append_row(
        &tx,
        Table::Bookings,
        vec![
            Value::Text(booking.full_name.clone()),
            Value::Text(booking.mobile.clone()),
            Value::Text(booking.location.clone()),
            Value::Text(booking.booked_date.clone()),
            Value::Text(booking.created_at.clone()),
            Value::Text(booking.status_raw.clone()),
            Value::Text(booking.payment_raw.clone()),
            Value::Text(booking.admin_notes.clone()),
        ],
    )?;
    tx.commit()?;

    tracing::info!(date = %booking.booked_date, "booking created");
    Ok(booking)
}

pub fn update_booking(
    conn: &Connection,
    offset: &FixedOffset,
    booked_date: &str,
    update: &BookingUpdate,
) -> Result<(), ServiceError> {
    let date = normalize_date(booked_date, offset)
        .ok_or_else(|| ServiceError::MalformedRequest(format!("Invalid booked_date: {booked_date}")))?;

    let assignments = update.assignments();
    let found = rows::update_fields(
        conn,
        Table::Bookings,
        |row| normalize_value(row.value("booked_date"), offset) == Some(date),
        &assignments,
    )?;

    if !found {
        return Err(ServiceError::BookingNotFound);
    }

    tracing::info!(
        date = %date,
        status = ?update.status,
        payment_status = ?update.payment_status,
        notes_changed = update.admin_notes.is_some(),
        "booking updated"
    );
    Ok(())
}

pub fn find_bookings(
    conn: &Connection,
    offset: &FixedOffset,
    mobile: &str,
    name: &str,
) -> Result<Vec<Booking>, ServiceError> {
    let needle = name.trim().to_lowercase();
    Ok(list_bookings(conn, offset)?
        .into_iter()
        .filter(|b| b.matches_mobile(mobile) && b.full_name.to_lowercase().contains(&needle))
        .collect())
}
