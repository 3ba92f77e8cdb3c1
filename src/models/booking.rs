use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{format_date, DATE_FORMAT};

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub full_name: String,
    pub mobile: String,
    pub location: String,
    pub booked_date: String,
    pub created_at: String,
    pub status_raw: String,
    pub payment_raw: String,
    pub admin_notes: String,
}

impl Booking {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.booked_date, DATE_FORMAT).ok()
    }

    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status_raw)
    }

    pub fn payment(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_raw)
    }

    pub fn is_review_eligible(&self) -> bool {
        self.status() == Some(BookingStatus::Confirmed) && self.payment() == Some(PaymentStatus::Paid)
    }

    pub fn matches_mobile(&self, mobile: &str) -> bool {
        let wanted = normalize_mobile(mobile);
        !wanted.is_empty() && normalize_mobile(&self.mobile) == wanted
    }

    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            full_name: self.full_name.clone(),
            mo_number: self.mobile.clone(),
            location: self.location.clone(),
            booked_date: self.booked_date.clone(),
            timestamp: self.created_at.clone(),
            status: self.status_raw.clone(),
            payment_status: self.payment_raw.clone(),
            admin_notes: self.admin_notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Some(BookingStatus::Pending),
            "confirmed" | "booked" => Some(BookingStatus::Confirmed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Some(PaymentStatus::Pending),
            "paid" | "done" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

// Strips the spreadsheet text marker (').
pub fn normalize_mobile(s: &str) -> String {
    s.trim().trim_start_matches('\'').trim().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub mo_number: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub booked_date: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub admin_notes: String,
}

impl BookingRecord {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.booked_date.trim(), DATE_FORMAT).ok()
    }

    pub fn is_review_eligible(&self) -> bool {
        BookingStatus::parse(&self.status) == Some(BookingStatus::Confirmed)
            && PaymentStatus::parse(&self.payment_status) == Some(PaymentStatus::Paid)
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            "Unknown"
        } else {
            &self.full_name
        }
    }

    pub fn for_date(date: NaiveDate, full_name: &str) -> Self {
        BookingRecord {
            full_name: full_name.to_string(),
            mo_number: String::new(),
            location: String::new(),
            booked_date: format_date(date),
            timestamp: String::new(),
            status: BookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            admin_notes: String::new(),
        }
    }
}
