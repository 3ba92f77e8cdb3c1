use chrono::FixedOffset;
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::db::rows::{self, Row, Table};
use crate::errors::ServiceError;
use crate::models::Review;
use crate::services::booking::{list_bookings, now_stamp};

pub const DEFAULT_RATING: i64 = 5;

pub fn normalize_rating(rating: Option<i64>) -> i64 {
    match rating {
        None | Some(0) => DEFAULT_RATING,
        Some(r) => r.clamp(1, 5),
    }
}

fn review_from_row(row: &Row) -> Review {
    let rating = row.text("rating").trim().parse::<f64>().ok().map(|r| r as i64);
    Review {
        reviewer_name: row.text("name"),
        review_text: row.text("review"),
        created_at: row.text("created_at"),
        rating: normalize_rating(rating),
    }
}

pub fn add_review(
    conn: &Connection,
    offset: &FixedOffset,
    mobile: &str,
    review_text: &str,
    rating: Option<i64>,
) -> Result<Review, ServiceError> {
    if review_text.trim().is_empty() {
        return Err(ServiceError::MalformedRequest("Review text is required".to_string()));
    }

    let booking = list_bookings(conn, offset)?
        .into_iter()
        .find(|b| b.matches_mobile(mobile) && b.is_review_eligible());

    let Some(booking) = booking else {
        tracing::info!("review rejected, no confirmed and paid booking for mobile");
        return Err(ServiceError::NotEligible);
    };

    let review = Review {
        reviewer_name: booking.full_name,
        review_text: review_text.to_string(),
        created_at: now_stamp(offset),
        rating: normalize_rating(rating),
    };

    rows::append_row(
        conn,
        Table::Reviews,
        vec![
            Value::Text(review.reviewer_name.clone()),
            Value::Text(review.review_text.clone()),
            Value::Text(review.created_at.clone()),
            Value::Integer(review.rating),
        ],
    )?;

    tracing::info!(reviewer = %review.reviewer_name, rating = review.rating, "review added");
    Ok(review)
}

pub fn list_reviews(conn: &Connection) -> Result<Vec<Review>, ServiceError> {
    let rows = rows::scan_all(conn, Table::Reviews)?;
    Ok(rows
        .iter()
        .rev()
        .map(review_from_row)
        .filter(|r| !r.review_text.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_offset;
    use crate::db;
    use crate::services::booking::{create_booking, update_booking, BookingUpdate, NewBooking};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn book(conn: &Connection, date: &str, name: &str, mobile: &str, status: &str, payment: &str) {
        let tz = default_offset();
        create_booking(
            conn,
            &tz,
            &NewBooking {
                full_name: name.to_string(),
                mobile: mobile.to_string(),
                location: "Delhi".to_string(),
                booked_date: date.to_string(),
            },
        )
        .unwrap();
        update_booking(
            conn,
            &tz,
            date,
            &BookingUpdate {
                status: Some(status.to_string()),
                payment_status: Some(payment.to_string()),
                admin_notes: None,
            },
        )
        .unwrap();
    }

    fn raw_review(conn: &Connection, name: &str, text: &str) {
        rows::append_row(
            conn,
            Table::Reviews,
            vec![
                Value::Text(name.into()),
                Value::Text(text.into()),
                Value::Text("2025-06-16".into()),
                Value::Null,
            ],
        )
        .unwrap();
    }

    #[test]
    fn test_rating_defaults_and_clamps() {
        assert_eq!(normalize_rating(None), 5);
        assert_eq!(normalize_rating(Some(0)), 5);
        assert_eq!(normalize_rating(Some(3)), 3);
        assert_eq!(normalize_rating(Some(9)), 5);
        assert_eq!(normalize_rating(Some(-2)), 1);
    }

    #[test]
    fn test_review_uses_booking_name() {
        let conn = setup_db();
        book(&conn, "2025-06-15", "Asha", "'9999999999", "Confirmed", "Paid");

        let review = add_review(&conn, &default_offset(), " 9999999999 ", "Great stay", Some(4)).unwrap();
        assert_eq!(review.reviewer_name, "Asha");
        assert_eq!(review.rating, 4);

        let listed = list_reviews(&conn).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reviewer_name, "Asha");
    }

    #[test]
    fn test_legacy_synonyms_are_eligible() {
        let conn = setup_db();
        book(&conn, "2025-06-15", "Asha", "9999999999", "Booked", "Done");
        assert!(add_review(&conn, &default_offset(), "9999999999", "Nice", None).is_ok());
    }

    #[test]
    fn test_not_eligible_cases() {
        let conn = setup_db();
        let tz = default_offset();
        book(&conn, "2025-06-15", "Asha", "1111111111", "Confirmed", "Pending");
        book(&conn, "2025-06-16", "Ravi", "2222222222", "Pending", "Paid");

        for mobile in ["1111111111", "2222222222", "0000000000", ""] {
            let result = add_review(&conn, &tz, mobile, "Great stay", Some(5));
            assert!(matches!(result, Err(ServiceError::NotEligible)), "mobile {mobile:?}");
        }
        assert!(list_reviews(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_later_paid_booking_makes_guest_eligible() {
        let conn = setup_db();
        book(&conn, "2025-06-15", "Asha", "9999999999", "Pending", "Pending");
        book(&conn, "2025-07-15", "Asha V", "9999999999", "Confirmed", "Paid");

        let review = add_review(&conn, &default_offset(), "9999999999", "Came back", None).unwrap();
        assert_eq!(review.reviewer_name, "Asha V");
        assert_eq!(review.rating, 5);
    }

    #[test]
    fn test_review_text_stored_as_given() {
        let conn = setup_db();
        book(&conn, "2025-06-15", "Asha", "9999999999", "Confirmed", "Paid");
        add_review(&conn, &default_offset(), "9999999999", "  Great stay\n", None).unwrap();
        assert_eq!(list_reviews(&conn).unwrap()[0].review_text, "  Great stay\n");
    }

    #[test]
    fn test_empty_review_text_rejected() {
        let conn = setup_db();
        book(&conn, "2025-06-15", "Asha", "9999999999", "Confirmed", "Paid");
        let result = add_review(&conn, &default_offset(), "9999999999", "   ", None);
        assert!(matches!(result, Err(ServiceError::MalformedRequest(_))));
    }

    #[test]
    fn test_list_newest_first_without_blank_rows() {
        let conn = setup_db();
        raw_review(&conn, "A", "first");
        raw_review(&conn, "B", "  ");
        raw_review(&conn, "C", "third");
        raw_review(&conn, "D", "");

        let names: Vec<String> = list_reviews(&conn)
            .unwrap()
            .into_iter()
            .map(|r| r.reviewer_name)
            .collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn test_missing_rating_reads_as_five() {
        let conn = setup_db();
        raw_review(&conn, "A", "ok");
        assert_eq!(list_reviews(&conn).unwrap()[0].rating, 5);
    }
}
