use std::env;

use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_TZ_OFFSET: &str = "+05:30";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub tz_offset: FixedOffset,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let tz_raw = env::var("BOOKING_TZ_OFFSET").unwrap_or_else(|_| DEFAULT_TZ_OFFSET.to_string());
        let tz_offset = parse_offset(&tz_raw).unwrap_or_else(|| {
            tracing::warn!(value = %tz_raw, "invalid BOOKING_TZ_OFFSET, using {DEFAULT_TZ_OFFSET}");
            default_offset()
        });

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string());
        if admin_password == "changeme" {
            tracing::warn!("ADMIN_PASSWORD not set, using placeholder credential");
        }

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "hotel.db".to_string()),
            tz_offset,
            admin_username,
            admin_password,
        }
    }
}

pub fn default_offset() -> FixedOffset {
    parse_offset(DEFAULT_TZ_OFFSET).unwrap_or(Utc.fix())
}

pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
