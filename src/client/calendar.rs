use chrono::{Datelike, FixedOffset, Months, NaiveDate, Utc};

use super::cache::BookingCache;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayState {
    Booked { occupant: String },
    Past,
    Available,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub state: DayState,
}

impl CalendarDay {
    pub fn opens_booking(&self) -> bool {
        self.state == DayState::Available
    }
}

// Booked wins over past.
pub fn day_state(date: NaiveDate, cache: &BookingCache, today: NaiveDate) -> DayState {
    if let Some(occupant) = cache.occupant(date) {
        DayState::Booked {
            occupant: occupant.to_string(),
        }
    } else if date < today {
        DayState::Past
    } else {
        DayState::Available
    }
}

pub fn today_in(offset: &FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(offset).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first;
        if next == self.first {
            return 31;
        }
        (next - self.first).num_days() as u32
    }

    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.first.month0() as usize], self.first.year())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn render_month(cursor: MonthCursor, cache: &BookingCache, today: NaiveDate) -> MonthView {
    let days = cursor
        .first_day()
        .iter_days()
        .take(cursor.days_in_month() as usize)
        .map(|date| CalendarDay {
            date,
            state: day_state(date, cache, today),
        })
        .collect();

    MonthView {
        title: cursor.title(),
        leading_blanks: cursor.first_day().weekday().num_days_from_sunday(),
        days,
    }
}
