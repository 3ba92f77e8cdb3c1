pub mod booking;
pub mod dates;
pub mod review;

pub use booking::{normalize_mobile, Booking, BookingRecord, BookingStatus, PaymentStatus};
pub use dates::{format_date, normalize_date, normalize_value};
pub use review::{Review, ReviewRecord};
