use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use chrono::NaiveDate;

use crate::models::BookingRecord;

#[derive(Debug, Clone, Default)]
pub struct BookingCache {
    bookings: Vec<BookingRecord>,
    by_date: BTreeMap<NaiveDate, String>,
}

impl BookingCache {
    pub fn from_bookings(bookings: Vec<BookingRecord>) -> Self {
        let mut cache = Self::default();
        cache.replace(bookings);
        cache
    }

    pub fn replace(&mut self, bookings: Vec<BookingRecord>) {
        let mut by_date = BTreeMap::new();
        for record in &bookings {
            match record.date() {
                Some(date) => {
                    by_date.insert(date, record.display_name().to_string());
                }
                None => {
                    tracing::debug!(booked_date = %record.booked_date, "skipping booking without a usable date");
                }
            }
        }
        self.bookings = bookings;
        self.by_date = by_date;
    }

    pub fn apply_optimistic(&mut self, date: NaiveDate, full_name: &str) {
        let name = if full_name.trim().is_empty() { "You" } else { full_name.trim() };
        self.by_date.insert(date, name.to_string());
    }

    pub fn occupant(&self, date: NaiveDate) -> Option<&str> {
        self.by_date.get(&date).map(String::as_str)
    }

    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    pub fn booked_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }
}

pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<Vec<BookingRecord>>>;
    fn save(&self, bookings: &[BookingRecord]) -> anyhow::Result<()>;
}

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> anyhow::Result<Option<Vec<BookingRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        let bookings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", self.path.display()))?;
        Ok(Some(bookings))
    }

    fn save(&self, bookings: &[BookingRecord]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(bookings)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write snapshot {}", self.path.display()))
    }
}

#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<Vec<BookingRecord>>>,
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> anyhow::Result<Option<Vec<BookingRecord>>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot mutex poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, bookings: &[BookingRecord]) -> anyhow::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot mutex poisoned"))?;
        *guard = Some(bookings.to_vec());
        Ok(())
    }
}
