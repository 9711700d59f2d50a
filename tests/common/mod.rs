#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use expense_tracker::{
    core::Clock,
    storage::{KeyValueStore, MemoryStore},
    ExpenseError, ExpenseInput, ExpenseStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn jan_2024() -> Arc<Self> {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Wraps a [`MemoryStore`] and refuses writes while `failing` is set.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> expense_tracker::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> expense_tracker::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ExpenseError::Persistence("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

pub fn input(description: &str, amount: &str, category: &str, day: &str) -> ExpenseInput {
    ExpenseInput::new(
        description,
        amount.parse().expect("valid test amount"),
        category,
        date(day),
    )
}

pub fn memory_store(clock: Arc<dyn Clock>) -> (ExpenseStore, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    let store = ExpenseStore::new(backend.clone(), clock);
    (store, backend)
}
