//! The expense collection and its lifecycle operations.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::core::{ids::IdAllocator, services::demo, time::Clock};
use crate::domain::{check_amount, ExpenseId, ExpenseInput, ExpenseRecord};
use crate::errors::{ExpenseError, Result};
use crate::storage::{KeyValueStore, EXPENSES_KEY};

/// Notification emitted after the collection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize },
    Added(ExpenseId),
    Updated(ExpenseId),
    Removed(ExpenseId),
    Replaced { count: usize },
    Cleared,
}

type Listener = Box<dyn Fn(&StoreEvent, &[ExpenseRecord]) + Send + Sync>;

/// Owns the ordered expense collection (most recent first) and keeps the persistence
/// collaborator in sync with it.
pub struct ExpenseStore {
    expenses: Vec<ExpenseRecord>,
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: IdAllocator,
    listeners: Vec<Listener>,
}

impl fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("expenses", &self.expenses.len())
            .field("last_id", &self.ids.last())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ExpenseStore {
    /// Creates an empty store. Call [`ExpenseStore::load_all`] to pick up persisted data.
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            expenses: Vec::new(),
            backend,
            clock,
            ids: IdAllocator::new(),
            listeners: Vec::new(),
        }
    }

    /// Creates a store and loads whatever the backend currently holds.
    pub fn open(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut store = Self::new(backend, clock);
        store.load_all()?;
        Ok(store)
    }

    /// Registers a callback invoked with every [`StoreEvent`] and the resulting snapshot.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&StoreEvent, &[ExpenseRecord]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the in-memory collection with the persisted one. Returns the record count.
    pub fn load_all(&mut self) -> Result<usize> {
        let mut expenses: Vec<ExpenseRecord> = match self.backend.get(EXPENSES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };

        for expense in &expenses {
            check_amount(expense.amount).map_err(|err| {
                ExpenseError::Persistence(format!("stored expense {}: {}", expense.id, err))
            })?;
        }

        let mut ids = IdAllocator::starting_after(expenses.iter().map(|e| e.id).max());
        let mut seen = HashSet::new();
        let mut reassigned = 0usize;
        let now = self.clock.now();
        for expense in &mut expenses {
            if seen.insert(expense.id) {
                continue;
            }
            let fresh = loop {
                let candidate = ids.next(now)?;
                if seen.insert(candidate) {
                    break candidate;
                }
            };
            tracing::warn!(duplicate = %expense.id, replacement = %fresh, "duplicate expense id on load");
            expense.id = fresh;
            reassigned += 1;
        }

        self.expenses = expenses;
        self.ids = ids;
        let count = self.expenses.len();
        tracing::info!(count, "expenses loaded");
        self.notify(&StoreEvent::Loaded { count });
        if reassigned > 0 {
            self.persist()?;
        }
        Ok(count)
    }

    /// Writes the full collection to the backend.
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.expenses)?;
        self.backend.set(EXPENSES_KEY, &json)?;
        tracing::debug!(count = self.expenses.len(), "expenses persisted");
        Ok(())
    }

    /// Validates `input`, assigns a fresh id, and inserts the record at the front.
    pub fn add(&mut self, input: ExpenseInput) -> Result<ExpenseRecord> {
        let input = input.validated()?;
        let now = self.clock.now();
        let id = self.ids.next(now)?;
        let record = ExpenseRecord::from_input(id, input, now);
        self.expenses.insert(0, record.clone());
        tracing::info!(%id, amount = %record.amount, category = %record.category, "expense added");
        self.commit(StoreEvent::Added(id))?;
        Ok(record)
    }

    /// Replaces every field except the id of an existing record.
    pub fn update(&mut self, id: ExpenseId, input: ExpenseInput) -> Result<ExpenseRecord> {
        let index = self.index_of(id).ok_or(ExpenseError::NotFound(id))?;
        let input = input.validated()?;
        let now = self.clock.now();
        let record = &mut self.expenses[index];
        record.apply(input, now);
        let updated = record.clone();
        tracing::info!(%id, "expense updated");
        self.commit(StoreEvent::Updated(id))?;
        Ok(updated)
    }

    /// Removes a record. Removing an unknown id is an error, not a no-op.
    pub fn remove(&mut self, id: ExpenseId) -> Result<ExpenseRecord> {
        let index = self.index_of(id).ok_or(ExpenseError::NotFound(id))?;
        let removed = self.expenses.remove(index);
        tracing::info!(%id, "expense removed");
        self.commit(StoreEvent::Removed(id))?;
        Ok(removed)
    }

    /// Replaces the whole collection with `seeds`, in the given order, assigning new ids.
    /// Nothing changes when any seed fails validation.
    pub fn replace_all(&mut self, seeds: Vec<ExpenseInput>) -> Result<usize> {
        let seeds = seeds
            .into_iter()
            .map(ExpenseInput::validated)
            .collect::<Result<Vec<_>>>()?;
        let now = self.clock.now();
        let expenses = seeds
            .into_iter()
            .map(|seed| {
                let id = self.ids.next(now)?;
                Ok(ExpenseRecord::from_input(id, seed, now))
            })
            .collect::<Result<Vec<_>>>()?;
        let count = expenses.len();
        self.expenses = expenses;
        tracing::info!(count, "expense collection replaced");
        self.commit(StoreEvent::Replaced { count })?;
        Ok(count)
    }

    /// Seeds the demo records when the store holds nothing. Returns `true` if it did.
    pub fn load_demo_if_empty(&mut self) -> Result<bool> {
        if !self.expenses.is_empty() {
            return Ok(false);
        }
        self.replace_all(demo::demo_expenses())?;
        Ok(true)
    }

    /// Drops every record.
    pub fn clear(&mut self) -> Result<()> {
        self.expenses.clear();
        tracing::info!("expense collection cleared");
        self.commit(StoreEvent::Cleared)
    }

    /// Current snapshot, most recent first.
    pub fn list(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn get(&self, id: ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn index_of(&self, id: ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|expense| expense.id == id)
    }

    /// Persists and notifies. The in-memory change stands even when the write fails.
    fn commit(&self, event: StoreEvent) -> Result<()> {
        let persisted = self.persist();
        if let Err(err) = &persisted {
            tracing::error!(error = %err, ?event, "failed to persist expenses");
        }
        self.notify(&event);
        persisted
    }

    fn notify(&self, event: &StoreEvent) {
        for listener in &self.listeners {
            listener(event, &self.expenses);
        }
    }
}
