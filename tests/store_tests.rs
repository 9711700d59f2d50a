mod common;

use std::{collections::HashSet, sync::Arc};

use chrono::Duration;
use common::{input, memory_store, FixedClock, FlakyStore};
use expense_tracker::{
    core::{services::demo_expenses, Clock},
    storage::{KeyValueStore, EXPENSES_KEY},
    AggregationEngine, ExpenseError, ExpenseId, ExpenseStore,
};
use rust_decimal::Decimal;

#[test]
fn add_within_one_millisecond_yields_distinct_ids() {
    let clock = FixedClock::jan_2024();
    let (mut store, _backend) = memory_store(clock.clone());
    let ids: Vec<ExpenseId> = (0..25)
        .map(|n| {
            store
                .add(input(&format!("item {n}"), "1.00", "Food", "2024-01-05"))
                .unwrap()
                .id
        })
        .collect();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn ids_follow_the_clock_when_it_advances() {
    let clock = FixedClock::jan_2024();
    let (mut store, _backend) = memory_store(clock.clone());
    let started = clock.now().timestamp_millis();
    let first = store.add(input("a", "1", "Food", "2024-01-05")).unwrap();
    clock.advance(Duration::milliseconds(250));
    let second = store.add(input("b", "1", "Food", "2024-01-05")).unwrap();
    assert_eq!(first.id.value(), started);
    assert_eq!(second.id.value() - first.id.value(), 250);
}

#[test]
fn bulk_load_with_frozen_clock_assigns_distinct_ids() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let count = store.replace_all(demo_expenses()).unwrap();
    assert_eq!(count, 15);
    let ids: HashSet<_> = store.list().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 15);
    assert_eq!(store.list()[0].description, "Grocery Shopping at Walmart");
    assert_eq!(store.list()[14].description, "Dinner at Olive Garden");
}

#[test]
fn remove_twice_reports_not_found() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let record = store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();
    let removed = store.remove(record.id).unwrap();
    assert_eq!(removed, record);
    assert!(store.list().iter().all(|e| e.id != record.id));
    let err = store.remove(record.id).unwrap_err();
    assert!(matches!(err, ExpenseError::NotFound(id) if id == record.id));
}

#[test]
fn update_preserves_id_and_changes_total() {
    let clock = FixedClock::jan_2024();
    let (mut store, _backend) = memory_store(clock.clone());
    let record = store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();
    clock.advance(Duration::minutes(5));

    let updated = store
        .update(record.id, input("Coffee", "8.00", "Food", "2024-01-06"))
        .unwrap();
    assert_eq!(updated.id, record.id);
    assert_eq!(updated.amount, Decimal::new(800, 2));
    assert!(updated.created_at > record.created_at);
    assert_eq!(
        AggregationEngine::total_amount(store.list()).unwrap(),
        Decimal::new(800, 2)
    );
}

#[test]
fn update_with_empty_description_leaves_record_untouched() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let record = store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();
    let err = store
        .update(record.id, input("   ", "9.00", "Food", "2024-01-06"))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.list(), &[record]);
}

#[test]
fn update_unknown_id_is_not_found_even_with_bad_input() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let err = store
        .update(ExpenseId(42), input("", "0", "", "2024-01-06"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn add_rejects_invalid_fields() {
    let (mut store, backend) = memory_store(FixedClock::jan_2024());
    for bad in [
        input("", "5", "Food", "2024-01-06"),
        input("Coffee", "0", "Food", "2024-01-06"),
        input("Coffee", "-2.5", "Food", "2024-01-06"),
        input("Coffee", "5", " ", "2024-01-06"),
        input("Yacht", "79228162514264337593543950335", "Shopping", "2024-01-06"),
        input("Coffee", "0.123456789012345678", "Food", "2024-01-06"),
    ] {
        assert!(store.add(bad).unwrap_err().is_validation());
    }
    assert!(store.is_empty());
    assert_eq!(backend.get(EXPENSES_KEY).unwrap(), None);
}

#[test]
fn replace_all_is_all_or_nothing() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let kept = store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();
    let mut seeds = demo_expenses();
    seeds.push(input("Broken", "0", "Food", "2024-01-06"));
    assert!(store.replace_all(seeds).unwrap_err().is_validation());
    assert_eq!(store.list(), &[kept]);
}

#[test]
fn reopening_resumes_ids_above_persisted_ones() {
    let clock = FixedClock::jan_2024();
    let (mut store, backend) = memory_store(clock.clone());
    let first = store.add(input("a", "1", "Food", "2024-01-05")).unwrap();
    let second = store.add(input("b", "1", "Food", "2024-01-05")).unwrap();

    let backend: Arc<dyn KeyValueStore> = backend;
    let mut reopened = ExpenseStore::open(backend, clock.clone()).unwrap();
    assert_eq!(reopened.list(), store.list());
    let third = reopened.add(input("c", "1", "Food", "2024-01-05")).unwrap();
    assert!(third.id > second.id && third.id > first.id);
}

#[test]
fn failed_write_keeps_in_memory_change_and_reports_persistence() {
    let backend = FlakyStore::new();
    let mut store = ExpenseStore::new(backend.clone(), FixedClock::jan_2024());
    store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();

    backend.fail_writes(true);
    let err = store
        .add(input("Taxi", "18.00", "Travel", "2024-01-07"))
        .unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(store.len(), 2);

    let persisted = backend.get(EXPENSES_KEY).unwrap().unwrap();
    assert!(!persisted.contains("Taxi"));

    backend.fail_writes(false);
    store.persist().unwrap();
    assert!(backend.get(EXPENSES_KEY).unwrap().unwrap().contains("Taxi"));
}

#[test]
fn clear_empties_store_and_backend() {
    let (mut store, backend) = memory_store(FixedClock::jan_2024());
    store.replace_all(demo_expenses()).unwrap();
    store.clear().unwrap();
    assert!(store.is_empty());
    assert_eq!(backend.get(EXPENSES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn add_then_list_holds_the_input_plus_an_id() {
    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let seed = input("  Coffee  ", "6.50", "Food", "2024-01-06");
    let record = store.add(seed).unwrap();

    assert_eq!(store.len(), 1);
    let listed = &store.list()[0];
    assert_eq!(listed, &record);
    assert_eq!(listed.description, "Coffee");
    assert_eq!(listed.amount, Decimal::new(650, 2));
    assert_eq!(listed.category, "Food");
    assert_eq!(listed.date, common::date("2024-01-06"));
}

#[test]
fn listeners_receive_each_committed_snapshot() {
    use expense_tracker::core::StoreEvent;
    use std::sync::Mutex;

    let (mut store, _backend) = memory_store(FixedClock::jan_2024());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |event, snapshot| {
        let total = AggregationEngine::total_amount(snapshot).unwrap();
        sink.lock().unwrap().push((event.clone(), total));
    });

    let record = store.add(input("Coffee", "6.50", "Food", "2024-01-06")).unwrap();
    store
        .update(record.id, input("Coffee", "7.00", "Food", "2024-01-06"))
        .unwrap();
    store.replace_all(demo_expenses()).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (StoreEvent::Added(record.id), Decimal::new(650, 2)),
            (StoreEvent::Updated(record.id), Decimal::new(700, 2)),
            (StoreEvent::Replaced { count: 15 }, Decimal::new(91121, 2)),
        ]
    );
}
