use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::ExpenseInput;

const DEMO_EXPENSES: [(&str, i64, &str, u32); 15] = [
    ("Grocery Shopping at Walmart", 12575, "Food", 15),
    ("Gas Station - Shell", 6500, "Travel", 14),
    ("Electricity Bill", 8950, "Bills", 13),
    ("Movie Tickets - Avengers", 3200, "Entertainment", 12),
    ("Amazon - New Headphones", 14999, "Shopping", 11),
    ("Dental Checkup", 8500, "Healthcare", 10),
    ("Lunch at Chipotle", 1850, "Food", 9),
    ("Uber Ride to Airport", 4500, "Travel", 8),
    ("Online Course - JavaScript", 7999, "Education", 7),
    ("Coffee at Starbucks", 650, "Food", 6),
    ("Netflix Subscription", 1599, "Entertainment", 5),
    ("Target - Household Items", 6725, "Shopping", 4),
    ("Water Bill", 4200, "Bills", 3),
    ("Gym Membership", 2999, "Healthcare", 2),
    ("Dinner at Olive Garden", 5875, "Food", 1),
];

/// Sample records from January 2024, newest first.
pub fn demo_expenses() -> Vec<ExpenseInput> {
    DEMO_EXPENSES
        .iter()
        .filter_map(|&(description, cents, category, day)| {
            NaiveDate::from_ymd_opt(2024, 1, day).map(|date| {
                ExpenseInput::new(description, Decimal::new(cents, 2), category, date)
            })
        })
        .collect()
}
