//! Test fixtures: sample pure functions and order data

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memokey::{Spread, Value};
use serde::{Deserialize, Serialize};

const ORDERS_JSON: &str = include_str!("../fixtures/orders.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

pub fn orders() -> Vec<Order> {
    serde_json::from_str(ORDERS_JSON).expect("fixtures/orders.json is valid")
}

pub fn order_by_id(id: &str) -> Option<Order> {
    orders().into_iter().find(|o| o.order_id == id)
}

pub fn total_price(order: Order) -> f64 {
    order
        .items
        .iter()
        .map(|item| item.quantity as f64 * item.price)
        .sum()
}

/// `total_price` over an untyped order
pub fn total_price_value(order: Value) -> f64 {
    order
        .get("items")
        .and_then(Value::as_array)
        .unwrap_or_default()
        .iter()
        .map(|item| {
            let price = item.get("price").and_then(Value::as_f64).unwrap_or(0.0);
            let quantity = item.get("quantity").and_then(Value::as_f64).unwrap_or(0.0);
            price * quantity
        })
        .sum()
}

pub fn to_binary(n: u64) -> String {
    format!("{:b}", n)
}

pub fn power((base, exp): (u64, u32)) -> u64 {
    base.pow(exp)
}

pub fn sum(nums: Spread<i64>) -> i64 {
    nums.iter().sum()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Shared invocation counter
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Wrap `func` so every invocation is counted
    pub fn wrap<A, V, F>(&self, func: F) -> impl Fn(A) -> V + Clone + Send + Sync
    where
        F: Fn(A) -> V + Clone + Send + Sync,
    {
        let counter = self.clone();
        move |args: A| {
            counter.bump();
            func(args)
        }
    }
}

#[test]
fn test_fixture_totals() {
    let totals: Vec<f64> = orders().into_iter().map(total_price).collect();
    assert_eq!(totals.len(), 4);
    assert_close(totals[0], 27.8);
    assert_close(totals[1], 67.97);
    assert_close(totals[2], 38.95);
    assert_close(totals[3], 0.0);
}
