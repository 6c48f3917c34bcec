//! Migration of persisted cart records.
//!
//! Two record shapes exist in storage. Early carts only held pizzas and
//! stored `{pizza_id, quantity}`; current carts store
//! `{item_id, item_type, quantity}`. Every load classifies each record into a
//! [`StoredLine`], migrates it to a [`LineItem`], and drops anything that
//! does not yield a numeric id and a positive whole quantity.

use kopernik_core::{ItemId, ItemType};
use serde_json::{Map, Value};
use tracing::debug;

use super::{Cart, LineItem};

/// A cart record as found in storage, before validation.
///
/// Fields are kept as raw JSON; `None` means the field was absent.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredLine {
    /// `{pizza_id, quantity}`; the type is implicitly pizza.
    Legacy {
        pizza_id: Value,
        quantity: Option<Value>,
    },
    /// `{item_id, item_type?, quantity}`.
    Current {
        item_id: Option<Value>,
        item_type: Option<Value>,
        quantity: Option<Value>,
    },
}

impl StoredLine {
    /// Classify a stored record. Non-object records yield `None`.
    ///
    /// A record is legacy when `pizza_id` is set and `item_id` is not.
    #[must_use]
    pub fn classify(record: &Value) -> Option<Self> {
        let object = record.as_object()?;
        let field = |name: &str| object.get(name).cloned();

        match field("pizza_id") {
            Some(pizza_id) if truthy(&pizza_id) && !is_truthy(object, "item_id") => {
                Some(Self::Legacy {
                    pizza_id,
                    quantity: field("quantity"),
                })
            }
            _ => Some(Self::Current {
                item_id: field("item_id"),
                item_type: field("item_type"),
                quantity: field("quantity"),
            }),
        }
    }

    /// Upgrade to the current shape, or `None` if the record is invalid.
    ///
    /// Records with no type (every legacy record, and current records whose
    /// `item_type` is missing or empty) are pizzas.
    #[must_use]
    pub fn migrate(&self) -> Option<LineItem> {
        let (raw_id, raw_type, raw_quantity) = match self {
            Self::Legacy { pizza_id, quantity } => (Some(pizza_id), None, quantity.as_ref()),
            Self::Current {
                item_id,
                item_type,
                quantity,
            } => (item_id.as_ref(), item_type.as_ref(), quantity.as_ref()),
        };

        let item_type = match raw_type {
            Some(Value::String(s)) if !s.is_empty() => s.parse::<ItemType>().ok()?,
            Some(value) if truthy(value) => return None,
            _ => ItemType::default(),
        };

        let item_id = coerce_number(raw_id)
            .and_then(whole_number)
            .and_then(|id| i32::try_from(id).ok())
            .map(ItemId::new)?;

        let quantity = coerce_number(raw_quantity)
            .and_then(whole_number)
            .filter(|q| *q > 0)
            .and_then(|q| u32::try_from(q).ok())?;

        Some(LineItem {
            item_id,
            item_type,
            quantity,
        })
    }
}

/// Normalize raw persisted cart data into a [`Cart`].
///
/// Never fails: missing data, unparseable JSON, and non-array documents all
/// produce an empty cart. Invalid records are dropped; records sharing an
/// `(item_id, item_type)` key are merged by summing quantities.
#[must_use]
pub fn normalize(raw: Option<&str>) -> Cart {
    let Some(raw) = raw else {
        return Cart::new();
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            debug!(kind = json_kind(&other), "stored cart is not an array, starting empty");
            return Cart::new();
        }
        Err(e) => {
            debug!(error = %e, "stored cart is not valid JSON, starting empty");
            return Cart::new();
        }
    };

    let total = records.len();
    let cart = Cart::from_lines(
        records
            .iter()
            .filter_map(StoredLine::classify)
            .filter_map(|line| line.migrate()),
    );

    let kept: usize = cart.len();
    if kept < total {
        debug!(total, kept, "dropped or merged stored cart records");
    }
    cart
}

fn is_truthy(object: &Map<String, Value>, name: &str) -> bool {
    object.get(name).is_some_and(truthy)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loose numeric coercion: numbers pass through, numeric strings parse
/// (blank strings are zero), booleans are 0/1, null is zero. Absent values
/// and non-finite results are not numbers.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

#[allow(clippy::cast_possible_truncation)] // range checked against i64 bounds first
fn whole_number(n: f64) -> Option<i64> {
    #[allow(clippy::cast_precision_loss)]
    let in_range = n >= i64::MIN as f64 && n <= i64::MAX as f64;
    (n.fract() == 0.0 && in_range).then(|| n as i64)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(id: i32, item_type: ItemType, quantity: u32) -> LineItem {
        LineItem {
            item_id: ItemId::new(id),
            item_type,
            quantity,
        }
    }

    #[test]
    fn test_legacy_record_upgrades_to_pizza() {
        let cart = normalize(Some(r#"[{"pizza_id": 3, "quantity": 2}]"#));
        assert_eq!(cart.lines(), &[line(3, ItemType::Pizza, 2)]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let cart = normalize(Some(
            r#"[{"pizza_id": "3", "quantity": "2"},
                {"item_id": 1, "item_type": "drink", "quantity": 4},
                {"item_id": 9, "quantity": 1}]"#,
        ));
        let stored = serde_json::to_string(&cart).unwrap();
        assert_eq!(normalize(Some(&stored)), cart);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_missing_or_malformed_data_is_empty() {
        assert!(normalize(None).is_empty());
        assert!(normalize(Some("")).is_empty());
        assert!(normalize(Some("{not json")).is_empty());
        assert!(normalize(Some(r#"{"item_id": 1, "quantity": 1}"#)).is_empty());
        assert!(normalize(Some("null")).is_empty());
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let cart = normalize(Some(
            r#"[
                {"item_id": 1, "item_type": "pizza", "quantity": 0},
                {"item_id": 2, "item_type": "pizza", "quantity": -1},
                {"item_id": "abc", "item_type": "pizza", "quantity": 1},
                {"item_id": 4, "item_type": "pizza"},
                {"item_id": 5, "item_type": "salad", "quantity": 1},
                {"item_id": 6, "item_type": "pizza", "quantity": 1.5},
                {"item_id": 7, "item_type": 12, "quantity": 1},
                42,
                "pizza",
                null,
                {"item_id": 8, "item_type": "dessert", "quantity": "3"}
            ]"#,
        ));
        assert_eq!(cart.lines(), &[line(8, ItemType::Dessert, 3)]);
    }

    #[test]
    fn test_current_record_without_type_defaults_to_pizza() {
        let cart = normalize(Some(r#"[{"item_id": 4, "item_type": "", "quantity": 1}]"#));
        assert_eq!(cart.lines(), &[line(4, ItemType::Pizza, 1)]);
    }

    #[test]
    fn test_record_with_both_ids_uses_current_shape() {
        let cart = normalize(Some(
            r#"[{"pizza_id": 3, "item_id": 5, "item_type": "drink", "quantity": 1}]"#,
        ));
        assert_eq!(cart.lines(), &[line(5, ItemType::Drink, 1)]);
    }

    #[test]
    fn test_duplicate_shapes_are_merged() {
        let cart = normalize(Some(
            r#"[{"pizza_id": 3, "quantity": 2},
                {"item_id": 3, "item_type": "pizza", "quantity": 1}]"#,
        ));
        assert_eq!(cart.lines(), &[line(3, ItemType::Pizza, 3)]);
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            StoredLine::classify(&json!({"pizza_id": 1, "quantity": 1})),
            Some(StoredLine::Legacy { .. })
        ));
        assert!(matches!(
            StoredLine::classify(&json!({"pizza_id": 0, "item_id": 0, "quantity": 1})),
            Some(StoredLine::Current { .. })
        ));
        assert!(StoredLine::classify(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(" 7 "))), Some(7.0));
        assert_eq!(coerce_number(Some(&json!(""))), Some(0.0));
        assert_eq!(coerce_number(Some(&json!(true))), Some(1.0));
        assert_eq!(coerce_number(Some(&Value::Null)), Some(0.0));
        assert_eq!(coerce_number(Some(&json!("inf"))), None);
        assert_eq!(coerce_number(Some(&json!({}))), None);
        assert_eq!(coerce_number(None), None);
    }
}
