//! Response shape normalization.
//!
//! The backend is inconsistent about envelopes: the same list may arrive as a
//! bare array, as `{"products": [...]}`, or wrapped again in `{"data": ...}`.
//! These functions are the only place that knows about those variants; every
//! endpoint passes its response through one of them and gets a typed value.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Envelope keys tried for product lists.
pub const PRODUCT_KEYS: &[&str] = &["products", "items", "data"];
/// Envelope keys tried for cart contents.
pub const CART_KEYS: &[&str] = &["products", "items", "cart", "data"];
/// Envelope keys tried for order lists.
pub const ORDER_KEYS: &[&str] = &["orders", "data"];
/// Envelope keys tried for user lists.
pub const USER_KEYS: &[&str] = &["users", "data"];

/// Extract a list of `T` from `value`.
///
/// Accepts a bare array, or an object holding the array under the first of
/// `keys` that is present. A key holding another object is unwrapped in turn,
/// so `{"data": {"products": [...]}}` works too.
///
/// # Errors
///
/// Returns `ApiError::UnexpectedShape` when no array is found and
/// `ApiError::Parse` when an element does not deserialize as `T`.
pub fn collection<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<Vec<T>, ApiError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            for key in keys {
                match map.remove(*key) {
                    Some(inner @ (Value::Array(_) | Value::Object(_))) => {
                        return collection(inner, keys);
                    }
                    Some(Value::Null) | None => {}
                    Some(other) => {
                        return Err(ApiError::UnexpectedShape(format!(
                            "'{key}' holds {}",
                            describe(&other)
                        )));
                    }
                }
            }
            Err(ApiError::UnexpectedShape(format!(
                "object without any of [{}] (keys: {})",
                keys.join(", "),
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            )))
        }
        other => Err(ApiError::UnexpectedShape(format!(
            "expected a list, got {}",
            describe(&other)
        ))),
    }
}

/// Extract a single `T` from `value`.
///
/// Unwraps the first of `keys` holding an object; otherwise the whole object
/// is the value.
///
/// # Errors
///
/// Returns `ApiError::UnexpectedShape` unless `value` is an object, and
/// `ApiError::Parse` when it does not deserialize as `T`.
pub fn single<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<T, ApiError> {
    let Value::Object(mut map) = value else {
        return Err(ApiError::UnexpectedShape(format!(
            "expected an object, got {}",
            describe(&value)
        )));
    };

    for key in keys {
        if matches!(map.get(*key), Some(Value::Object(_)))
            && let Some(inner) = map.remove(*key)
        {
            return single(inner, keys);
        }
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

/// Find a string field by the first matching name, searching nested objects
/// under `keys` as well.
pub(crate) fn find_string(value: &Value, names: &[&str], keys: &[&str]) -> Option<String> {
    let map = value.as_object()?;
    names
        .iter()
        .find_map(|name| map.get(*name)?.as_str().map(str::to_string))
        .or_else(|| {
            keys.iter()
                .find_map(|key| find_string(map.get(*key)?, names, keys))
        })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_collection_accepts_every_envelope() {
        let shapes = [
            json!([{"id": 1}, {"id": 2}]),
            json!({"products": [{"id": 1}, {"id": 2}]}),
            json!({"items": [{"id": 1}, {"id": 2}]}),
            json!({"data": [{"id": 1}, {"id": 2}]}),
            json!({"data": {"products": [{"id": 1}, {"id": 2}]}}),
            json!({"success": true, "products": [{"id": 1}, {"id": 2}]}),
        ];
        for shape in shapes {
            let items: Vec<Item> = collection(shape, PRODUCT_KEYS).unwrap();
            assert_eq!(ids(&items), [1, 2]);
        }
    }

    #[test]
    fn test_collection_prefers_first_key() {
        let value = json!({"orders": [{"id": 7}], "data": [{"id": 8}]});
        let items: Vec<Item> = collection(value, ORDER_KEYS).unwrap();
        assert_eq!(ids(&items), [7]);
    }

    #[test]
    fn test_collection_skips_null_keys() {
        let value = json!({"items": null, "cart": {"items": [{"id": 3}]}});
        let items: Vec<Item> = collection(value, CART_KEYS).unwrap();
        assert_eq!(ids(&items), [3]);
    }

    #[test]
    fn test_cart_envelopes() {
        let shapes = [
            json!({"products": [{"id": 4}]}),
            json!({"items": [{"id": 4}]}),
            json!({"cart": [{"id": 4}]}),
            json!({"data": {"cart": {"items": [{"id": 4}]}}}),
        ];
        for shape in shapes {
            let items: Vec<Item> = collection(shape, CART_KEYS).unwrap();
            assert_eq!(ids(&items), [4]);
        }
    }

    #[test]
    fn test_collection_rejects_unknown_shapes() {
        let err = collection::<Item>(json!({"results": []}), PRODUCT_KEYS).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(ref m) if m.contains("results")));

        let err = collection::<Item>(json!("nope"), PRODUCT_KEYS).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));

        let err = collection::<Item>(json!({"products": 5}), PRODUCT_KEYS).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));
    }

    #[test]
    fn test_collection_reports_bad_elements_as_parse_errors() {
        let err = collection::<Item>(json!([{"id": "x"}]), PRODUCT_KEYS).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_single_unwraps_envelopes() {
        let direct: Item = single(json!({"id": 4}), &["product", "data"]).unwrap();
        assert_eq!(direct.id, 4);

        let wrapped: Item = single(json!({"data": {"product": {"id": 5}}}), &["product", "data"]).unwrap();
        assert_eq!(wrapped.id, 5);

        let err = single::<Item>(json!([{"id": 1}]), &["data"]).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));
    }

    #[test]
    fn test_find_string_searches_nested() {
        let value = json!({"data": {"order": {"_id": "abc"}}});
        assert_eq!(
            find_string(&value, &["orderId", "_id"], &["order", "data"]),
            Some("abc".to_string())
        );
        assert_eq!(find_string(&json!({"token": 5}), &["token"], &[]), None);
    }
}
