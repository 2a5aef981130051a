//! Order pricing and line item validation
//!
//! An order's `total_price` is never accepted from a client: it is always
//! recomputed here from the items and must be strictly positive.

use crate::core::error::{OrderError, OrderResult};
use crate::core::order::{Item, ItemPatch};
use serde_json::Value;

const NAME_RULE: &str = "name is required";
const PRICE_RULE: &str = "price must be a non-negative number";
const QUANTITY_RULE: &str = "quantity must be a positive integer";

/// Sum of `price * quantity` across all items
pub fn compute_total(items: &[Item]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

/// Reject totals that are not strictly positive
pub fn validate_total(total: f64) -> OrderResult<()> {
    if !total.is_finite() || total <= 0.0 {
        return Err(OrderError::InvalidPricing { total });
    }
    Ok(())
}

/// Check a single line item
///
/// `position` only ends up in the error message.
pub fn validate_item(item: &Item, position: usize) -> OrderResult<()> {
    if item.name.trim().is_empty() {
        return Err(OrderError::invalid_item(position, NAME_RULE));
    }
    if !item.price.is_finite() || item.price < 0.0 {
        return Err(OrderError::invalid_item(position, PRICE_RULE));
    }
    if item.quantity < 1 {
        return Err(OrderError::invalid_item(position, QUANTITY_RULE));
    }
    Ok(())
}

/// Build the items of a new order, then compute and validate the total
///
/// There is no existing order, so every item must carry all of its fields.
pub fn price_items(items: &[ItemPatch]) -> OrderResult<(Vec<Item>, f64)> {
    let items = items
        .iter()
        .enumerate()
        .map(|(position, item)| merge_item(None, item, position))
        .collect::<OrderResult<Vec<_>>>()?;
    let total = compute_total(&items);
    validate_total(total)?;
    Ok((items, total))
}

/// Read a price: any finite JSON number
fn parse_price(value: &Value, position: usize) -> OrderResult<f64> {
    value
        .as_f64()
        .filter(|price| price.is_finite())
        .ok_or_else(|| OrderError::invalid_item(position, PRICE_RULE))
}

/// Read a quantity: a JSON integer from 1 to `u32::MAX` (`2.0` counts as 2)
fn parse_quantity(value: &Value, position: usize) -> OrderResult<u32> {
    let quantity = match value.as_u64() {
        Some(quantity) => Some(quantity),
        None => value
            .as_f64()
            .filter(|q| q.fract() == 0.0 && *q >= 0.0 && *q <= f64::from(u32::MAX))
            .map(|q| q as u64),
    };
    quantity
        .and_then(|q| u32::try_from(q).ok())
        .ok_or_else(|| OrderError::invalid_item(position, QUANTITY_RULE))
}

/// Merge an item patch over the item previously stored at the same position
///
/// Fields missing from the patch keep the existing value. When there is no
/// existing item at that position every field becomes mandatory.
pub fn merge_item(existing: Option<&Item>, patch: &ItemPatch, position: usize) -> OrderResult<Item> {
    let name = patch
        .name
        .clone()
        .or_else(|| existing.map(|item| item.name.clone()))
        .ok_or_else(|| OrderError::invalid_item(position, NAME_RULE))?;
    let price = match &patch.price {
        Some(raw) => parse_price(raw, position)?,
        None => existing
            .map(|item| item.price)
            .ok_or_else(|| OrderError::invalid_item(position, PRICE_RULE))?,
    };
    let quantity = match &patch.quantity {
        Some(raw) => parse_quantity(raw, position)?,
        None => existing
            .map(|item| item.quantity)
            .ok_or_else(|| OrderError::invalid_item(position, QUANTITY_RULE))?,
    };

    let merged = Item {
        name,
        price,
        quantity,
    };
    validate_item(&merged, position)?;
    Ok(merged)
}

/// Merge a list of item patches against the existing items, index by index
///
/// The result has exactly as many items as the patch list.
pub fn merge_items(existing: &[Item], patches: &[ItemPatch]) -> OrderResult<Vec<Item>> {
    patches
        .iter()
        .enumerate()
        .map(|(position, patch)| merge_item(existing.get(position), patch, position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pizza() -> Item {
        Item::new("Pizza", 15.0, 2)
    }

    #[test]
    fn test_compute_total_sums_price_times_quantity() {
        let items = vec![pizza(), Item::new("Soda", 2.5, 4), Item::new("Bread", 0.0, 1)];
        assert_eq!(compute_total(&items), 40.0);
        assert_eq!(compute_total(&[]), 0.0);
    }

    #[test]
    fn test_validate_total_rejects_zero_and_negative() {
        assert!(validate_total(0.01).is_ok());
        assert!(matches!(
            validate_total(0.0),
            Err(OrderError::InvalidPricing { .. })
        ));
        assert!(matches!(
            validate_total(-3.0),
            Err(OrderError::InvalidPricing { .. })
        ));
        assert!(validate_total(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_item_rules() {
        assert!(validate_item(&pizza(), 0).is_ok());
        assert!(validate_item(&Item::new("Water", 0.0, 1), 0).is_ok());

        let err = validate_item(&Item::new("   ", 1.0, 1), 3).unwrap_err();
        assert!(matches!(err, OrderError::InvalidItem { position: 3, .. }));

        assert!(validate_item(&Item::new("Pizza", -1.0, 1), 0).is_err());
        assert!(validate_item(&Item::new("Pizza", f64::INFINITY, 1), 0).is_err());
        assert!(validate_item(&Item::new("Pizza", 1.0, 0), 0).is_err());
    }

    #[test]
    fn test_price_items_rejects_zero_total() {
        let err = price_items(&[ItemPatch::new("Water", 0.0, 1)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidPricing { total } if total == 0.0));

        let (items, total) = price_items(&[ItemPatch::from(&pizza())]).unwrap();
        assert_eq!(items, vec![pizza()]);
        assert_eq!(total, 30.0);
    }

    #[test]
    fn test_price_items_reports_bad_numbers_as_item_errors() {
        let cases = [
            json!({ "name": "Pizza", "price": 15.0, "quantity": -1 }),
            json!({ "name": "Pizza", "price": 15.0, "quantity": 1.5 }),
            json!({ "name": "Pizza", "price": 15.0, "quantity": "2" }),
            json!({ "name": "Pizza", "price": "abc", "quantity": 2 }),
            json!({ "name": "Pizza", "price": 15.0 }),
            json!({ "price": 15.0, "quantity": 2 }),
        ];

        for case in cases {
            let item: ItemPatch = serde_json::from_value(case.clone()).unwrap();
            let err = price_items(&[ItemPatch::from(&pizza()), item]).unwrap_err();
            assert!(
                matches!(err, OrderError::InvalidItem { position: 1, .. }),
                "{} gave {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_whole_float_quantity_is_accepted() {
        let item: ItemPatch =
            serde_json::from_value(json!({ "name": "Pizza", "price": 15, "quantity": 2.0 }))
                .unwrap();
        assert_eq!(merge_item(None, &item, 0).unwrap(), pizza());
    }

    #[test]
    fn test_merge_item_keeps_existing_fields() {
        let patch = ItemPatch::default().with_price(20.0);
        let merged = merge_item(Some(&pizza()), &patch, 0).unwrap();
        assert_eq!(merged, Item::new("Pizza", 20.0, 2));
    }

    #[test]
    fn test_merge_item_rejects_bad_numbers_over_existing() {
        let patch = ItemPatch {
            quantity: Some(json!(-1)),
            ..Default::default()
        };
        let err = merge_item(Some(&pizza()), &patch, 0).unwrap_err();
        assert!(matches!(err, OrderError::InvalidItem { position: 0, .. }));
    }

    #[test]
    fn test_merge_item_beyond_existing_requires_all_fields() {
        let partial = ItemPatch {
            name: Some("Soda".to_string()),
            ..Default::default()
        }
        .with_price(2.0);
        let err = merge_item(None, &partial, 1).unwrap_err();
        assert!(matches!(err, OrderError::InvalidItem { position: 1, .. }));

        let full = partial.with_quantity(3);
        assert_eq!(merge_item(None, &full, 1).unwrap(), Item::new("Soda", 2.0, 3));
    }

    #[test]
    fn test_merge_items_truncates_to_patch_length() {
        let existing = vec![pizza(), Item::new("Soda", 2.0, 1)];
        let merged = merge_items(&existing, &[ItemPatch::default()]).unwrap();
        assert_eq!(merged, vec![pizza()]);
    }
}
