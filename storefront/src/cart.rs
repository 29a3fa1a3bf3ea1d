//! Cart operations.
//!
//! All mutators are total: malformed input is clamped or ignored, never an
//! error. The reducer calls these against the state's cart slice; they are
//! public because totals and merge behavior are also useful standalone.

use crate::types::{CartItem, CartKind, Money};

/// Add an item, merging on the `(kind, ref_id, name)` key
///
/// A quantity of 0 is clamped to 1. When a line with the same key exists its
/// quantity grows by the incoming quantity and the incoming price is
/// discarded (first write wins).
pub fn add(cart: &mut Vec<CartItem>, mut item: CartItem) {
    if item.qty == 0 {
        item.qty = 1;
    }
    if let Some(existing) = cart.iter_mut().find(|line| line.merges_with(&item)) {
        existing.qty = existing.qty.saturating_add(item.qty);
    } else {
        cart.push(item);
    }
}

/// Set a line's quantity; `qty <= 0` removes the line
///
/// Out-of-range indices are ignored.
pub fn update_qty(cart: &mut Vec<CartItem>, index: usize, qty: i64) {
    if index >= cart.len() {
        return;
    }
    if qty <= 0 {
        cart.remove(index);
    } else if let Some(line) = cart.get_mut(index) {
        line.qty = u32::try_from(qty).unwrap_or(u32::MAX);
    }
}

/// Remove a line; out-of-range indices are ignored
pub fn remove(cart: &mut Vec<CartItem>, index: usize) {
    if index < cart.len() {
        cart.remove(index);
    }
}

/// Sum of `unit_price * qty` over all lines, in cents
#[must_use]
pub fn subtotal(cart: &[CartItem]) -> Money {
    cart.iter()
        .fold(Money::ZERO, |acc, line| acc.saturating_add(line.line_total()))
}

/// Sum over lines of one kind only, in cents
#[must_use]
pub fn subtotal_of(cart: &[CartItem], kind: CartKind) -> Money {
    cart.iter()
        .filter(|line| line.kind == kind)
        .fold(Money::ZERO, |acc, line| acc.saturating_add(line.line_total()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RefId;
    use proptest::prelude::*;

    fn merch(name: &str, ref_id: &str, qty: u32, unit_cents: u64) -> CartItem {
        CartItem {
            kind: CartKind::Merch,
            ref_id: Some(RefId::from(ref_id)),
            name: name.to_owned(),
            qty,
            unit_price: Money::from_cents(unit_cents),
        }
    }

    #[test]
    fn equal_keys_merge_into_one_line() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 1, 2_500_000));
        add(&mut cart, merch("Polera", "1", 2, 2_500_000));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].qty, 3);
    }

    #[test]
    fn merge_keeps_the_first_price() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 1, 2_500_000));
        add(&mut cart, merch("Polera", "1", 1, 9_999_999));

        assert_eq!(cart[0].unit_price, Money::from_cents(2_500_000));
        assert_eq!(subtotal(&cart), Money::from_cents(5_000_000));
    }

    #[test]
    fn different_ref_ids_stay_separate() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 1, 2_500_000));
        add(&mut cart, merch("Polera", "2", 1, 2_500_000));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn zero_qty_add_is_clamped_to_one() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Gorra", "2", 0, 1_800_000));

        assert_eq!(cart[0].qty, 1);
    }

    #[test]
    fn zero_and_negative_qty_updates_remove_the_line() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 2, 2_500_000));
        add(&mut cart, merch("Gorra", "2", 1, 1_800_000));

        update_qty(&mut cart, 0, 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].name, "Gorra");

        update_qty(&mut cart, 0, -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_no_ops() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 1, 2_500_000));

        update_qty(&mut cart, 7, 3);
        remove(&mut cart, 7);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].qty, 1);
    }

    #[test]
    fn removal_decreases_subtotal_by_the_line_contribution() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 2, 2_500_000));
        add(&mut cart, merch("Gorra", "2", 1, 1_800_000));

        let before = subtotal(&cart);
        let contribution = cart[0].line_total();
        remove(&mut cart, 0);

        assert_eq!(
            subtotal(&cart).cents(),
            before.cents() - contribution.cents()
        );
    }

    #[test]
    fn subtotal_of_filters_by_kind() {
        let mut cart = Vec::new();
        add(&mut cart, merch("Polera", "1", 2, 250_000));
        add(
            &mut cart,
            CartItem {
                kind: CartKind::Ticket,
                ref_id: Some(RefId::from("platinum")),
                name: "Platinum".into(),
                qty: 1,
                unit_price: Money::from_cents(12_650_000),
            },
        );

        assert_eq!(subtotal_of(&cart, CartKind::Merch), Money::from_cents(500_000));
        assert_eq!(
            subtotal_of(&cart, CartKind::Ticket),
            Money::from_cents(12_650_000)
        );
    }

    fn arb_item() -> impl Strategy<Value = CartItem> {
        (
            prop_oneof![
                Just(CartKind::Ticket),
                Just(CartKind::Merch),
                Just(CartKind::Locker)
            ],
            prop::option::of("[0-9]{1}"),
            "[a-c]{1}",
            0u32..5,
            0u64..100_000,
        )
            .prop_map(|(kind, ref_id, name, qty, cents)| CartItem {
                kind,
                ref_id: ref_id.map(RefId::new),
                name,
                qty,
                unit_price: Money::from_cents(cents),
            })
    }

    proptest! {
        #[test]
        fn subtotal_is_monotonic_under_adds(items in prop::collection::vec(arb_item(), 0..20)) {
            let mut cart = Vec::new();
            let mut previous = Money::ZERO;
            for item in items {
                add(&mut cart, item);
                let current = subtotal(&cart);
                prop_assert!(current >= previous);
                previous = current;
            }
        }

        #[test]
        fn adds_never_duplicate_a_merge_key(items in prop::collection::vec(arb_item(), 0..20)) {
            let mut cart = Vec::new();
            for item in items {
                add(&mut cart, item);
            }
            for (i, a) in cart.iter().enumerate() {
                for b in cart.iter().skip(i + 1) {
                    prop_assert!(!a.merges_with(b));
                }
            }
        }

        #[test]
        fn lines_always_carry_positive_qty(items in prop::collection::vec(arb_item(), 0..20)) {
            let mut cart = Vec::new();
            for item in items {
                add(&mut cart, item);
            }
            prop_assert!(cart.iter().all(|line| line.qty >= 1));
        }
    }
}
