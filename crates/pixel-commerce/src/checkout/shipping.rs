//! Flat-rate shipping with a free-shipping threshold.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Shipping is free once the cart subtotal reaches the threshold, otherwise a
/// flat fee is charged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawShippingPolicy")]
pub struct ShippingPolicy {
    free_shipping_threshold: Money,
    flat_fee: Money,
}

#[derive(Deserialize)]
struct RawShippingPolicy {
    free_shipping_threshold: Money,
    flat_fee: Money,
}

impl TryFrom<RawShippingPolicy> for ShippingPolicy {
    type Error = CommerceError;

    fn try_from(raw: RawShippingPolicy) -> Result<Self, Self::Error> {
        Self::new(raw.free_shipping_threshold, raw.flat_fee)
    }
}

impl Default for ShippingPolicy {
    /// R$ 99,00 threshold, R$ 15,90 fee.
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::brl(9900),
            flat_fee: Money::brl(1590),
        }
    }
}

impl ShippingPolicy {
    /// Both amounts must share a currency and be non-negative.
    pub fn new(free_shipping_threshold: Money, flat_fee: Money) -> Result<Self, CommerceError> {
        if free_shipping_threshold.currency != flat_fee.currency {
            return Err(CommerceError::currency_mismatch(
                free_shipping_threshold.currency,
                flat_fee.currency,
            ));
        }
        for amount in [free_shipping_threshold, flat_fee] {
            if amount.is_negative() {
                return Err(CommerceError::InvalidAmount(amount.display_amount()));
            }
        }
        Ok(Self {
            free_shipping_threshold,
            flat_fee,
        })
    }

    pub fn currency(&self) -> Currency {
        self.flat_fee.currency
    }

    pub fn free_shipping_threshold(&self) -> Money {
        self.free_shipping_threshold
    }

    pub fn flat_fee(&self) -> Money {
        self.flat_fee
    }

    fn check_currency(&self, subtotal: &Money) -> Result<(), CommerceError> {
        if subtotal.currency == self.currency() {
            Ok(())
        } else {
            Err(CommerceError::currency_mismatch(
                self.currency(),
                subtotal.currency,
            ))
        }
    }

    /// Shipping charged for a subtotal: zero at or above the threshold.
    pub fn shipping_for(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        self.check_currency(subtotal)?;
        if subtotal.amount_cents >= self.free_shipping_threshold.amount_cents {
            Ok(Money::zero(self.currency()))
        } else {
            Ok(self.flat_fee)
        }
    }

    /// How much more the shopper must add to ship for free ("faltam R$ X").
    pub fn remaining_for_free_shipping(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        self.check_currency(subtotal)?;
        let missing = self.free_shipping_threshold.checked_sub(subtotal)?;
        Ok(if missing.is_positive() {
            missing
        } else {
            Money::zero(self.currency())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.shipping_for(&Money::brl(9900)).unwrap(), Money::brl(0));
        assert_eq!(policy.shipping_for(&Money::brl(9899)).unwrap(), Money::brl(1590));
        assert_eq!(policy.shipping_for(&Money::brl(0)).unwrap(), Money::brl(1590));
    }

    #[test]
    fn test_remaining_for_free_shipping() {
        let policy = ShippingPolicy::default();
        assert_eq!(
            policy.remaining_for_free_shipping(&Money::brl(1990)).unwrap(),
            Money::brl(7910)
        );
        assert!(policy
            .remaining_for_free_shipping(&Money::brl(10570))
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_rejects_mixed_currencies() {
        assert!(ShippingPolicy::new(Money::brl(9900), Money::new(1590, Currency::USD)).is_err());
        assert!(ShippingPolicy::new(Money::brl(9900), Money::brl(-1)).is_err());
        let policy = ShippingPolicy::default();
        assert!(policy.shipping_for(&Money::new(100, Currency::EUR)).is_err());
    }

    #[test]
    fn test_deserialize_goes_through_checks() {
        let json = serde_json::to_string(&ShippingPolicy::default()).unwrap();
        let policy: ShippingPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, ShippingPolicy::default());

        let negative = r#"{
            "free_shipping_threshold": {"amount_cents": 9900, "currency": "BRL"},
            "flat_fee": {"amount_cents": -1590, "currency": "BRL"}
        }"#;
        assert!(serde_json::from_str::<ShippingPolicy>(negative).is_err());

        let mixed = r#"{
            "free_shipping_threshold": {"amount_cents": 9900, "currency": "BRL"},
            "flat_fee": {"amount_cents": 1590, "currency": "USD"}
        }"#;
        assert!(serde_json::from_str::<ShippingPolicy>(mixed).is_err());
    }
}
