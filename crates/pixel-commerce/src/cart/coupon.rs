//! Percentage coupons.

use crate::error::CommerceError;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A percentage-off coupon.
///
/// The discount is held in basis points so that "12.5" percent stays exact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coupon {
    pub code: String,
    #[serde(rename = "discount_percent", with = "percent")]
    pub discount_bp: i64,
    pub valid_until: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub usage_count: i64,
}

fn default_true() -> bool {
    true
}

impl Coupon {
    /// `percent` in whole percent (10 = 10% off).
    pub fn percent(code: impl Into<String>, percent: i64, valid_until: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            discount_bp: percent * 100,
            valid_until,
            is_active: true,
            usage_limit: None,
            usage_count: 0,
        }
    }

    pub fn with_usage_limit(mut self, limit: i64) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    fn reject(&self, reason: &str) -> CommerceError {
        CommerceError::InvalidCoupon {
            code: self.code.clone(),
            reason: reason.to_string(),
        }
    }

    /// Whether the coupon may be redeemed at `now`.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), CommerceError> {
        if !self.is_active {
            return Err(self.reject("inactive"));
        }
        if now > self.valid_until {
            return Err(self.reject("expired"));
        }
        if !(0..=10_000).contains(&self.discount_bp) {
            return Err(self.reject("discount outside 0-100%"));
        }
        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Err(self.reject("usage limit reached"));
            }
        }
        Ok(())
    }

    /// Amount taken off `subtotal`, rounded half up to the cent.
    pub fn discount_for(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        subtotal.basis_points(self.discount_bp)
    }
}

/// Percentages on the wire are decimals ("12.5"); in memory they are basis points.
mod percent {
    use crate::money::{self, Money};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bp: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        money::decimal::serialize(&Money::brl(*bp), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        money::decimal::deserialize(deserializer).map(|m| m.amount_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fractional_percent_from_json() {
        let coupon: Coupon = serde_json::from_value(serde_json::json!({
            "code": "PIXEL-12",
            "discount_percent": 12.5,
            "valid_until": "2024-12-31T23:59:59Z"
        }))
        .unwrap();
        assert_eq!(coupon.discount_bp, 1250);
        assert!(coupon.is_active);
        assert_eq!(
            coupon.discount_for(&Money::brl(10000)).unwrap(),
            Money::brl(1250)
        );
        let json = serde_json::to_value(&coupon).unwrap();
        assert_eq!(json["discount_percent"], "12.50");
    }

    #[test]
    fn test_rounds_half_up() {
        let coupon = Coupon::percent("DEZ", 10, now());
        // 10% of 19.95 is 1.995
        assert_eq!(coupon.discount_for(&Money::brl(1995)).unwrap(), Money::brl(200));
    }

    #[test]
    fn test_rejections() {
        let valid = Coupon::percent("DEZ", 10, now() + Duration::days(1));
        assert!(valid.check(now()).is_ok());

        let expired = Coupon::percent("DEZ", 10, now() - Duration::seconds(1));
        assert!(matches!(
            expired.check(now()),
            Err(CommerceError::InvalidCoupon { reason, .. }) if reason == "expired"
        ));

        let mut inactive = valid.clone();
        inactive.is_active = false;
        assert!(inactive.check(now()).is_err());

        let mut used_up = valid.clone().with_usage_limit(3);
        used_up.usage_count = 3;
        assert!(used_up.check(now()).is_err());

        let too_generous = Coupon::percent("TUDO", 150, now() + Duration::days(1));
        assert!(too_generous.check(now()).is_err());
    }
}
