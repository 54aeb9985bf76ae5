//! Money type for representing monetary values.
//!
//! Amounts are integer cents. Decimal text ("29.90", "29,90") and JSON numbers
//! are parsed digit by digit, never through floating point arithmetic, so a
//! cart total can't drift by a cent.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency the store prices in.
pub const STORE_CURRENCY: Currency = Currency::BRL;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    fn separators(&self) -> (char, char) {
        match self {
            Currency::BRL | Currency::EUR => (',', '.'),
            Currency::USD => ('.', ','),
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Cents in the store currency.
    pub fn brl(amount_cents: i64) -> Self {
        Self::new(amount_cents, Currency::BRL)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a decimal literal such as `29.90`, `29,9` or `-5`.
    ///
    /// Either `.` or `,` is accepted as the decimal separator. More fractional
    /// digits than the currency allows is an error rather than a rounding.
    ///
    /// ```
    /// use pixel_commerce::money::{Currency, Money};
    /// let price = Money::parse("45.90", Currency::BRL).unwrap();
    /// assert_eq!(price.amount_cents, 4590);
    /// ```
    pub fn parse(text: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidAmount(text.to_string());
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.find(|c: char| c == '.' || c == ',') {
            Some(idx) => (&digits[..idx], &digits[idx + 1..]),
            None => (digits, ""),
        };
        let places = currency.decimal_places() as usize;
        if (whole.is_empty() && frac.is_empty())
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
            || frac.len() > places
        {
            return Err(invalid());
        }

        let scale = 10_i64.pow(places as u32);
        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_value: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = places);
            padded.parse().map_err(|_| invalid())?
        };

        let cents = whole_value
            .checked_mul(scale)
            .and_then(|c| c.checked_add(frac_value))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    fn same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CommerceError::currency_mismatch(self.currency, other.currency))
        }
    }

    /// Add another amount of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.same_currency(other)?;
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|c| Money::new(c, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another amount of the same currency.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, CommerceError> {
        self.same_currency(other)?;
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|c| Money::new(c, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a quantity.
    pub fn checked_mul(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_cents
            .checked_mul(factor)
            .map(|c| Money::new(c, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// A share of this amount given in basis points (1250 = 12.5%), rounded half up.
    pub fn basis_points(&self, bp: i64) -> Result<Money, CommerceError> {
        let product = (self.amount_cents as i128) * (bp as i128);
        let rounded = if product >= 0 {
            (product + 5_000) / 10_000
        } else {
            (product - 5_000) / 10_000
        };
        i64::try_from(rounded)
            .map(|c| Money::new(c, self.currency))
            .map_err(|_| CommerceError::Overflow)
    }

    /// Sum amounts, all of which must be in `currency`.
    pub fn sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    /// Plain decimal with a `.` separator (e.g., "29.90"), as the provider expects.
    pub fn display_amount(&self) -> String {
        let scale = 10_i64.pow(self.currency.decimal_places()) as u64;
        let abs = self.amount_cents.unsigned_abs();
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = self.currency.decimal_places() as usize
        )
    }

    /// Localised display string (e.g., "R$ 1.234,56" or "$49.99").
    pub fn display(&self) -> String {
        let (decimal_sep, group_sep) = self.currency.separators();
        let scale = 10_i64.pow(self.currency.decimal_places()) as u64;
        let abs = self.amount_cents.unsigned_abs();

        let whole = (abs / scale).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(ch);
        }

        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let space = if self.currency == Currency::BRL { " " } else { "" };
        format!(
            "{}{}{}{}{}{:0width$}",
            sign,
            self.currency.symbol(),
            space,
            grouped,
            decimal_sep,
            abs % scale,
            width = self.currency.decimal_places() as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Serde adapter for provider `numeric` columns holding store-currency amounts.
///
/// Accepts JSON numbers or strings; writes a decimal string so no precision is
/// lost on the way back.
pub mod decimal {
    use super::{Money, STORE_CURRENCY};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.display_amount())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    pub(super) struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as a number or string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            Money::new(v, STORE_CURRENCY)
                .checked_mul(100)
                .map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            let v = i64::try_from(v).map_err(E::custom)?;
            self.visit_i64(v)
        }

        // Display of an f64 is its shortest round-trip form, so "29.9" stays "29.9".
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            Money::parse(&v.to_string(), STORE_CURRENCY).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse(v, STORE_CURRENCY).map_err(E::custom)
        }
    }
}

/// Like [`decimal`] for nullable columns.
pub mod decimal_option {
    use super::decimal::DecimalVisitor;
    use super::Money;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        value: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(m) => serializer.serialize_some(&m.display_amount()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Money>, D::Error> {
        deserializer.deserialize_option(OptionVisitor)
    }

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<Money>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an optional decimal amount")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(DecimalVisitor).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Parsing ===

    #[test]
    fn test_parse_decimal_literals() {
        assert_eq!(Money::parse("29.90", Currency::BRL).unwrap(), Money::brl(2990));
        assert_eq!(Money::parse("29,9", Currency::BRL).unwrap(), Money::brl(2990));
        assert_eq!(Money::parse("99", Currency::BRL).unwrap(), Money::brl(9900));
        assert_eq!(Money::parse(" 0.01 ", Currency::BRL).unwrap(), Money::brl(1));
        assert_eq!(Money::parse(".5", Currency::BRL).unwrap(), Money::brl(50));
        assert_eq!(Money::parse("-15.90", Currency::BRL).unwrap(), Money::brl(-1590));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", ".", "abc", "1.234.56", "12.345", "1e3", "R$ 10"] {
            assert!(Money::parse(bad, Currency::BRL).is_err(), "accepted {:?}", bad);
        }
        assert_eq!(
            Money::parse("99999999999999999999", Currency::BRL),
            Err(CommerceError::InvalidAmount("99999999999999999999".to_string()))
        );
    }

    // === Arithmetic ===

    #[test]
    fn test_no_float_drift() {
        // 0.1 + 0.2 style drift would break this with f64.
        let a = Money::parse("0.10", Currency::BRL).unwrap();
        let b = Money::parse("0.20", Currency::BRL).unwrap();
        assert_eq!(a.checked_add(&b).unwrap(), Money::parse("0.30", Currency::BRL).unwrap());
        assert_eq!(Money::brl(2990).checked_mul(3).unwrap(), Money::brl(8970));
    }

    #[test]
    fn test_currency_mismatch_is_an_error() {
        let brl = Money::brl(1000);
        let usd = Money::new(1000, Currency::USD);
        assert!(matches!(
            brl.checked_add(&usd),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let big = Money::brl(i64::MAX);
        assert_eq!(big.checked_add(&Money::brl(1)), Err(CommerceError::Overflow));
        assert_eq!(big.checked_mul(2), Err(CommerceError::Overflow));
    }

    #[test]
    fn test_basis_points_rounds_half_up() {
        assert_eq!(Money::brl(10570).basis_points(1000).unwrap(), Money::brl(1057));
        // 12.5% of 0.99 = 0.12375
        assert_eq!(Money::brl(99).basis_points(1250).unwrap(), Money::brl(12));
        assert_eq!(Money::brl(4).basis_points(5000).unwrap(), Money::brl(2));
        assert_eq!(Money::brl(5).basis_points(1000).unwrap(), Money::brl(1));
    }

    #[test]
    fn test_sum() {
        let items = [Money::brl(5980), Money::brl(4590)];
        assert_eq!(Money::sum(&items, Currency::BRL).unwrap(), Money::brl(10570));
        assert_eq!(Money::sum(&[], Currency::BRL).unwrap(), Money::brl(0));
    }

    // === Display ===

    #[test]
    fn test_display() {
        assert_eq!(Money::brl(2990).display(), "R$ 29,90");
        assert_eq!(Money::brl(123456).display(), "R$ 1.234,56");
        assert_eq!(Money::brl(-1590).display(), "-R$ 15,90");
        assert_eq!(Money::new(4999, Currency::USD).to_string(), "$49.99");
        assert_eq!(Money::brl(5).display_amount(), "0.05");
        assert_eq!(Money::brl(-1590).display_amount(), "-15.90");
    }

    // === Provider decimals ===

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(with = "decimal")]
        price: Money,
        #[serde(with = "decimal_option", default)]
        total: Option<Money>,
    }

    #[test]
    fn test_decimal_adapter_reads_numbers_and_strings() {
        let row: Row = serde_json::from_str(r#"{"price": 29.9, "total": "105.70"}"#).unwrap();
        assert_eq!(row.price, Money::brl(2990));
        assert_eq!(row.total, Some(Money::brl(10570)));

        let row: Row = serde_json::from_str(r#"{"price": 15, "total": null}"#).unwrap();
        assert_eq!(row.price, Money::brl(1500));
        assert_eq!(row.total, None);

        let row: Row = serde_json::from_str(r#"{"price": 45.90}"#).unwrap();
        assert_eq!(row.price, Money::brl(4590));
        assert_eq!(row.total, None);
    }

    #[test]
    fn test_decimal_adapter_writes_strings() {
        let row = Row {
            price: Money::brl(2990),
            total: None,
        };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"price":"29.90","total":null}"#
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("brl"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("JPY"), None);
    }
}
