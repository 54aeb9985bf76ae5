//! Brazilian postal address.

use serde::{Deserialize, Serialize};

/// Shipping address as stored in the `shipping_address` JSON columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state code (e.g., "SP").
    pub state: String,
    /// CEP, with or without the hyphen.
    #[serde(rename = "zipCode", alias = "zip_code")]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "BR".to_string()
}

impl ShippingAddress {
    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![format!("{}, {}", self.street, self.number)];
        if let Some(complement) = self.complement.as_deref().filter(|c| !c.is_empty()) {
            parts.push(complement.to_string());
        }
        parts.push(self.neighborhood.clone());
        parts.push(format!("{}/{}", self.city, self.state));
        parts.push(self.zip_code.clone());
        parts.join(" - ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_country_and_accepts_camel_case_zip() {
        let address: ShippingAddress = serde_json::from_value(serde_json::json!({
            "street": "Rua Augusta",
            "number": "1500",
            "neighborhood": "Consolação",
            "city": "São Paulo",
            "state": "SP",
            "zipCode": "01304-001"
        }))
        .unwrap();
        assert_eq!(address.country, "BR");
        assert_eq!(
            address.one_line(),
            "Rua Augusta, 1500 - Consolação - São Paulo/SP - 01304-001"
        );
    }
}
