//! Filter criteria and sort modes for the catalog view.

use crate::catalog::{Category, Material, Product};
use crate::money::{self, Money};
use serde::{Deserialize, Serialize};

/// Conjunctive product filter. Unset fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the name or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    /// Inclusive lower bound.
    #[serde(
        default,
        with = "money::decimal_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_price: Option<Money>,
    /// Inclusive upper bound.
    #[serde(
        default,
        with = "money::decimal_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<Money>,
    #[serde(default)]
    pub featured_only: bool,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Set either or both price bounds.
    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Search term, or `None` when unset or empty.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Number of active constraints (the "N filters" badge).
    pub fn active_count(&self) -> usize {
        [
            self.search_term().is_some(),
            self.category.is_some(),
            self.material.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.featured_only,
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// No constraint is set.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Both bounds set with min above max. Such a range matches nothing.
    pub fn has_inverted_price_range(&self) -> bool {
        matches!(
            (self.min_price, self.max_price),
            (Some(min), Some(max)) if min.amount_cents > max.amount_cents
        )
    }

    /// Whether a single product satisfies every set criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.search_term() {
            if !product.matches_text(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if product.category.as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(material) = &self.material {
            if product.material.as_ref() != Some(material) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price.amount_cents < min.amount_cents {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price.amount_cents > max.amount_cents {
                return false;
            }
        }
        !self.featured_only || product.is_featured
    }
}

/// Ordering of the visible products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Name A-Z, ignoring case.
    Name,
    /// Cheapest first.
    PriceAsc,
    /// Most recently created first.
    #[default]
    Newest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::PriceAsc => "price",
            SortMode::Newest => "newest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(SortMode::Name),
            "price" | "price_asc" => Some(SortMode::PriceAsc),
            "newest" => Some(SortMode::Newest),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortMode::Name => "Nome A-Z",
            SortMode::PriceAsc => "Menor Preço",
            SortMode::Newest => "Mais Recentes",
        }
    }
}

/// Admin listing filter on the active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActivityFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Active => product.is_active,
            ActivityFilter::Inactive => !product.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_count() {
        assert_eq!(FilterCriteria::new().active_count(), 0);
        assert!(FilterCriteria::new().with_search("").is_empty());

        let criteria = FilterCriteria::new()
            .with_search("vaso")
            .with_category(Category::Decorative)
            .with_price_range(Some(Money::brl(1000)), None)
            .featured();
        assert_eq!(criteria.active_count(), 4);
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_inverted_price_range() {
        let criteria =
            FilterCriteria::new().with_price_range(Some(Money::brl(5000)), Some(Money::brl(1000)));
        assert!(criteria.has_inverted_price_range());
        let criteria =
            FilterCriteria::new().with_price_range(Some(Money::brl(1000)), Some(Money::brl(1000)));
        assert!(!criteria.has_inverted_price_range());
    }

    #[test]
    fn test_sort_mode_names() {
        assert_eq!(SortMode::default(), SortMode::Newest);
        assert_eq!(SortMode::from_str("Price"), Some(SortMode::PriceAsc));
        assert_eq!(SortMode::from_str("rating"), None);
        assert_eq!(SortMode::Name.display_name(), "Nome A-Z");
    }

    #[test]
    fn test_criteria_deserializes_decimal_bounds() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"category":"decorative","min_price":"10.00","max_price":50}"#)
                .unwrap();
        assert_eq!(criteria.min_price, Some(Money::brl(1000)));
        assert_eq!(criteria.max_price, Some(Money::brl(5000)));
        assert!(!criteria.featured_only);
    }
}
