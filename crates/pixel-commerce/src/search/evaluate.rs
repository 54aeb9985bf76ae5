//! Filter and sort evaluation over an in-memory product list.

use crate::catalog::Product;
use crate::search::{ActivityFilter, FilterCriteria, SortMode};
use std::cmp::Ordering;

/// Products satisfying `criteria`, ordered by `sort`.
///
/// Sorting is stable, so products that compare equal keep their input order.
/// An inverted price range (min above max) yields nothing.
pub fn evaluate<'a>(
    products: &'a [Product],
    criteria: &FilterCriteria,
    sort: SortMode,
) -> Vec<&'a Product> {
    if criteria.has_inverted_price_range() {
        return Vec::new();
    }
    let mut visible: Vec<&Product> = products.iter().filter(|p| criteria.matches(p)).collect();
    sort_products(&mut visible, sort);
    visible
}

/// Stable in-place sort.
pub fn sort_products(products: &mut [&Product], sort: SortMode) {
    products.sort_by(|a, b| compare(a, b, sort));
}

fn compare(a: &Product, b: &Product, sort: SortMode) -> Ordering {
    match sort {
        SortMode::Name => name_key(&a.name)
            .cmp(&name_key(&b.name))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortMode::PriceAsc => a.price.amount_cents.cmp(&b.price.amount_cents),
        SortMode::Newest => b.created_at.cmp(&a.created_at),
    }
}

/// Lowercased name with Latin accents folded, so "Árvore" sorts among the a's.
fn name_key(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Admin product table: text search plus active/inactive, newest first.
pub fn admin_search<'a>(
    products: &'a [Product],
    term: &str,
    activity: ActivityFilter,
) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    let mut rows: Vec<&Product> = products
        .iter()
        .filter(|p| activity.matches(p))
        .filter(|p| needle.is_empty() || p.matches_text(&needle))
        .collect();
    sort_products(&mut rows, SortMode::Newest);
    rows
}
