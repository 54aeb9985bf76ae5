//! Catalog view state.
//!
//! Holds the full product list with the shopper's criteria and sort mode.
//! Each load is tagged with a [`RequestToken`]; a result arriving for a token
//! older than the latest one issued is dropped, so a slow early response can
//! never overwrite a newer one.

use crate::catalog::Product;
use crate::search::{evaluate, FilterCriteria, SortMode};
use tracing::debug;

/// Generation number of a catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Where the latest load stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Inputs to [`CatalogStore::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    /// A fetch was issued; the store hands back its token.
    LoadStarted,
    LoadSucceeded {
        token: RequestToken,
        products: Vec<Product>,
    },
    LoadFailed {
        token: RequestToken,
        error: String,
    },
    SetCriteria(FilterCriteria),
    ClearCriteria,
    SetSort(SortMode),
}

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Started(RequestToken),
    Applied,
    /// The action carried a superseded token and was ignored.
    Stale,
}

/// Catalog state container.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    criteria: FilterCriteria,
    sort: SortMode,
    state: LoadState,
    latest: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `products`.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            state: LoadState::Ready,
            ..Self::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Products to render: the current criteria and sort applied to the list.
    pub fn visible(&self) -> Vec<&Product> {
        evaluate(&self.products, &self.criteria, self.sort)
    }

    pub fn dispatch(&mut self, action: CatalogAction) -> Dispatched {
        match action {
            CatalogAction::LoadStarted => Dispatched::Started(self.begin_load()),
            CatalogAction::LoadSucceeded { token, products } => {
                if self.is_stale(token) {
                    return Dispatched::Stale;
                }
                debug!(generation = token.0, count = products.len(), "catalog loaded");
                self.products = products;
                self.state = LoadState::Ready;
                Dispatched::Applied
            }
            CatalogAction::LoadFailed { token, error } => {
                if self.is_stale(token) {
                    return Dispatched::Stale;
                }
                // Keep the last good list on screen.
                self.state = LoadState::Failed(error);
                Dispatched::Applied
            }
            CatalogAction::SetCriteria(criteria) => {
                self.criteria = criteria;
                Dispatched::Applied
            }
            CatalogAction::ClearCriteria => {
                self.criteria = FilterCriteria::default();
                Dispatched::Applied
            }
            CatalogAction::SetSort(sort) => {
                self.sort = sort;
                Dispatched::Applied
            }
        }
    }

    /// Issue the token for a new load.
    pub fn begin_load(&mut self) -> RequestToken {
        self.latest += 1;
        self.state = LoadState::Loading;
        RequestToken(self.latest)
    }

    fn is_stale(&self, token: RequestToken) -> bool {
        let stale = token.0 != self.latest;
        if stale {
            debug!(
                generation = token.0,
                latest = self.latest,
                "discarding stale catalog response"
            );
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixtures, Category};

    fn started(store: &mut CatalogStore) -> RequestToken {
        match store.dispatch(CatalogAction::LoadStarted) {
            Dispatched::Started(token) => token,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_load_then_filter() {
        let mut store = CatalogStore::new();
        assert_eq!(store.state(), &LoadState::Idle);
        let token = started(&mut store);
        assert!(store.is_loading());

        let applied = store.dispatch(CatalogAction::LoadSucceeded {
            token,
            products: fixtures::demo_products(),
        });
        assert_eq!(applied, Dispatched::Applied);
        assert_eq!(store.state(), &LoadState::Ready);
        assert_eq!(store.visible().len(), 6);

        store.dispatch(CatalogAction::SetCriteria(
            FilterCriteria::new().with_category(Category::Decorative),
        ));
        store.dispatch(CatalogAction::SetSort(SortMode::PriceAsc));
        let names: Vec<_> = store.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Vaso Geométrico", "Dragão Pixel Art"]);

        store.dispatch(CatalogAction::ClearCriteria);
        assert_eq!(store.visible().len(), 6);
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut store = CatalogStore::new();
        let first = started(&mut store);
        let second = started(&mut store);

        let fresh = fixtures::demo_products();
        assert_eq!(
            store.dispatch(CatalogAction::LoadSucceeded {
                token: second,
                products: fresh.clone(),
            }),
            Dispatched::Applied
        );
        // The slower first request lands afterwards.
        assert_eq!(
            store.dispatch(CatalogAction::LoadSucceeded {
                token: first,
                products: Vec::new(),
            }),
            Dispatched::Stale
        );
        assert_eq!(store.products(), fresh.as_slice());
    }

    #[test]
    fn test_failure_keeps_previous_products() {
        let mut store = CatalogStore::with_products(fixtures::demo_products());
        let token = started(&mut store);
        store.dispatch(CatalogAction::LoadFailed {
            token,
            error: "connection refused".to_string(),
        });
        assert_eq!(
            store.state(),
            &LoadState::Failed("connection refused".to_string())
        );
        assert_eq!(store.products().len(), 6);

        let old = token;
        let _newer = started(&mut store);
        assert_eq!(
            store.dispatch(CatalogAction::LoadFailed {
                token: old,
                error: "late".to_string(),
            }),
            Dispatched::Stale
        );
        assert!(store.is_loading());
    }
}
