//! Table query builder.
//!
//! Builds the provider's REST query syntax: filters are `column=op.value`
//! pairs, ordering is `order=col.asc,col2.desc`, and paging uses `limit` and
//! `offset`. Terminal methods send the request and decode the rows.

use crate::request::{Method, RequestBuilder};
use crate::{FetchError, Request, RestClient};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Wrap a search term for a case-insensitive substring match.
///
/// `%`, `_` and `\` in the term are escaped. The provider turns every `*`
/// into `%`, so a typed `*` is narrowed to `_` (any one character).
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('*');
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                pattern.push('\\');
                pattern.push(c);
            }
            '*' => pattern.push('_'),
            other => pattern.push(other),
        }
    }
    pattern.push('*');
    pattern
}

/// Quote a value for use inside an `or=(...)` group.
///
/// Values containing the group's reserved characters are wrapped in double
/// quotes with embedded quotes and backslashes escaped.
pub fn or_value(value: &str) -> String {
    if value.contains(&[',', '(', ')', '.', ':', '"', '\\', ' '][..]) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

/// A query against one table.
#[derive(Debug, Clone)]
pub struct TableQuery<'a> {
    client: &'a RestClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    on_conflict: Option<String>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(client: &'a RestClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            on_conflict: None,
        }
    }

    /// Columns (and embedded relations) to return, e.g. `*, products(id, name)`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{}.{}", op, value)));
        self
    }

    /// `column = value`
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    /// `column >= value`
    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    /// `column <= value`
    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Disjunction of raw conditions such as `name.ilike.*x*`.
    pub fn or<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = conditions
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push(("or".to_string(), format!("({})", joined)));
        self
    }

    /// Order by a column. Multiple calls add tie-breakers.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{}", column, dir));
        self
    }

    /// Maximum number of rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Inclusive row range, zero-based.
    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.offset = Some(from);
        self.limit = Some(to.saturating_sub(from) + 1);
        self
    }

    /// Conflict target columns for [`upsert`](Self::upsert).
    pub fn on_conflict(mut self, columns: impl Into<String>) -> Self {
        self.on_conflict = Some(columns.into());
        self
    }

    /// Absolute URL for this query.
    pub fn url(&self) -> Result<String, FetchError> {
        let mut url = Url::parse(&self.client.table_url(&self.table))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(on_conflict) = &self.on_conflict {
            pairs.push(("on_conflict".to_string(), on_conflict.clone()));
        }

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url.into())
    }

    fn request(&self, method: Method) -> Result<RequestBuilder, FetchError> {
        Ok(self.client.request_builder(method, self.url()?))
    }

    async fn send(&self, request: Request) -> Result<crate::Response, FetchError> {
        debug!(table = %self.table, method = request.method.as_str(), "table query");
        self.client.execute(request).await
    }

    // === Reads ===

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, FetchError> {
        let request = self.request(Method::Get)?.build();
        self.send(request).await?.json()
    }

    /// Fetch exactly one row. Zero or several matches are provider errors.
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let request = self.request(Method::Get)?.accept(SINGLE_OBJECT).build();
        self.send(request).await?.json()
    }

    /// Fetch one row, mapping the provider's no-rows error to `None`.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, FetchError> {
        match self.single().await {
            Ok(row) => Ok(Some(row)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Count matching rows without transferring them.
    pub async fn count(self) -> Result<u64, FetchError> {
        let request = self.request(Method::Head)?.prefer("count=exact").build();
        self.send(request)
            .await?
            .total_count()
            .ok_or_else(|| FetchError::ParseError("missing Content-Range total".to_string()))
    }

    // === Writes ===

    /// Insert one row and return it as stored.
    pub async fn insert<B, T>(self, row: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::Post)?
            .prefer("return=representation")
            .accept(SINGLE_OBJECT)
            .json(row)?
            .build();
        self.send(request).await?.json()
    }

    /// Insert rows without reading anything back.
    pub async fn insert_minimal<B>(self, rows: &B) -> Result<(), FetchError>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::Post)?
            .prefer("return=minimal")
            .json(rows)?
            .build();
        self.send(request).await.map(|_| ())
    }

    /// Insert or merge one row on the conflict target, returning the stored row.
    pub async fn upsert<B, T>(self, row: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::Post)?
            .prefer("resolution=merge-duplicates")
            .prefer("return=representation")
            .accept(SINGLE_OBJECT)
            .json(row)?
            .build();
        self.send(request).await?.json()
    }

    /// Patch the single matching row and return it.
    pub async fn update<B, T>(self, patch: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::Patch)?
            .prefer("return=representation")
            .accept(SINGLE_OBJECT)
            .json(patch)?
            .build();
        self.send(request).await?.json()
    }

    /// Delete matching rows.
    pub async fn delete(self) -> Result<(), FetchError> {
        let request = self.request(Method::Delete)?.build();
        self.send(request).await.map(|_| ())
    }
}
