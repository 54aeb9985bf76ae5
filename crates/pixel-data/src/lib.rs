//! REST client for the hosted table provider.
//!
//! The provider exposes every table under `/rest/v1/<table>` and authenticates
//! with an `apikey` header plus a bearer token. [`RestClient`] carries those
//! credentials and hands out [`TableQuery`] builders; the network hop goes
//! through a [`Transport`] so tests can swap in [`MockTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pixel_data::RestClient;
//!
//! let client = RestClient::new("https://project.provider.co", anon_key);
//! let featured: Vec<ProductRow> = client
//!     .from("products")
//!     .select("*")
//!     .eq("is_active", true)
//!     .eq("is_featured", true)
//!     .order("created_at", false)
//!     .limit(8)
//!     .fetch()
//!     .await?;
//! ```

mod error;
mod query;
mod request;
mod response;
mod transport;

pub use error::{FetchError, ProviderError, NO_ROWS_CODE};
pub use query::{contains_pattern, or_value, TableQuery};
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use transport::{HttpTransport, MockTransport, Transport};

use std::fmt;
use std::sync::Arc;

/// Client bound to one provider project.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.access_token.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client using the default HTTP transport.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            transport: Arc::new(HttpTransport::default()),
        }
    }

    /// Replace the transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Send a session or service token instead of the api key as bearer.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Base URL of the project.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    /// Start a query against a table.
    pub fn from(&self, table: impl Into<String>) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// A request builder with the credential headers already set.
    pub fn request_builder(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.api_key);
        RequestBuilder::new(method, url)
            .header("apikey", self.api_key.clone())
            .bearer_auth(token)
    }

    /// Send a request and turn error statuses into [`FetchError`]s.
    pub async fn execute(&self, request: Request) -> Result<Response, FetchError> {
        self.transport.send(request).await?.error_for_status()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchError, ProviderError, RestClient, TableQuery, Transport};
}
