//! # REST Client
//!
//! JSON-over-HTTPS calls to the bakery API.
//!
//! Every request carries `Authorization: Bearer <token>` from the shared
//! [`Session`]. A 401 answer ends the session (forced) before the error is
//! returned, so the shell sees the logout event and redirects to login.
//!
//! ```ignore
//! let api = ApiClient::new(&config, session)?;
//! let sales: Vec<VendaDto> = api.get("vendas").await?;
//! ```

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::repository::{
    CategoryRepository, ClientRepository, CustomPriceRepository, ProductRepository, SaleRepository,
};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig, session: Arc<Session>) -> ConsoleResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config.api_base_url()?, session))
    }

    pub fn with_client(client: Client, base_url: Url, session: Arc<Session>) -> Self {
        ApiClient {
            client,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    pub fn custom_prices(&self) -> CustomPriceRepository {
        CustomPriceRepository::new(self.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ConsoleResult<T> {
        let request = self.request(Method::GET, path).await?;
        self.send_json(request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ConsoleResult<T> {
        let request = self.request(Method::POST, path).await?.json(body);
        self.send_json(request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ConsoleResult<T> {
        let request = self.request(Method::PUT, path).await?.json(body);
        self.send_json(request).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ConsoleResult<T> {
        let request = self.request(Method::PATCH, path).await?.json(body);
        self.send_json(request).await
    }

    pub async fn delete(&self, path: &str) -> ConsoleResult<()> {
        let request = self.request(Method::DELETE, path).await?;
        self.send(request).await.map(|_| ())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn request(&self, method: Method, path: &str) -> ConsoleResult<RequestBuilder> {
        let token = self.session.bearer().await.ok_or(ConsoleError::NotAuthenticated)?;
        let url = self.base_url.join(path.trim_start_matches('/'))?;

        debug!(%method, %url, "API request");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ConsoleResult<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, request: RequestBuilder) -> ConsoleResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => {
                self.session.end(true).await;
                Err(ConsoleError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(ConsoleError::NotFound {
                resource: if text.is_empty() { "Resource".to_string() } else { text },
            }),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ConsoleError::Rejected {
                    status: status.as_u16(),
                    message: text,
                })
            }
            _ => Err(ConsoleError::Remote {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}
