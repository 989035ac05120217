//! # Product Repository
//!
//! `produtos` resource. The price sheet is validated by the caller; this
//! layer only moves it over the wire.

use paozinho_core::Product;
use tracing::debug;

use super::convert_all;
use crate::dto::ProdutoDto;
use crate::error::ConsoleResult;
use crate::http::ApiClient;

const RESOURCE: &str = "produtos";

/// Repository for the product catalog.
///
/// ## Usage
/// ```rust,ignore
/// let products = api.products().list().await?;
/// let pao = api.products().get("p-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    api: ApiClient,
}

impl ProductRepository {
    pub fn new(api: ApiClient) -> Self {
        ProductRepository { api }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<Product>> {
        let rows: Vec<ProdutoDto> = self.api.get(RESOURCE).await?;
        debug!(count = rows.len(), "Products fetched");
        convert_all(rows)
    }

    pub async fn get(&self, id: &str) -> ConsoleResult<Product> {
        let dto: ProdutoDto = self.api.get(&format!("{}/{}", RESOURCE, id)).await?;
        Product::try_from(dto)
    }

    pub async fn create(&self, product: &Product) -> ConsoleResult<Product> {
        let dto: ProdutoDto = self.api.post(RESOURCE, &ProdutoDto::from(product)).await?;
        Product::try_from(dto)
    }

    pub async fn update(&self, product: &Product) -> ConsoleResult<Product> {
        let dto: ProdutoDto = self
            .api
            .put(&format!("{}/{}", RESOURCE, product.id), &ProdutoDto::from(product))
            .await?;
        Product::try_from(dto)
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<()> {
        self.api.delete(&format!("{}/{}", RESOURCE, id)).await
    }
}
