//! # Custom Price Repository
//!
//! `precos-personalizados` resource, one record per client × product.

use paozinho_core::CustomPrice;

use super::convert_all;
use crate::dto::PrecoPersonalizadoDto;
use crate::error::ConsoleResult;
use crate::http::ApiClient;

const RESOURCE: &str = "precos-personalizados";

#[derive(Debug, Clone)]
pub struct CustomPriceRepository {
    api: ApiClient,
}

impl CustomPriceRepository {
    pub fn new(api: ApiClient) -> Self {
        CustomPriceRepository { api }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<CustomPrice>> {
        let rows: Vec<PrecoPersonalizadoDto> = self.api.get(RESOURCE).await?;
        convert_all(rows)
    }

    pub async fn create(&self, entry: &CustomPrice) -> ConsoleResult<CustomPrice> {
        let dto: PrecoPersonalizadoDto = self.api.post(RESOURCE, &PrecoPersonalizadoDto::from(entry)).await?;
        CustomPrice::try_from(dto)
    }

    pub async fn update(&self, entry: &CustomPrice) -> ConsoleResult<CustomPrice> {
        let dto: PrecoPersonalizadoDto = self
            .api
            .put(&format!("{}/{}", RESOURCE, entry.id), &PrecoPersonalizadoDto::from(entry))
            .await?;
        CustomPrice::try_from(dto)
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<()> {
        self.api.delete(&format!("{}/{}", RESOURCE, id)).await
    }
}
