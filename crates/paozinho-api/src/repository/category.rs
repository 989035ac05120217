//! # Category Repository

use paozinho_core::Category;

use super::convert_all;
use crate::dto::CategoriaDto;
use crate::error::ConsoleResult;
use crate::http::ApiClient;

const RESOURCE: &str = "categorias";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    api: ApiClient,
}

impl CategoryRepository {
    pub fn new(api: ApiClient) -> Self {
        CategoryRepository { api }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<Category>> {
        let rows: Vec<CategoriaDto> = self.api.get(RESOURCE).await?;
        convert_all(rows)
    }

    pub async fn create(&self, category: &Category) -> ConsoleResult<Category> {
        let dto: CategoriaDto = self.api.post(RESOURCE, &CategoriaDto::from(category)).await?;
        Category::try_from(dto)
    }

    pub async fn update(&self, category: &Category) -> ConsoleResult<Category> {
        let dto: CategoriaDto = self
            .api
            .put(&format!("{}/{}", RESOURCE, category.id), &CategoriaDto::from(category))
            .await?;
        Category::try_from(dto)
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<()> {
        self.api.delete(&format!("{}/{}", RESOURCE, id)).await
    }
}
