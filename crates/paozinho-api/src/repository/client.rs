//! # Client Repository

use paozinho_core::Client;
use tracing::debug;

use super::convert_all;
use crate::dto::ClienteDto;
use crate::error::ConsoleResult;
use crate::http::ApiClient;

const RESOURCE: &str = "clientes";

#[derive(Debug, Clone)]
pub struct ClientRepository {
    api: ApiClient,
}

impl ClientRepository {
    pub fn new(api: ApiClient) -> Self {
        ClientRepository { api }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<Client>> {
        let rows: Vec<ClienteDto> = self.api.get(RESOURCE).await?;
        debug!(count = rows.len(), "Clients fetched");
        convert_all(rows)
    }

    pub async fn get(&self, id: &str) -> ConsoleResult<Client> {
        let dto: ClienteDto = self.api.get(&format!("{}/{}", RESOURCE, id)).await?;
        Client::try_from(dto)
    }

    pub async fn create(&self, client: &Client) -> ConsoleResult<Client> {
        let dto: ClienteDto = self.api.post(RESOURCE, &ClienteDto::from(client)).await?;
        Client::try_from(dto)
    }

    pub async fn update(&self, client: &Client) -> ConsoleResult<Client> {
        let dto: ClienteDto = self
            .api
            .put(&format!("{}/{}", RESOURCE, client.id), &ClienteDto::from(client))
            .await?;
        Client::try_from(dto)
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<()> {
        self.api.delete(&format!("{}/{}", RESOURCE, id)).await
    }
}
