//! # Sale Repository
//!
//! `vendas` resource plus its two actions:
//! - `PATCH vendas/{id}/status` for PRODUZIDO, ENTREGUE and CANCELADO
//! - `POST vendas/{id}/pagamento` for the reconciled settlement

use paozinho_core::{Payment, Sale, SaleReturn, SaleStatus};
use tracing::{debug, info};

use super::convert_all;
use crate::dto::{DevolucaoDto, LiquidacaoDto, NovaVendaDto, PagamentoDto, StatusDto, VendaDto};
use crate::error::ConsoleResult;
use crate::http::ApiClient;

const RESOURCE: &str = "vendas";

#[derive(Debug, Clone)]
pub struct SaleRepository {
    api: ApiClient,
}

impl SaleRepository {
    pub fn new(api: ApiClient) -> Self {
        SaleRepository { api }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<Sale>> {
        let rows: Vec<VendaDto> = self.api.get(RESOURCE).await?;
        debug!(count = rows.len(), "Sales fetched");
        convert_all(rows)
    }

    pub async fn get(&self, id: &str) -> ConsoleResult<Sale> {
        let dto: VendaDto = self.api.get(&format!("{}/{}", RESOURCE, id)).await?;
        Sale::try_from(dto)
    }

    /// Creates the sale; the returned record carries the definitive ids.
    pub async fn create(&self, sale: &Sale) -> ConsoleResult<Sale> {
        let dto: VendaDto = self.api.post(RESOURCE, &NovaVendaDto::from(sale)).await?;
        let created = Sale::try_from(dto)?;
        info!(sale_id = %created.id, total = %created.total, items = created.items.len(), "Sale created");
        Ok(created)
    }

    pub async fn update_status(&self, id: &str, status: SaleStatus) -> ConsoleResult<Sale> {
        let dto: VendaDto = self
            .api
            .patch(&format!("{}/{}/status", RESOURCE, id), &StatusDto { status })
            .await?;
        Sale::try_from(dto)
    }

    pub async fn settle(&self, id: &str, payments: &[Payment], returns: &[SaleReturn]) -> ConsoleResult<Sale> {
        let body = LiquidacaoDto {
            pagamentos: payments.iter().map(PagamentoDto::from).collect(),
            devolucoes: returns.iter().map(DevolucaoDto::from).collect(),
        };
        let dto: VendaDto = self.api.post(&format!("{}/{}/pagamento", RESOURCE, id), &body).await?;
        Sale::try_from(dto)
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<()> {
        self.api.delete(&format!("{}/{}", RESOURCE, id)).await
    }
}
