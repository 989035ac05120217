//! # Wire Types
//!
//! JSON shapes of the bakery API. Field names follow the API's Portuguese
//! snake_case; amounts travel as JSON numbers and become [`Money`] here, at
//! the boundary, never deeper.
//!
//! ```text
//! ProdutoDto { preco_custo: 0.5, preco_venda: 1.25, margem_lucro: 60.0, ... }
//!      │ TryFrom                                   ▲ From<&Product>
//!      ▼                                           │
//! Product   { cost_price: R$ 0,50, sale_price: R$ 1,25, ... }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use paozinho_core::{
    Category, Client, CustomPrice, Money, Payment, PaymentMethod, Product, Sale, SaleLineItem, SaleReturn,
    SaleStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult};

fn to_money(field: &str, value: Decimal) -> ConsoleResult<Money> {
    Money::from_decimal(value).ok_or_else(|| ConsoleError::InvalidResponse(format!("{} out of range: {}", field, value)))
}

// =============================================================================
// Cliente / Categoria
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClienteDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
}

impl From<&Client> for ClienteDto {
    fn from(c: &Client) -> Self {
        ClienteDto {
            id: Some(c.id.clone()).filter(|id| !id.is_empty()),
            nome: c.name.clone(),
            telefone: c.phone.clone(),
            email: c.email.clone(),
            endereco: c.address.clone(),
        }
    }
}

impl TryFrom<ClienteDto> for Client {
    type Error = ConsoleError;

    fn try_from(dto: ClienteDto) -> ConsoleResult<Self> {
        Ok(Client {
            id: dto.id.ok_or_else(|| ConsoleError::InvalidResponse("cliente without id".into()))?,
            name: dto.nome,
            phone: dto.telefone,
            email: dto.email,
            address: dto.endereco,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriaDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
}

impl From<&Category> for CategoriaDto {
    fn from(c: &Category) -> Self {
        CategoriaDto {
            id: Some(c.id.clone()).filter(|id| !id.is_empty()),
            nome: c.name.clone(),
        }
    }
}

impl TryFrom<CategoriaDto> for Category {
    type Error = ConsoleError;

    fn try_from(dto: CategoriaDto) -> ConsoleResult<Self> {
        Ok(Category {
            id: dto.id.ok_or_else(|| ConsoleError::InvalidResponse("categoria without id".into()))?,
            name: dto.nome,
        })
    }
}

// =============================================================================
// Produto
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProdutoDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
    #[serde(default)]
    pub categoria_id: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_custo: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_venda: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub margem_lucro: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_revenda: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub margem_revenda: Decimal,
}

impl From<&Product> for ProdutoDto {
    fn from(p: &Product) -> Self {
        ProdutoDto {
            id: Some(p.id.clone()).filter(|id| !id.is_empty()),
            nome: p.name.clone(),
            categoria_id: p.category_id.clone(),
            descricao: p.description.clone(),
            preco_custo: p.cost_price.to_decimal(),
            preco_venda: p.sale_price.to_decimal(),
            margem_lucro: p.profit_margin,
            preco_revenda: p.resale_price.to_decimal(),
            margem_revenda: p.resale_margin,
        }
    }
}

impl TryFrom<ProdutoDto> for Product {
    type Error = ConsoleError;

    fn try_from(dto: ProdutoDto) -> ConsoleResult<Self> {
        Ok(Product {
            id: dto.id.ok_or_else(|| ConsoleError::InvalidResponse("produto without id".into()))?,
            name: dto.nome,
            category_id: dto.categoria_id,
            description: dto.descricao,
            cost_price: to_money("preco_custo", dto.preco_custo)?,
            sale_price: to_money("preco_venda", dto.preco_venda)?,
            profit_margin: dto.margem_lucro,
            resale_price: to_money("preco_revenda", dto.preco_revenda)?,
            resale_margin: dto.margem_revenda,
        })
    }
}

// =============================================================================
// Preço Personalizado
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecoPersonalizadoDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub cliente_id: String,
    pub produto_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_venda: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_revenda: Decimal,
}

impl From<&CustomPrice> for PrecoPersonalizadoDto {
    fn from(c: &CustomPrice) -> Self {
        PrecoPersonalizadoDto {
            id: Some(c.id.clone()).filter(|id| !id.is_empty()),
            cliente_id: c.client_id.clone(),
            produto_id: c.product_id.clone(),
            preco_venda: c.sale_price.to_decimal(),
            preco_revenda: c.resale_price.to_decimal(),
        }
    }
}

impl TryFrom<PrecoPersonalizadoDto> for CustomPrice {
    type Error = ConsoleError;

    fn try_from(dto: PrecoPersonalizadoDto) -> ConsoleResult<Self> {
        Ok(CustomPrice {
            id: dto
                .id
                .ok_or_else(|| ConsoleError::InvalidResponse("preco personalizado without id".into()))?,
            client_id: dto.cliente_id,
            product_id: dto.produto_id,
            sale_price: to_money("preco_venda", dto.preco_venda)?,
            resale_price: to_money("preco_revenda", dto.preco_revenda)?,
        })
    }
}

// =============================================================================
// Venda
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagamentoDto {
    pub metodo: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
    pub data_pagamento: NaiveDate,
}

impl From<&Payment> for PagamentoDto {
    fn from(p: &Payment) -> Self {
        PagamentoDto {
            metodo: p.method,
            valor: p.amount.to_decimal(),
            data_pagamento: p.paid_on,
        }
    }
}

impl TryFrom<PagamentoDto> for Payment {
    type Error = ConsoleError;

    fn try_from(dto: PagamentoDto) -> ConsoleResult<Self> {
        Ok(Payment {
            method: dto.metodo,
            amount: to_money("valor", dto.valor)?,
            paid_on: dto.data_pagamento,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevolucaoDto {
    pub item_venda_id: String,
    pub quantidade: i64,
    pub motivo: String,
}

impl From<&SaleReturn> for DevolucaoDto {
    fn from(r: &SaleReturn) -> Self {
        DevolucaoDto {
            item_venda_id: r.line_item_id.clone(),
            quantidade: r.quantity,
            motivo: r.reason.clone(),
        }
    }
}

impl From<DevolucaoDto> for SaleReturn {
    fn from(dto: DevolucaoDto) -> Self {
        SaleReturn {
            line_item_id: dto.item_venda_id,
            quantity: dto.quantidade,
            reason: dto.motivo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemVendaDto {
    pub id: String,
    pub produto_id: String,
    pub produto_nome: String,
    pub quantidade: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_unitario: Decimal,
    #[serde(default)]
    pub devolucoes: Vec<DevolucaoDto>,
}

impl TryFrom<ItemVendaDto> for SaleLineItem {
    type Error = ConsoleError;

    fn try_from(dto: ItemVendaDto) -> ConsoleResult<Self> {
        Ok(SaleLineItem {
            id: dto.id,
            product_id: dto.produto_id,
            product_name: dto.produto_nome,
            quantity: dto.quantidade,
            unit_price: to_money("preco_unitario", dto.preco_unitario)?,
            returns: dto.devolucoes.into_iter().map(SaleReturn::from).collect(),
        })
    }
}

/// A sale as the API lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendaDto {
    pub id: String,
    pub cliente_id: String,
    #[serde(default)]
    pub cliente_nome: Option<String>,
    pub status: SaleStatus,
    pub itens: Vec<ItemVendaDto>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub observacoes: Option<String>,
    pub data_venda: NaiveDate,
    #[serde(default)]
    pub pagamentos: Vec<PagamentoDto>,
    #[serde(default)]
    pub criado_em: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pago_em: Option<DateTime<Utc>>,
}

impl TryFrom<VendaDto> for Sale {
    type Error = ConsoleError;

    fn try_from(dto: VendaDto) -> ConsoleResult<Self> {
        Ok(Sale {
            id: dto.id,
            client_id: dto.cliente_id,
            client_name: dto.cliente_nome,
            status: dto.status,
            items: dto
                .itens
                .into_iter()
                .map(SaleLineItem::try_from)
                .collect::<ConsoleResult<_>>()?,
            total: to_money("total", dto.total)?,
            notes: dto.observacoes,
            sale_date: dto.data_venda,
            payments: dto
                .pagamentos
                .into_iter()
                .map(Payment::try_from)
                .collect::<ConsoleResult<_>>()?,
            created_at: dto.criado_em.unwrap_or_else(Utc::now),
            settled_at: dto.pago_em,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovoItemDto {
    pub produto_id: String,
    pub quantidade: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco_unitario: Decimal,
}

/// Body of `POST vendas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovaVendaDto {
    pub cliente_id: String,
    pub status: SaleStatus,
    pub itens: Vec<NovoItemDto>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    pub data_venda: NaiveDate,
}

impl From<&Sale> for NovaVendaDto {
    fn from(sale: &Sale) -> Self {
        NovaVendaDto {
            cliente_id: sale.client_id.clone(),
            status: sale.status,
            itens: sale
                .items
                .iter()
                .map(|l| NovoItemDto {
                    produto_id: l.product_id.clone(),
                    quantidade: l.quantity,
                    preco_unitario: l.unit_price.to_decimal(),
                })
                .collect(),
            total: sale.total.to_decimal(),
            observacoes: sale.notes.clone(),
            data_venda: sale.sale_date,
        }
    }
}

/// Body of `PATCH vendas/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    pub status: SaleStatus,
}

/// Body of `POST vendas/{id}/pagamento`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidacaoDto {
    pub pagamentos: Vec<PagamentoDto>,
    pub devolucoes: Vec<DevolucaoDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_produto_from_json() {
        let dto: ProdutoDto = serde_json::from_value(json!({
            "id": "p1",
            "nome": "Pão de Queijo",
            "categoria_id": "salgados",
            "preco_custo": 0.5,
            "preco_venda": 1.25,
            "margem_lucro": 60.0,
            "preco_revenda": 2.0,
            "margem_revenda": 37.5
        }))
        .unwrap();

        let product = Product::try_from(dto).unwrap();
        assert_eq!(product.cost_price, Money::from_cents(50));
        assert_eq!(product.sale_price, Money::from_cents(125));
        assert_eq!(product.resale_price, Money::from_cents(200));
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_amounts_serialize_as_numbers() {
        let payment = Payment {
            method: PaymentMethod::Pix,
            amount: Money::from_cents(550),
            paid_on: NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        };
        let json = serde_json::to_value(PagamentoDto::from(&payment)).unwrap();

        assert_eq!(json["metodo"], "PIX");
        assert_eq!(json["valor"], json!(5.5));
        assert_eq!(json["data_pagamento"], "2024-08-02");
    }

    #[test]
    fn test_venda_from_json() {
        let dto: VendaDto = serde_json::from_value(json!({
            "id": "v1",
            "cliente_id": "c1",
            "status": "ENTREGUE",
            "itens": [
                { "id": "i1", "produto_id": "p1", "produto_nome": "Broa",
                  "quantidade": 4, "preco_unitario": 1.1 }
            ],
            "total": 4.4,
            "data_venda": "2024-08-01"
        }))
        .unwrap();

        let sale = Sale::try_from(dto).unwrap();
        assert_eq!(sale.status, SaleStatus::Entregue);
        assert_eq!(sale.total, Money::from_cents(440));
        assert_eq!(sale.items[0].unit_price, Money::from_cents(110));
        assert!(sale.items[0].returns.is_empty());
        assert!(sale.payments.is_empty());
    }

    #[test]
    fn test_missing_id_is_invalid_response() {
        let dto = CategoriaDto {
            id: None,
            nome: "Pães".to_string(),
        };
        assert!(matches!(
            Category::try_from(dto),
            Err(ConsoleError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_new_sale_body_omits_empty_notes() {
        let sale = Sale {
            id: "local".to_string(),
            client_id: "c1".to_string(),
            client_name: None,
            status: SaleStatus::Pendente,
            items: vec![SaleLineItem {
                id: "l1".to_string(),
                product_id: "p1".to_string(),
                product_name: "Sonho".to_string(),
                quantity: 3,
                unit_price: Money::from_cents(350),
                returns: Vec::new(),
            }],
            total: Money::from_cents(1050),
            notes: None,
            sale_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            payments: Vec::new(),
            created_at: Utc::now(),
            settled_at: None,
        };
        let json = serde_json::to_value(NovaVendaDto::from(&sale)).unwrap();

        assert_eq!(json["status"], "PENDENTE");
        assert_eq!(json["total"], json!(10.5));
        assert_eq!(json["itens"][0]["quantidade"], 3);
        assert!(json.get("observacoes").is_none());
    }
}
