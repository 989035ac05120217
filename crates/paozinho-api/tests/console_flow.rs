//! End-to-end console flows against a mocked bakery API.

use chrono::NaiveDate;
use paozinho_api::commands::{auth, custom_price, sale};
use paozinho_api::commands::sale::{NewSaleRequest, PaymentInput, SettlementRequest};
use paozinho_api::{Console, ConsoleConfig, ConsoleError, ErrorCode, SessionEvent};
use paozinho_core::{CoreError, Money, PaymentMethod, PriceOverride, SaleReturn, SaleStatus};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.api.base_url = format!("{}/api/", server.uri());
    config.auth.url = format!("{}/auth", server.uri());
    config
}

async fn logged_in_console(server: &MockServer) -> Console {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "tok-abc",
            "uid": "u1",
            "email": "gerente@paozinho.com.br"
        })))
        .mount(server)
        .await;

    let console = Console::new(config_for(server)).unwrap();
    auth::login(&console, "gerente@paozinho.com.br", "segredo").await.unwrap();
    console
}

fn venda(status: &str) -> Value {
    json!({
        "id": "v1",
        "cliente_id": "c1",
        "cliente_nome": "Mercadinho Sol",
        "status": status,
        "itens": [
            { "id": "i1", "produto_id": "p1", "produto_nome": "Broa",
              "quantidade": 4, "preco_unitario": 2.5 }
        ],
        "total": 10.0,
        "data_venda": "2024-08-01"
    })
}

fn broa() -> Value {
    json!({
        "id": "p1",
        "nome": "Broa",
        "preco_custo": 1.0,
        "preco_venda": 2.5,
        "margem_lucro": 60.0,
        "preco_revenda": 3.5,
        "margem_revenda": 28.57
    })
}

fn payment(amount: &str) -> PaymentInput {
    PaymentInput {
        method: PaymentMethod::Dinheiro,
        amount: amount.to_string(),
        paid_on: NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
    }
}

fn one_broa_returned() -> Vec<SaleReturn> {
    vec![SaleReturn {
        line_item_id: "i1".to_string(),
        quantity: 1,
        reason: "amassada".to_string(),
    }]
}

#[tokio::test]
async fn test_login_sends_bearer_and_401_forces_logout() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;
    let mut events = console.session().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/vendas"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = sale::list_sales(&console, &Default::default(), 1).await.unwrap_err();
    assert!(err.requires_login());
    assert!(!console.session().is_authenticated().await);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut { forced: true });
}

#[tokio::test]
async fn test_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let console = Console::new(config_for(&server)).unwrap();
    let err = auth::login(&console, "gerente@paozinho.com.br", "errada").await.unwrap_err();

    assert!(matches!(err, ConsoleError::InvalidCredentials));
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert!(!console.session().is_authenticated().await);
}

#[tokio::test]
async fn test_requests_need_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let console = Console::new(config_for(&server)).unwrap();
    let err = sale::load_sale_form(&console).await.unwrap_err();

    assert!(matches!(err, ConsoleError::NotAuthenticated));
    assert!(err.requires_login());
}

#[tokio::test]
async fn test_empty_cart_sends_nothing() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/vendas"))
        .respond_with(ResponseTemplate::new(201).set_body_json(venda("PENDENTE")))
        .expect(0)
        .mount(&server)
        .await;

    let err = sale::create_sale(
        &console,
        NewSaleRequest {
            client_id: "c1".to_string(),
            client_name: None,
            notes: None,
            sale_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ConsoleError::Core(CoreError::EmptyCart)));
    assert!(err.is_local());
}

#[tokio::test]
async fn test_cart_uses_custom_price_and_clears_after_create() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "nome": "Mercadinho Sol" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([broa()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/produtos/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(broa()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/precos-personalizados"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "cp1", "cliente_id": "c1", "produto_id": "p1",
              "preco_venda": 2.2, "preco_revenda": 3.0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vendas"))
        .respond_with(ResponseTemplate::new(201).set_body_json(venda("PENDENTE")))
        .expect(1)
        .mount(&server)
        .await;

    let form = sale::load_sale_form(&console).await.unwrap();
    assert_eq!(form.clients.len(), 1);
    assert_eq!(form.products.len(), 1);

    sale::add_to_cart(&console, "c1", "p1").await.unwrap();
    let cart = sale::add_to_cart(&console, "c1", "p1").await.unwrap();
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 2);
    assert_eq!(cart.lines[0].unit_price, Money::from_cents(220));
    assert!(cart.lines[0].custom_price);
    assert_eq!(cart.totals.total, Money::from_cents(440));

    let cart = sale::set_cart_quantity(&console, "p1", "3").unwrap();
    assert_eq!(cart.totals.total, Money::from_cents(660));

    let created = sale::create_sale(
        &console,
        NewSaleRequest {
            client_id: "c1".to_string(),
            client_name: Some("Mercadinho Sol".to_string()),
            notes: None,
            sale_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.status, SaleStatus::Pendente);
    assert!(sale::get_cart(&console).lines.is_empty());

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/api/vendas")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["status"], "PENDENTE");
    assert_eq!(body["itens"][0]["produto_id"], "p1");
    assert_eq!(body["itens"][0]["quantidade"], 3);
}

#[tokio::test]
async fn test_advance_refuses_paid_without_settlement() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vendas/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("ENTREGUE")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/vendas/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("PAGO")))
        .expect(0)
        .mount(&server)
        .await;

    let err = sale::advance_sale(&console, "v1").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);

    let err = sale::cancel_sale(&console, "v1").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_advance_patches_next_status() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vendas/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("PENDENTE")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/vendas/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("PRODUZIDO")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = sale::advance_sale(&console, "v1").await.unwrap();
    assert_eq!(updated.status, SaleStatus::Produzido);

    let requests = server.received_requests().await.unwrap();
    let patch = requests.iter().find(|r| r.method.as_str() == "PATCH").unwrap();
    let body: Value = serde_json::from_slice(&patch.body).unwrap();
    assert_eq!(body, json!({ "status": "PRODUZIDO" }));
}

#[tokio::test]
async fn test_settlement_mismatch_sends_nothing() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/vendas/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("ENTREGUE")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vendas/v1/pagamento"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("PAGO")))
        .expect(0)
        .mount(&server)
        .await;

    let request = SettlementRequest {
        sale_id: "v1".to_string(),
        returns: one_broa_returned(),
        payments: vec![payment("5,00"), payment("2,00")],
    };

    let preview = sale::preview_settlement(&console, &request).await.unwrap();
    assert_eq!(preview.payable_total, Money::from_cents(750));
    assert_eq!(preview.difference, Money::from_cents(-50));

    let err = sale::settle_sale(&console, request).await.unwrap_err();
    let notice = err.notice();
    assert_eq!(notice.code, ErrorCode::SettlementMismatch);
    assert_eq!(notice.message, "missing: R$ 0,50");
}

#[tokio::test]
async fn test_balanced_settlement_posts_once() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    let mut paid = venda("PAGO");
    paid["itens"][0]["devolucoes"] = json!([
        { "item_venda_id": "i1", "quantidade": 1, "motivo": "amassada" }
    ]);
    paid["pagamentos"] = json!([
        { "metodo": "DINHEIRO", "valor": 5.0, "data_pagamento": "2024-08-02" },
        { "metodo": "DINHEIRO", "valor": 2.5, "data_pagamento": "2024-08-02" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/vendas/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(venda("ENTREGUE")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vendas/v1/pagamento"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paid))
        .expect(1)
        .mount(&server)
        .await;

    let result = sale::settle_sale(
        &console,
        SettlementRequest {
            sale_id: "v1".to_string(),
            returns: one_broa_returned(),
            payments: vec![payment("5,00"), payment("2,50")],
        },
    )
    .await
    .unwrap();

    assert_eq!(result.sale.status, SaleStatus::Pago);
    assert_eq!(result.settlement.returned_value, Money::from_cents(250));
    assert!(result.settlement.difference.is_zero());
    assert_eq!(result.sale.returned_value(), Money::from_cents(250));

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.url.path() == "/api/vendas/v1/pagamento")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["pagamentos"].as_array().unwrap().len(), 2);
    assert_eq!(body["devolucoes"][0]["item_venda_id"], "i1");
    assert_eq!(body["devolucoes"][0]["quantidade"], 1);
}

#[tokio::test]
async fn test_duplicate_custom_price_is_refused_locally() {
    let server = MockServer::start().await;
    let console = logged_in_console(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([broa()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/precos-personalizados"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "cp1", "cliente_id": "c1", "produto_id": "p1",
              "preco_venda": 2.2, "preco_revenda": 3.0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/precos-personalizados"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let board = custom_price::load_price_board(&console, "c1").await.unwrap();
    assert_eq!(board.custom.len(), 1);
    assert!(board.catalog.is_empty());

    let prices = PriceOverride {
        sale_price: Money::from_cents(200),
        resale_price: Money::from_cents(300),
    };
    let err = custom_price::assign_custom_price(&console, "c1", "p1", prices).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Core(CoreError::DuplicateCustomPrice { .. })));

    let inverted = PriceOverride {
        sale_price: Money::from_cents(300),
        resale_price: Money::from_cents(200),
    };
    let err = custom_price::assign_custom_price(&console, "c2", "p1", inverted).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}
