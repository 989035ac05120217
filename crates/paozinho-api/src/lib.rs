//! # Pãozinho API
//!
//! Remote side of the bakery console: REST client, identity provider
//! session, configuration and the console commands the browser calls.
//!
//! ## Module Organization
//! ```text
//! paozinho_api/
//! ├── lib.rs          ◄─── You are here (Console wiring, tracing)
//! ├── config.rs       ◄─── defaults → console.toml → PAOZINHO_* env
//! ├── error.rs        ◄─── ConsoleError, Notice for the browser
//! ├── session.rs      ◄─── Token store, IdentityProvider
//! ├── http.rs         ◄─── ApiClient (bearer auth, 401 → logout)
//! ├── dto.rs          ◄─── Wire shapes of the REST API
//! ├── repository/     ◄─── One repository per resource
//! ├── state/          ◄─── Cart and custom-price caches
//! └── commands/       ◄─── Operations behind each screen
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Console                                        │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ ConsoleConfig│ │ Arc<Session> │ │  ApiClient   │ │  CartState   │   │
//! │  │              │ │              │ │              │ │ PriceIndex   │   │
//! │  │ URLs, page   │ │ token, user  │ │ repositories │ │ State        │   │
//! │  │ size, tol.   │ │ events       │ │              │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  Every command takes `&Console` and uses only what it needs.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod http;
pub mod repository;
pub mod session;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult, ErrorCode, Notice};
pub use http::ApiClient;
pub use session::{HttpIdentityProvider, IdentityProvider, Session, SessionEvent, SessionToken, User};
pub use state::{CartSnapshot, CartState, PriceIndexState};

/// Everything a console command may need, built once at startup.
#[derive(Clone)]
pub struct Console {
    config: ConsoleConfig,
    session: Arc<Session>,
    identity: Arc<dyn IdentityProvider>,
    api: ApiClient,
    cart: CartState,
    prices: PriceIndexState,
}

impl Console {
    /// Wires the console against the configured API and identity provider.
    pub fn new(config: ConsoleConfig) -> ConsoleResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        let identity = HttpIdentityProvider::new(client, config.auth_url()?);
        Self::with_identity_provider(config, Arc::new(identity))
    }

    /// Same as [`Console::new`] with a caller-supplied identity provider.
    pub fn with_identity_provider(config: ConsoleConfig, identity: Arc<dyn IdentityProvider>) -> ConsoleResult<Self> {
        let session = Arc::new(Session::new());
        let api = ApiClient::new(&config, Arc::clone(&session))?;

        info!(api = %config.api.base_url, "Console initialized");
        Ok(Console {
            config,
            session,
            identity,
            api,
            cart: CartState::new(),
            prices: PriceIndexState::new(),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn prices(&self) -> &PriceIndexState {
        &self.prices
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=paozinho_api=trace` - Trace for the console only
/// - Default: INFO, DEBUG for the paozinho crates
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,paozinho_core=debug,paozinho_api=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
