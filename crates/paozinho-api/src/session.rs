//! # Session
//!
//! The logged-in user and the token every REST request carries.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  login(email, pw) ──► IdentityProvider::sign_in ──► Session::start      │
//! │                                                      │                  │
//! │                                      SessionEvent::LoggedIn             │
//! │                                                                         │
//! │  logout() ──► IdentityProvider::sign_out ──► Session::end(forced=false) │
//! │                                                                         │
//! │  any request ──► 401 ──► Session::end(forced=true)                      │
//! │                                      │                                  │
//! │                          SessionEvent::LoggedOut { forced: true }       │
//! │                                      │                                  │
//! │                          shell redirects to /login                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One `Session` is created at startup and shared through `Arc`; it is the
//! only place the token lives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConsoleError, ConsoleResult};

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

/// The authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
}

/// Token information stored after login.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Bearer token sent on every REST request.
    pub id_token: String,
    pub user: User,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { email: String },
    /// `forced` is true when the API rejected the token.
    LoggedOut { forced: bool },
}

/// Shared authentication state.
#[derive(Debug)]
pub struct Session {
    token: RwLock<Option<SessionToken>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Session {
            token: RwLock::new(None),
            events,
        }
    }

    /// Receives login/logout notifications from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn start(&self, token: SessionToken) {
        let email = token.user.email.clone();
        *self.token.write().await = Some(token);
        info!(email = %email, "Session started");
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::LoggedIn { email });
    }

    /// Clears the token. Returns false if there was no session.
    pub async fn end(&self, forced: bool) -> bool {
        let had_session = self.token.write().await.take().is_some();
        if !had_session {
            return false;
        }

        if forced {
            warn!("Session rejected by the API, forcing logout");
        } else {
            info!("Session ended");
        }
        let _ = self.events.send(SessionEvent::LoggedOut { forced });
        true
    }

    /// Bearer token of the current session.
    pub async fn bearer(&self) -> Option<String> {
        self.token.read().await.as_ref().map(|t| t.id_token.clone())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.token.read().await.as_ref().map(|t| t.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}

// =============================================================================
// Identity Provider
// =============================================================================

/// External email/password authentication service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> ConsoleResult<SessionToken>;

    async fn sign_out(&self, id_token: &str) -> ConsoleResult<()>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    id_token: String,
    uid: String,
    email: String,
}

/// Identity provider reached over HTTP: `POST {url}/login`, `POST {url}/logout`.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
}

impl HttpIdentityProvider {
    pub fn new(client: Client, base_url: Url) -> Self {
        HttpIdentityProvider { client, base_url }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> ConsoleResult<SessionToken> {
        debug!(email = %email, "Signing in");
        let url = self.base_url.join("login")?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {
                let body: LoginResponse = response.json().await?;
                Ok(SessionToken {
                    id_token: body.id_token,
                    user: User {
                        uid: body.uid,
                        email: body.email,
                    },
                    issued_at: Utc::now(),
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ConsoleError::InvalidCredentials)
            }
            status => Err(ConsoleError::Remote {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn sign_out(&self, id_token: &str) -> ConsoleResult<()> {
        let url = self.base_url.join("logout")?;
        let response = self.client.post(url).bearer_auth(id_token).send().await?;

        if !response.status().is_success() {
            return Err(ConsoleError::Remote {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SessionToken {
        SessionToken {
            id_token: "tok-123".to_string(),
            user: User {
                uid: "u1".to_string(),
                email: "gerente@paozinho.com.br".to_string(),
            },
            issued_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_start_and_end_broadcast_events() {
        let session = Session::new();
        let mut events = session.subscribe();

        session.start(token()).await;
        assert_eq!(session.bearer().await.as_deref(), Some("tok-123"));
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::LoggedIn {
                email: "gerente@paozinho.com.br".to_string()
            }
        );

        assert!(session.end(true).await);
        assert!(!session.is_authenticated().await);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut { forced: true });
    }

    #[tokio::test]
    async fn test_end_without_session_is_silent() {
        let session = Session::new();
        let mut events = session.subscribe();

        assert!(!session.end(true).await);
        assert!(events.try_recv().is_err());
    }
}
