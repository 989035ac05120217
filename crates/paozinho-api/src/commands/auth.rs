//! # Auth Commands

use tracing::{debug, info, warn};

use crate::error::ConsoleResult;
use crate::session::User;
use crate::Console;

/// Signs in with the identity provider and starts the session.
///
/// A refused login leaves any previous session untouched.
pub async fn login(console: &Console, email: &str, password: &str) -> ConsoleResult<User> {
    debug!(email = %email, "login command");

    let token = console.identity().sign_in(email.trim(), password).await?;
    let user = token.user.clone();
    console.session().start(token).await;

    info!(uid = %user.uid, "Logged in");
    Ok(user)
}

/// Ends the session locally, telling the provider on a best-effort basis.
pub async fn logout(console: &Console) -> ConsoleResult<()> {
    debug!("logout command");

    if let Some(token) = console.session().bearer().await {
        if let Err(e) = console.identity().sign_out(&token).await {
            warn!(error = %e, "Identity provider logout failed, clearing session anyway");
        }
    }
    console.session().end(false).await;
    Ok(())
}

pub async fn current_user(console: &Console) -> Option<User> {
    console.session().current_user().await
}
