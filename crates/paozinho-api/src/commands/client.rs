//! # Client & Category Commands
//!
//! Plain CRUD; the only local rule is a non-empty, bounded name.

use paozinho_core::validation::{validate_client_name, validate_product_name, validate_search_query};
use paozinho_core::{Category, Client, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ConsoleResult;
use crate::Console;

/// Client form as submitted by the browser. `id` is empty for a new client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientForm {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ClientForm {
    fn into_client(self) -> ConsoleResult<Client> {
        validate_client_name(&self.name)?;

        let email = blank_to_none(self.email);
        if let Some(email) = email.as_deref() {
            if !email.contains('@') {
                return Err(ValidationError::InvalidFormat {
                    field: "email".to_string(),
                    reason: "must contain @".to_string(),
                }
                .into());
            }
        }

        Ok(Client {
            id: self.id.unwrap_or_default(),
            name: self.name.trim().to_string(),
            phone: blank_to_none(self.phone),
            email,
            address: blank_to_none(self.address),
        })
    }
}

/// Clients ordered by name, optionally narrowed by a search text.
pub async fn list_clients(console: &Console, query: Option<&str>) -> ConsoleResult<Vec<Client>> {
    debug!(query = ?query, "list_clients command");

    let needle = match query {
        Some(q) => Some(validate_search_query(q)?.to_lowercase()),
        None => None,
    };

    let mut clients: Vec<Client> = console
        .api()
        .clients()
        .list()
        .await?
        .into_iter()
        .filter(|c| needle.as_deref().map_or(true, |n| n.is_empty() || c.name.to_lowercase().contains(n)))
        .collect();
    clients.sort_by_key(|c| c.name.to_lowercase());
    Ok(clients)
}

/// Creates or updates a client depending on whether the form has an id.
pub async fn save_client(console: &Console, form: ClientForm) -> ConsoleResult<Client> {
    debug!(name = %form.name, "save_client command");

    let client = form.into_client()?;
    let saved = if client.id.is_empty() {
        console.api().clients().create(&client).await?
    } else {
        console.api().clients().update(&client).await?
    };

    info!(client_id = %saved.id, "Client saved");
    Ok(saved)
}

pub async fn delete_client(console: &Console, id: &str) -> ConsoleResult<()> {
    debug!(client_id = %id, "delete_client command");
    console.api().clients().delete(id).await?;
    info!(client_id = %id, "Client deleted");
    Ok(())
}

pub async fn list_categories(console: &Console) -> ConsoleResult<Vec<Category>> {
    let mut categories = console.api().categories().list().await?;
    categories.sort_by_key(|c| c.name.to_lowercase());
    Ok(categories)
}

pub async fn save_category(console: &Console, id: Option<String>, name: &str) -> ConsoleResult<Category> {
    debug!(name = %name, "save_category command");
    // Category names share the product name bounds.
    validate_product_name(name)?;

    let category = Category {
        id: id.unwrap_or_default(),
        name: name.trim().to_string(),
    };
    let saved = if category.id.is_empty() {
        console.api().categories().create(&category).await?
    } else {
        console.api().categories().update(&category).await?
    };

    info!(category_id = %saved.id, "Category saved");
    Ok(saved)
}

pub async fn delete_category(console: &Console, id: &str) -> ConsoleResult<()> {
    console.api().categories().delete(id).await
}
