// FICHIER : server/src/utils/net.rs

use crate::utils::error::{AppError, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client HTTP partagé (pool de connexions réutilisé)
static GLOBAL_CLIENT: OnceLock<Client> = OnceLock::new();

pub fn get_client() -> &'static Client {
    GLOBAL_CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("Bookshelf/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!("⚠️ Client HTTP par défaut (builder en échec : {})", e);
                Client::new()
            })
    })
}

/// PUT JSON sans retry. Un statut non 2xx est une erreur.
#[instrument(skip(body), fields(url = %url))]
pub async fn put_json<T: Serialize + ?Sized>(url: &str, body: &T) -> Result<Value> {
    let response = get_client().put(url).json(body).send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), "PUT terminé");

    let response = response.error_for_status()?;
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(AppError::from)
}

/// POST JSON renvoyant le statut et le corps, quel que soit le statut.
/// Un corps non JSON est restitué comme chaîne.
#[instrument(skip(body, headers), fields(url = %url))]
pub async fn post_json<T: Serialize + ?Sized>(
    url: &str,
    body: &T,
    headers: &[(&str, String)],
) -> Result<(StatusCode, Value)> {
    let mut request = get_client().post(url).json(body);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((status, payload))
}
