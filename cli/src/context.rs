//! Session construction and intent helpers.

use anyhow::{Context as _, Result};
use tracing::{debug, instrument};
use user_admin_business::{AdminConfig, AdminSession, Intent, Settlement};

/// Environment configuration with command-line overrides applied.
pub fn resolve_config(api_url: Option<&str>, token: Option<&str>) -> Result<AdminConfig> {
    let mut config = AdminConfig::from_env().context("Failed to read configuration")?;

    if let Some(url) = api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(token) = token {
        config = config.with_api_token(Some(token.to_owned()));
    }

    debug!(api_url = %config.api_url(), "Resolved configuration");
    Ok(config)
}

pub fn build_session(config: &AdminConfig) -> Result<AdminSession> {
    AdminSession::from_config(config).context("Failed to build HTTP client")
}

/// Run one intent, including any refresh it chains, and apply its events.
#[instrument(skip_all, name = "dispatch", fields(intent = %intent.kind()))]
pub async fn dispatch(session: &mut AdminSession, intent: Intent) -> Settlement {
    session.run(intent).await
}
