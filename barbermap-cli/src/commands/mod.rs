//! CLI command implementations.

pub mod run;
pub mod search;

use std::sync::Arc;
use std::time::Duration;

use barbermap::config::ConfigFile;
use barbermap::provider::{AsyncReqwestClient, HttpSearchProvider};

use crate::error::CliError;

/// Build the HTTP search provider from configuration.
pub(crate) fn build_provider(
    config: &ConfigFile,
) -> Result<Arc<HttpSearchProvider<AsyncReqwestClient>>, CliError> {
    let http = AsyncReqwestClient::with_timeout(Duration::from_secs(config.backend.timeout_secs))?;
    Ok(Arc::new(HttpSearchProvider::new(
        http,
        config.backend.base_url.clone(),
    )))
}
