use crate::client::AdoClient;
use crate::config::ServerConfig;
use crate::error::Result;

/// Azure DevOps Server insights provider.
///
/// Wraps the REST client and turns raw payloads into the flat summaries the
/// tools return. Cheap to share: it holds no mutable state.
pub struct AdoProvider {
    pub client: AdoClient,
}

impl AdoProvider {
    /// Creates a provider bound to one collection and one credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = AdoClient::new(config)?;
        Ok(Self { client })
    }
}
