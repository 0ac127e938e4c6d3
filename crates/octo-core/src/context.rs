//! Per-run context for dependency injection.

use crate::api::{ApiError, ApiTransport, RestClient};
use crate::config::ServerConfig;
use crate::directory::ResourceDirectory;
use crate::promotion::{DeploymentExecutor, ReleaseLocator};

/// Connection settings plus the transport every component talks through.
///
/// Frontends create this once per invocation and hand it to commands.
pub struct OctoContext {
    config: ServerConfig,
    transport: Box<dyn ApiTransport>,
}

impl OctoContext {
    /// Context backed by the HTTP client.
    pub fn connect(config: ServerConfig) -> Result<Self, ApiError> {
        let client = RestClient::new(&config)?;
        Ok(Self::with_transport(config, Box::new(client)))
    }

    /// Context with a caller-supplied transport (for testing).
    pub fn with_transport(config: ServerConfig, transport: Box<dyn ApiTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn ApiTransport {
        self.transport.as_ref()
    }

    pub fn directory(&self) -> ResourceDirectory<'_> {
        ResourceDirectory::new(self.transport(), self.config.page_size)
    }

    pub fn release_locator(&self) -> ReleaseLocator<'_> {
        ReleaseLocator::new(self.directory())
    }

    pub fn deployment_executor(&self) -> DeploymentExecutor<'_> {
        DeploymentExecutor::new(self.transport())
    }
}

impl std::fmt::Debug for OctoContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctoContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
