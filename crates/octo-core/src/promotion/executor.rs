//! Trigger deployments on the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::ApiTransport;
use crate::error::PromoteError;
use crate::types::{ResourceId, ResourceKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateDeployment<'a> {
    release_id: &'a ResourceId,
    environment_id: &'a ResourceId,
}

/// The part of the creation response the report needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreatedDeployment {
    id: ResourceId,
}

/// Issues one deployment request per call. Failures are final; nothing is retried.
pub struct DeploymentExecutor<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> DeploymentExecutor<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    /// Create a deployment of `release` into `environment`.
    ///
    /// Returns the new deployment's id when the response carries one. Once the
    /// server has accepted the request the deployment exists, so an
    /// unreadable response body is logged and not reported as a failure.
    pub fn deploy(
        &self,
        space: &ResourceId,
        release: &ResourceId,
        environment: &ResourceId,
    ) -> Result<Option<ResourceId>, PromoteError> {
        let request = CreateDeployment {
            release_id: release,
            environment_id: environment,
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| PromoteError::Decode(e.to_string()))?;

        let response = self
            .transport
            .post(&format!("/{space}/deployments"), &body)
            .map_err(|err| PromoteError::from_api(err, ResourceKind::Release, release.as_str()))?;

        let deployment_id = created_id(response);
        match &deployment_id {
            Some(id) => info!("Created {} for {} in {}", id, release, environment),
            None => warn!(
                "Deployment of {} to {} accepted, but the response has no deployment id",
                release, environment
            ),
        }
        Ok(deployment_id)
    }
}

fn created_id(response: Value) -> Option<ResourceId> {
    serde_json::from_value::<CreatedDeployment>(response)
        .map(|created| created.id)
        .ok()
}
