//! Which release is currently in an environment.

use tracing::debug;

use crate::api::ApiError;
use crate::directory::ResourceDirectory;
use crate::error::PromoteError;
use crate::types::{Deployment, Release, ResourceId, ResourceKind};

pub struct ReleaseLocator<'a> {
    directory: ResourceDirectory<'a>,
}

impl<'a> ReleaseLocator<'a> {
    pub fn new(directory: ResourceDirectory<'a>) -> Self {
        Self { directory }
    }

    /// Release of the most recent deployment of `project` into `environment`.
    ///
    /// `Ok(None)` means the project was never deployed there, or the server
    /// answers 404 for its deployment history or for the deployed release.
    pub fn latest_in_environment(
        &self,
        space: &ResourceId,
        project: &ResourceId,
        environment: &ResourceId,
    ) -> Result<Option<Release>, PromoteError> {
        let deployments = match self
            .directory
            .deployments(space, project, environment)
            .collect_all()
        {
            Ok(deployments) => deployments,
            Err(ApiError::NotFound(path)) => {
                debug!("No deployment history at {}", path);
                return Ok(None);
            }
            Err(err) => {
                return Err(PromoteError::from_api(
                    err,
                    ResourceKind::Deployment,
                    project.as_str(),
                ));
            }
        };

        let Some(latest) = latest_deployment(deployments, project, environment) else {
            return Ok(None);
        };

        debug!(
            "Latest deployment of {} to {} is {} ({})",
            project, environment, latest.id, latest.release_id
        );

        match self.directory.release(space, &latest.release_id) {
            Ok(release) => Ok(Some(release)),
            Err(ApiError::NotFound(path)) => {
                debug!("Release {} no longer exists at {}", latest.release_id, path);
                Ok(None)
            }
            Err(err) => Err(PromoteError::from_api(
                err,
                ResourceKind::Release,
                latest.release_id.as_str(),
            )),
        }
    }
}

/// Newest deployment by `created`, ties going to the higher id.
///
/// Records for other projects or environments are ignored in case the server
/// did not apply the query filter.
pub fn latest_deployment(
    deployments: Vec<Deployment>,
    project: &ResourceId,
    environment: &ResourceId,
) -> Option<Deployment> {
    deployments
        .into_iter()
        .filter(|d| &d.environment_id == environment)
        .filter(|d| d.project_id.as_ref().is_none_or(|id| id == project))
        .max_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)))
}
