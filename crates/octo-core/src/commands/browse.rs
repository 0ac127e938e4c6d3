//! Read-only listing commands.
//!
//! Arguments are names, resolved the same way promotion resolves them.

use crate::context::OctoContext;
use crate::error::PromoteError;
use crate::resolve::resolve;
use crate::types::{Environment, Project, Release, ResourceKind, Space};

/// Answer to `latest-release`.
#[derive(Debug, Clone)]
pub struct LatestRelease {
    pub project: Project,
    pub environment: Environment,
    pub release: Option<Release>,
}

#[derive(Debug)]
pub struct BrowseCommand<'a> {
    ctx: &'a OctoContext,
}

impl<'a> BrowseCommand<'a> {
    pub fn new(ctx: &'a OctoContext) -> Self {
        Self { ctx }
    }

    pub fn spaces(&self) -> Result<Vec<Space>, PromoteError> {
        self.ctx
            .directory()
            .spaces()
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, "*"))
    }

    pub fn space(&self, name: &str) -> Result<Space, PromoteError> {
        let spaces = self.spaces()?;
        resolve(ResourceKind::Space, name, &spaces).cloned()
    }

    pub fn environments(&self, space: &str) -> Result<Vec<Environment>, PromoteError> {
        let space = self.space(space)?;
        self.ctx
            .directory()
            .environments(&space.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &space.name))
    }

    pub fn projects(&self, space: &str) -> Result<Vec<Project>, PromoteError> {
        let space = self.space(space)?;
        self.projects_in(&space)
    }

    fn projects_in(&self, space: &Space) -> Result<Vec<Project>, PromoteError> {
        self.ctx
            .directory()
            .projects(&space.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &space.name))
    }

    fn project_in(&self, space: &Space, name: &str) -> Result<Project, PromoteError> {
        let projects = self.projects_in(space)?;
        resolve(ResourceKind::Project, name, &projects).cloned()
    }

    pub fn releases(&self, space: &str, project: &str) -> Result<Vec<Release>, PromoteError> {
        let space = self.space(space)?;
        let project = self.project_in(&space, project)?;
        self.ctx
            .directory()
            .releases(&space.id, &project.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Project, &project.name))
    }

    pub fn latest_release(
        &self,
        space: &str,
        project: &str,
        environment: &str,
    ) -> Result<LatestRelease, PromoteError> {
        let space = self.space(space)?;
        let project = self.project_in(&space, project)?;

        let environments = self
            .ctx
            .directory()
            .environments(&space.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &space.name))?;
        let environment = resolve(ResourceKind::Environment, environment, &environments)?.clone();

        let release = self.ctx.release_locator().latest_in_environment(
            &space.id,
            &project.id,
            &environment.id,
        )?;

        Ok(LatestRelease {
            project,
            environment,
            release,
        })
    }
}
