//! Bulk promotion from one environment to another.
//!
//! A run has two phases:
//! 1. Resolution: space, both environments and the project list. Any failure
//!    here aborts the run before anything is deployed.
//! 2. Per project, in enumeration order: locate releases, decide, deploy.
//!    Failures here become that project's `Failed` outcome and the run
//!    carries on with the next project.

use tracing::{info, warn};

use crate::context::OctoContext;
use crate::error::PromoteError;
use crate::resolve::{ProjectFilter, resolve};
use crate::types::{Environment, Project, Release, ResourceKind, Space};

use super::decision::{Decision, decide};
use super::report::{
    NoopObserver, PromotionAction, PromotionObserver, PromotionOutcome, PromotionReport,
    PromotionReporter,
};

/// What to promote.
#[derive(Debug, Clone)]
pub struct PromotionRequest {
    pub space: String,
    pub source_environment: String,
    pub target_environment: String,
    pub filter: ProjectFilter,
    /// Restrict the run to one project, matched by exact name
    pub project: Option<String>,
    pub dry_run: bool,
}

impl PromotionRequest {
    pub fn new(
        space: impl Into<String>,
        source_environment: impl Into<String>,
        target_environment: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            source_environment: source_environment.into(),
            target_environment: target_environment.into(),
            filter: ProjectFilter::default(),
            project: None,
            dry_run: false,
        }
    }

    pub fn with_filter(mut self, filter: ProjectFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Space and environments every project in a run is promoted within.
#[derive(Debug, Clone)]
struct Scope {
    space: Space,
    source: Environment,
    target: Environment,
}

pub struct PromotionOrchestrator<'a> {
    ctx: &'a OctoContext,
}

impl<'a> PromotionOrchestrator<'a> {
    pub fn new(ctx: &'a OctoContext) -> Self {
        Self { ctx }
    }

    pub fn run(&self, request: &PromotionRequest) -> Result<PromotionReport, PromoteError> {
        self.run_with_observer(request, &mut NoopObserver)
    }

    pub fn run_with_observer(
        &self,
        request: &PromotionRequest,
        observer: &mut dyn PromotionObserver,
    ) -> Result<PromotionReport, PromoteError> {
        let scope = self.resolve_scope(request)?;
        let projects = self.select_projects(&scope, request)?;
        info!(
            "Promoting {} projects in '{}' from '{}' to '{}'{}",
            projects.len(),
            scope.space.name,
            scope.source.name,
            scope.target.name,
            if request.dry_run { " (dry run)" } else { "" }
        );

        let mut reporter = PromotionReporter::new(projects.len(), observer);
        for project in &projects {
            reporter.begin(&project.name);
            let outcome = self.promote_project(&scope, project, request.dry_run);
            reporter.record(outcome);
        }

        let (outcomes, summary) = reporter.into_outcomes();
        Ok(PromotionReport {
            space: scope.space.name,
            source_environment: scope.source.name,
            target_environment: scope.target.name,
            dry_run: request.dry_run,
            selection: request.filter.describe(),
            outcomes,
            summary,
        })
    }

    fn resolve_scope(&self, request: &PromotionRequest) -> Result<Scope, PromoteError> {
        let directory = self.ctx.directory();

        let spaces = directory
            .spaces()
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &request.space))?;
        let space = resolve(ResourceKind::Space, &request.space, &spaces)?.clone();

        let environments = directory
            .environments(&space.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &space.name))?;
        let source = resolve(
            ResourceKind::Environment,
            &request.source_environment,
            &environments,
        )?
        .clone();
        let target = resolve(
            ResourceKind::Environment,
            &request.target_environment,
            &environments,
        )?
        .clone();

        Ok(Scope {
            space,
            source,
            target,
        })
    }

    fn select_projects(
        &self,
        scope: &Scope,
        request: &PromotionRequest,
    ) -> Result<Vec<Project>, PromoteError> {
        let projects = self
            .ctx
            .directory()
            .projects(&scope.space.id)
            .collect_all()
            .map_err(|e| PromoteError::from_api(e, ResourceKind::Space, &scope.space.name))?;

        let projects = match &request.project {
            Some(name) => vec![resolve(ResourceKind::Project, name, &projects)?.clone()],
            None => projects,
        };

        Ok(request.filter.apply(projects))
    }

    fn promote_project(&self, scope: &Scope, project: &Project, dry_run: bool) -> PromotionOutcome {
        let locator = self.ctx.release_locator();
        let space = &scope.space.id;

        let source = match locator.latest_in_environment(space, &project.id, &scope.source.id) {
            Ok(release) => release,
            Err(err) => return failed(project, None, None, err),
        };
        let target = match &source {
            Some(_) => match locator.latest_in_environment(space, &project.id, &scope.target.id) {
                Ok(release) => release,
                Err(err) => return failed(project, source.as_ref(), None, err),
            },
            None => None,
        };

        let decision = decide(source.as_ref(), target.as_ref());
        let mut outcome = PromotionOutcome {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            source_version: version_of(source.as_ref()),
            target_version: version_of(target.as_ref()),
            action: PromotionAction::Skipped,
            error: None,
            deployment_id: None,
        };

        let source = match (decision, source) {
            (Decision::Skip, _) | (_, None) => {
                info!("{}: nothing in '{}', skipping", project.name, scope.source.name);
                return outcome;
            }
            (Decision::AlreadyDeployed, Some(_)) => {
                info!("{}: already deployed to '{}'", project.name, scope.target.name);
                outcome.action = PromotionAction::AlreadyDeployed;
                return outcome;
            }
            (Decision::Deploy, Some(source)) => source,
        };

        if dry_run {
            info!(
                "{}: would deploy {} to '{}'",
                project.name, source.version, scope.target.name
            );
            outcome.action = PromotionAction::WouldDeploy;
            return outcome;
        }

        match self
            .ctx
            .deployment_executor()
            .deploy(space, &source.id, &scope.target.id)
        {
            Ok(deployment_id) => {
                outcome.action = PromotionAction::Deployed;
                outcome.target_version = Some(source.version);
                outcome.deployment_id = deployment_id;
                outcome
            }
            Err(err) => failed(project, Some(&source), target.as_ref(), err),
        }
    }
}

fn version_of(release: Option<&Release>) -> Option<String> {
    release.map(|r| r.version.clone())
}

fn failed(
    project: &Project,
    source: Option<&Release>,
    target: Option<&Release>,
    err: PromoteError,
) -> PromotionOutcome {
    warn!("{}: promotion failed: {}", project.name, err);
    PromotionOutcome {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        source_version: version_of(source),
        target_version: version_of(target),
        action: PromotionAction::Failed,
        error: Some(err.to_string()),
        deployment_id: None,
    }
}
