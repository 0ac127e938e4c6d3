//! In-memory deployment server for integration tests.
//!
//! Serves the same paths and JSON shapes as the real API, honours
//! `skip`/`take`, and records every request so tests can assert on them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use octo_core::api::{ApiError, ApiTransport};
use octo_core::config::ServerConfig;
use octo_core::context::OctoContext;
use octo_core::types::{Deployment, Environment, Project, Release, ResourceId, Space};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Default)]
struct State {
    spaces: Vec<Space>,
    environments: HashMap<String, Vec<Environment>>,
    projects: HashMap<String, Vec<Project>>,
    releases: HashMap<String, Vec<Release>>,
    deployments: HashMap<String, Vec<Deployment>>,
    deploy_failures: HashMap<String, ApiError>,
    get_failures: HashMap<String, ApiError>,
    post_response: Option<Value>,
    gets: Vec<String>,
    posts: Vec<(String, Value)>,
    next_deployment: u64,
}

#[derive(Clone, Default)]
pub struct FakeOctopus {
    state: Rc<RefCell<State>>,
}

fn rid(id: &str) -> ResourceId {
    ResourceId::new(id)
}

fn param<'q>(query: &'q [(String, String)], key: &str) -> Option<&'q str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn page<T: Serialize>(items: &[T], query: &[(String, String)]) -> Value {
    let skip = param(query, "skip").and_then(|v| v.parse().ok()).unwrap_or(0);
    let take = param(query, "take")
        .and_then(|v| v.parse().ok())
        .unwrap_or(usize::MAX);
    let slice: Vec<&T> = items.iter().skip(skip).take(take).collect();
    json!({ "Items": slice, "TotalResults": items.len() })
}

impl FakeOctopus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn space(&self, id: &str, name: &str) -> &Self {
        let mut state = self.state.borrow_mut();
        state.spaces.push(Space {
            id: rid(id),
            name: name.to_string(),
        });
        state.environments.entry(id.to_string()).or_default();
        state.projects.entry(id.to_string()).or_default();
        drop(state);
        self
    }

    pub fn environment(&self, space: &str, id: &str, name: &str) -> &Self {
        self.state
            .borrow_mut()
            .environments
            .entry(space.to_string())
            .or_default()
            .push(Environment {
                id: rid(id),
                name: name.to_string(),
                space_id: Some(rid(space)),
            });
        self
    }

    pub fn project(&self, space: &str, id: &str, name: &str) -> &Self {
        self.state
            .borrow_mut()
            .projects
            .entry(space.to_string())
            .or_default()
            .push(Project {
                id: rid(id),
                name: name.to_string(),
                space_id: Some(rid(space)),
            });
        self
    }

    pub fn release(&self, space: &str, id: &str, project: &str, version: &str) -> &Self {
        self.state
            .borrow_mut()
            .releases
            .entry(space.to_string())
            .or_default()
            .push(Release {
                id: rid(id),
                project_id: rid(project),
                version: version.to_string(),
            });
        self
    }

    /// Record an existing deployment. Ids are assigned in insertion order.
    pub fn deployment(&self, space: &str, release: &str, environment: &str, created: &str) -> &Self {
        let created: DateTime<Utc> = created.parse().expect("valid timestamp");
        let mut state = self.state.borrow_mut();
        let project_id = state.project_of(space, release);
        state.next_deployment += 1;
        let id = format!("Deployments-{}", state.next_deployment);
        state
            .deployments
            .entry(space.to_string())
            .or_default()
            .push(Deployment {
                id: rid(&id),
                release_id: rid(release),
                environment_id: rid(environment),
                project_id,
                created,
            });
        drop(state);
        self
    }

    /// Make deployment creation for `release` fail with `error`.
    pub fn fail_deploys_of(&self, release: &str, error: ApiError) -> &Self {
        self.state
            .borrow_mut()
            .deploy_failures
            .insert(release.to_string(), error);
        self
    }

    /// Make every GET of `path` fail with `error`.
    pub fn fail_get(&self, path: &str, error: ApiError) -> &Self {
        self.state
            .borrow_mut()
            .get_failures
            .insert(path.to_string(), error);
        self
    }

    /// Record deployments as usual but answer every POST with `body`.
    pub fn respond_to_posts_with(&self, body: Value) -> &Self {
        self.state.borrow_mut().post_response = Some(body);
        self
    }

    /// Bodies of every POST received so far.
    pub fn posts(&self) -> Vec<(String, Value)> {
        self.state.borrow().posts.clone()
    }

    pub fn gets(&self) -> Vec<String> {
        self.state.borrow().gets.clone()
    }

    pub fn deployments(&self, space: &str) -> Vec<Deployment> {
        self.state
            .borrow()
            .deployments
            .get(space)
            .cloned()
            .unwrap_or_default()
    }

    /// Context wired to this server with the given page size.
    pub fn context(&self, page_size: usize) -> OctoContext {
        let mut config = ServerConfig::new("https://octopus.example.com", "API-TESTKEY123");
        config.page_size = page_size;
        OctoContext::with_transport(config, Box::new(self.clone()))
    }
}

impl State {
    fn project_of(&self, space: &str, release: &str) -> Option<ResourceId> {
        self.releases
            .get(space)?
            .iter()
            .find(|r| r.id.as_str() == release)
            .map(|r| r.project_id.clone())
    }

    fn latest_created(&self, space: &str) -> DateTime<Utc> {
        self.deployments
            .get(space)
            .and_then(|d| d.iter().map(|d| d.created).max())
            .unwrap_or_else(|| "2024-01-01T00:00:00Z".parse().expect("valid timestamp"))
    }

    fn known_space(&self, space: &str) -> bool {
        self.spaces.iter().any(|s| s.id.as_str() == space)
    }
}

impl ApiTransport for FakeOctopus {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let mut state = self.state.borrow_mut();
        state.gets.push(path.to_string());
        if let Some(error) = state.get_failures.get(path) {
            return Err(error.clone());
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let not_found = || ApiError::NotFound(path.to_string());

        match segments.as_slice() {
            ["spaces"] => Ok(page(&state.spaces, query)),
            [space, ..] if !state.known_space(space) => Err(not_found()),
            [space, "environments"] => Ok(page(&state.environments[*space], query)),
            [space, "projects"] => Ok(page(&state.projects[*space], query)),
            [space, "projects", project, "releases"] => {
                let releases: Vec<Release> = state
                    .releases
                    .get(*space)
                    .map(|all| {
                        all.iter()
                            .filter(|r| r.project_id.as_str() == *project)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(page(&releases, query))
            }
            [space, "releases", release] => state
                .releases
                .get(*space)
                .and_then(|all| all.iter().find(|r| r.id.as_str() == *release))
                .map(|r| json!(r))
                .ok_or_else(not_found),
            [space, "deployments"] => {
                let project = param(query, "projects");
                let environment = param(query, "environments");
                let deployments: Vec<Deployment> = state
                    .deployments
                    .get(*space)
                    .map(|all| {
                        all.iter()
                            .filter(|d| {
                                project.is_none_or(|p| {
                                    d.project_id.as_ref().is_some_and(|id| id.as_str() == p)
                                })
                            })
                            .filter(|d| {
                                environment.is_none_or(|e| d.environment_id.as_str() == e)
                            })
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(page(&deployments, query))
            }
            _ => Err(not_found()),
        }
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let mut state = self.state.borrow_mut();
        state.posts.push((path.to_string(), body.clone()));

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let [space, "deployments"] = segments.as_slice() else {
            return Err(ApiError::NotFound(path.to_string()));
        };

        let release = body["ReleaseId"].as_str().unwrap_or_default().to_string();
        let environment = body["EnvironmentId"].as_str().unwrap_or_default().to_string();
        if let Some(error) = state.deploy_failures.get(&release) {
            return Err(error.clone());
        }

        let project_id = state.project_of(space, &release);
        if project_id.is_none() {
            return Err(ApiError::Rejected {
                status: 400,
                message: format!("Release {release} does not exist"),
            });
        }

        let created = state.latest_created(space) + Duration::minutes(1);
        state.next_deployment += 1;
        let deployment = Deployment {
            id: rid(&format!("Deployments-{}", state.next_deployment)),
            release_id: rid(&release),
            environment_id: rid(&environment),
            project_id,
            created,
        };
        state
            .deployments
            .entry(space.to_string())
            .or_default()
            .push(deployment.clone());
        match &state.post_response {
            Some(body) => Ok(body.clone()),
            None => Ok(json!(deployment)),
        }
    }
}

/// Space "Default Space" with Staging and Production:
///
/// | project     | staging | production           |
/// |-------------|---------|----------------------|
/// | API Service | 2.1.0   | 2.0.0                |
/// | Web App     | 1.5.2   | 1.5.2 (same release) |
/// | Worker      | 3.0.1   | never                |
pub fn promotion_scenario() -> FakeOctopus {
    let server = FakeOctopus::new();
    server
        .space("Spaces-1", "Default Space")
        .environment("Spaces-1", "Environments-1", "Development")
        .environment("Spaces-1", "Environments-2", "Staging")
        .environment("Spaces-1", "Environments-4", "Production")
        .project("Spaces-1", "Projects-1", "API Service")
        .project("Spaces-1", "Projects-2", "Web App")
        .project("Spaces-1", "Projects-3", "Worker")
        .release("Spaces-1", "Releases-1", "Projects-1", "2.0.0")
        .release("Spaces-1", "Releases-2", "Projects-1", "2.1.0")
        .release("Spaces-1", "Releases-3", "Projects-2", "1.5.2")
        .release("Spaces-1", "Releases-4", "Projects-3", "3.0.1")
        .deployment("Spaces-1", "Releases-1", "Environments-2", "2024-01-09T10:00:00Z")
        .deployment("Spaces-1", "Releases-1", "Environments-4", "2024-01-10T10:00:00Z")
        .deployment("Spaces-1", "Releases-2", "Environments-2", "2024-01-15T10:00:00Z")
        .deployment("Spaces-1", "Releases-3", "Environments-2", "2024-01-12T10:00:00Z")
        .deployment("Spaces-1", "Releases-3", "Environments-4", "2024-01-13T10:00:00Z")
        .deployment("Spaces-1", "Releases-4", "Environments-2", "2024-01-14T10:00:00Z");
    server
}
