//! Read-only access to server collections.
//!
//! Every listing is a fresh, lazily paginated request; nothing is cached
//! between calls.

use serde::de::DeserializeOwned;

use crate::api::{ApiError, ApiTransport, Pages, Query};
use crate::types::{Deployment, Environment, Project, Release, ResourceId, Space};

/// A server collection and the scope it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Spaces,
    Environments {
        space: ResourceId,
    },
    Projects {
        space: ResourceId,
    },
    Releases {
        space: ResourceId,
        project: ResourceId,
    },
    Deployments {
        space: ResourceId,
        project: ResourceId,
        environment: ResourceId,
    },
}

impl Collection {
    pub fn path(&self) -> String {
        match self {
            Collection::Spaces => "/spaces".to_string(),
            Collection::Environments { space } => format!("/{space}/environments"),
            Collection::Projects { space } => format!("/{space}/projects"),
            Collection::Releases { space, project } => {
                format!("/{space}/projects/{project}/releases")
            }
            Collection::Deployments { space, .. } => format!("/{space}/deployments"),
        }
    }

    pub fn query(&self) -> Query {
        match self {
            Collection::Deployments {
                project,
                environment,
                ..
            } => vec![
                ("projects".to_string(), project.to_string()),
                ("environments".to_string(), environment.to_string()),
            ],
            _ => Vec::new(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct ResourceDirectory<'a> {
    transport: &'a dyn ApiTransport,
    page_size: usize,
}

impl<'a> ResourceDirectory<'a> {
    pub fn new(transport: &'a dyn ApiTransport, page_size: usize) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    /// Lazily iterate a collection. Each call starts over from the first page.
    pub fn list<T: DeserializeOwned>(&self, collection: &Collection) -> Pages<'a, T> {
        Pages::new(
            self.transport,
            collection.path(),
            collection.query(),
            self.page_size,
        )
    }

    pub fn spaces(&self) -> Pages<'a, Space> {
        self.list(&Collection::Spaces)
    }

    pub fn environments(&self, space: &ResourceId) -> Pages<'a, Environment> {
        self.list(&Collection::Environments {
            space: space.clone(),
        })
    }

    pub fn projects(&self, space: &ResourceId) -> Pages<'a, Project> {
        self.list(&Collection::Projects {
            space: space.clone(),
        })
    }

    pub fn releases(&self, space: &ResourceId, project: &ResourceId) -> Pages<'a, Release> {
        self.list(&Collection::Releases {
            space: space.clone(),
            project: project.clone(),
        })
    }

    /// Deployments of `project` into `environment`, in server order.
    pub fn deployments(
        &self,
        space: &ResourceId,
        project: &ResourceId,
        environment: &ResourceId,
    ) -> Pages<'a, Deployment> {
        self.list(&Collection::Deployments {
            space: space.clone(),
            project: project.clone(),
            environment: environment.clone(),
        })
    }

    pub fn release(&self, space: &ResourceId, release: &ResourceId) -> Result<Release, ApiError> {
        let body = self
            .transport
            .get(&format!("/{space}/releases/{release}"), &[])?;
        Ok(serde_json::from_value(body)?)
    }
}
