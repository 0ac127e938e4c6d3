//! Server-side entities shared across the directory, resolver and promotion layers.
//!
//! Records mirror the server's JSON shape (PascalCase keys) and are decoded at
//! the transport boundary.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of server resource, used for lookups and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Space,
    Environment,
    Project,
    Release,
    Deployment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Space => "space",
            ResourceKind::Environment => "environment",
            ResourceKind::Project => "project",
            ResourceKind::Release => "release",
            ResourceKind::Deployment => "deployment",
        };
        f.write_str(label)
    }
}

/// Server-assigned identifier such as `Projects-12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing number of `Kind-<n>` ids.
    fn sequence(&self) -> Option<u64> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, tail)| tail.parse::<u64>().ok())
    }
}

impl Ord for ResourceId {
    /// Numeric suffixes compare numerically (`Deployments-10` > `Deployments-9`),
    /// anything else falls back to string ordering.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.sequence(), other.sequence()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ResourceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Resources addressable by a human-readable name.
pub trait Named {
    fn id(&self) -> &ResourceId;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Space {
    pub id: ResourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<ResourceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<ResourceId>,
}

/// Immutable deployable artifact. `version` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    pub id: ResourceId,
    pub project_id: ResourceId,
    pub version: String,
}

/// Record that a release was deployed to an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub id: ResourceId,
    pub release_id: ResourceId,
    pub environment_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    pub created: DateTime<Utc>,
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn id(&self) -> &ResourceId {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(Space, Environment, Project);
