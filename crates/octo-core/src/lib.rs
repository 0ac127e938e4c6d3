//! Octo Core Library
//!
//! Promotes releases between environments of a deployment server, one
//! space at a time, with name-based project selection and a dry-run mode.

pub mod api;
pub mod commands;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod promotion;
pub mod resolve;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, OctoConfig, ServerConfig};

    // Transport
    pub use crate::api::{ApiError, ApiTransport, RestClient};
    pub use crate::context::OctoContext;

    // Lookups
    pub use crate::commands::{BrowseCommand, LatestRelease};
    pub use crate::directory::{Collection, ResourceDirectory};
    pub use crate::resolve::{ProjectFilter, resolve, resolve_id};

    // Promotion
    pub use crate::error::PromoteError;
    pub use crate::promotion::{
        PromotionAction, PromotionObserver, PromotionOrchestrator, PromotionOutcome,
        PromotionReport, PromotionRequest, PromotionSummary,
    };

    // Entities
    pub use crate::types::{
        Deployment, Environment, Named, Project, Release, ResourceId, ResourceKind, Space,
    };
}
