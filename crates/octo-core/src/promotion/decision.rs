//! Per-project promotion decision.

use serde::{Deserialize, Serialize};

use crate::types::Release;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Nothing in the source environment
    Skip,
    /// Target already runs the source release
    AlreadyDeployed,
    /// Source release must be deployed to the target
    Deploy,
}

/// Compare the source and target releases by identity.
///
/// Version strings are never compared: two releases may share a version text
/// across unrelated release lines.
pub fn decide(source: Option<&Release>, target: Option<&Release>) -> Decision {
    match (source, target) {
        (None, _) => Decision::Skip,
        (Some(_), None) => Decision::Deploy,
        (Some(source), Some(target)) if source.id == target.id => Decision::AlreadyDeployed,
        (Some(_), Some(_)) => Decision::Deploy,
    }
}
