//! Policy Boundary
//!
//! The engine treats the decision policy as a black box: it owns the
//! lifecycle (exists / load / train-then-save), never the learning
//! algorithm. Collaborators plug in behind narrow traits.

pub mod baseline;
pub mod lifecycle;
pub mod store;

pub use baseline::{BandPolicy, BandTrainer};
pub use lifecycle::PolicyLifecycleManager;
pub use store::{FsPolicyStore, PolicyStore};

use std::sync::Arc;

use async_trait::async_trait;

use crate::env::{Action, EnvironmentPool, Observation};
use crate::error::Result;

/// Serialized policy bytes; the trainer that produced them owns the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyArtifact(pub Vec<u8>);

/// Decision function mapping observations to actions
pub trait Policy: Send + Sync {
    /// Choose an action.
    ///
    /// Backtests pass `deterministic = true`; training collaborators may
    /// sample when it is false.
    fn predict(&self, observation: &Observation, deterministic: bool) -> Action;
}

/// Training collaborator producing persistable policies
#[async_trait]
pub trait PolicyTrainer: Send + Sync {
    /// Train a policy against the pool within a step budget
    async fn train(&self, pool: EnvironmentPool, total_timesteps: u32) -> Result<PolicyArtifact>;

    /// Decode an artifact previously produced by this trainer
    fn decode(&self, artifact: &PolicyArtifact) -> Result<Arc<dyn Policy>>;
}
