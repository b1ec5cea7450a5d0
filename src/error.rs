//! Error types for the game engine.
//!
//! None of these are fatal. Callers narrate the failure to the player log
//! and carry on with the state untouched.

use crate::psych::state::{Currency, ProjectId, Requirement, UpgradeId};

/// A debit that the ledger refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("not enough {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: Currency,
        needed: f64,
        available: f64,
    },
}

/// Why an upgrade or project purchase did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),

    /// Already purchased. Informational only.
    #[error("{0} already purchased")]
    AlreadyApplied(UpgradeId),

    #[error("{upgrade} requires {missing} first")]
    DependencyNotMet { upgrade: UpgradeId, missing: UpgradeId },

    #[error("{upgrade} is gated: {requirement}")]
    RequirementNotMet {
        upgrade: UpgradeId,
        requirement: Requirement,
    },

    #[error(transparent)]
    InsufficientFunds(#[from] LedgerError),

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("project {0} is not available yet")]
    ProjectUnavailable(ProjectId),

    #[error("project {0} already completed")]
    ProjectAlreadyCompleted(ProjectId),
}

/// Manual or automatic neuron generation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("generation halted during an anxiety attack")]
    AttackActive,

    #[error("out of NeuroFuel")]
    OutOfFuel,
}

/// Save/load failures. The session always continues without persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("local storage unavailable: {0}")]
    Unavailable(String),

    #[error("save data could not be encoded or decoded: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("save version {saved} is older than the minimum compatible version {min}")]
    Incompatible { saved: u32, min: u32 },
}

/// Tuning overrides that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("tuning overrides are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning field {field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// A UI element or host object the game expected is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("missing collaborator: {0}")]
    Missing(&'static str),
}
