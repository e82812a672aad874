//! Domain-level error type used across the scoring core, services and adapters.
//!
//! This error type is HTTP- and storage-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Structural rule a selection or event violated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Striker, non-striker (or bowler) selected twice.
    DuplicateSelection,
    /// Player is not on the roster of the team they were selected for.
    NotOnRoster,
    /// Player already has a batting entry in this innings.
    AlreadyBatted,
    /// Dismissed player is not one of the batters on the crease.
    BatterNotOnCrease,
    /// Bowler bowled the immediately preceding over.
    ConsecutiveOver,
    /// A replacement batter must be confirmed before anything else.
    BatterSelectionPending,
    /// Run value outside the range allowed for the event.
    InvalidRuns,
    /// Team identifier does not belong to the match.
    InvalidTeam,
    /// Match rules (overs, players per team) are unusable.
    InvalidRules,
    /// Dismissal type cannot dismiss the named batter.
    InvalidDismissal,
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Match,
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    OptimisticLock,
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    /// Write-back of a snapshot failed; the prior snapshot stays authoritative.
    PersistenceFailure,
    /// A stored document does not decode into a consistent innings.
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Event issued against an ended innings/match or before required setup.
    InvalidStateTransition(String),
    /// Selection violates a structural rule.
    Validation(ValidationKind, String),
    /// The acting user may not score this match.
    NotAuthorized(String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidStateTransition(d) => write!(f, "invalid state transition: {d}"),
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::NotAuthorized(d) => write!(f, "not authorized: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn invalid_state(detail: impl Into<String>) -> Self {
        Self::InvalidStateTransition(detail.into())
    }
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn not_authorized(detail: impl Into<String>) -> Self {
        Self::NotAuthorized(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
    pub fn persistence(detail: impl Into<String>) -> Self {
        Self::Infra(InfraErrorKind::PersistenceFailure, detail.into())
    }
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Infra(InfraErrorKind::DataCorruption, detail.into())
    }
}
