//! Error codes for the Crease scoring API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the scoring API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Acting user may not score this match
    NotAuthorized,

    // Request Validation
    /// Invalid match ID provided
    InvalidMatchId,
    /// Event issued in the wrong match/innings state
    InvalidStateTransition,
    /// Same player picked twice for one selection
    DuplicateSelection,
    /// Player is not on the team roster
    NotOnRoster,
    /// Batter already batted this innings
    AlreadyBatted,
    /// Dismissed player is not on the crease
    BatterNotOnCrease,
    /// Bowler bowled the previous over
    ConsecutiveOver,
    /// New batter must be confirmed first
    BatterSelectionPending,
    /// Run value out of range
    InvalidRuns,
    /// Team does not belong to the match
    InvalidTeam,
    /// Match rules are unusable
    InvalidRules,
    /// Dismissal does not apply to the named batter
    InvalidDismissal,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,

    // Resource Not Found
    /// Match not found
    MatchNotFound,

    // Business Logic Conflicts
    /// Optimistic lock conflict
    OptimisticLock,

    // System Errors
    /// Snapshot write-back failed
    PersistenceFailure,
    /// Stored document is inconsistent
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NotAuthorized => "NOT_AUTHORIZED",

            Self::InvalidMatchId => "INVALID_MATCH_ID",
            Self::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            Self::DuplicateSelection => "DUPLICATE_SELECTION",
            Self::NotOnRoster => "NOT_ON_ROSTER",
            Self::AlreadyBatted => "ALREADY_BATTED",
            Self::BatterNotOnCrease => "BATTER_NOT_ON_CREASE",
            Self::ConsecutiveOver => "CONSECUTIVE_OVER",
            Self::BatterSelectionPending => "BATTER_SELECTION_PENDING",
            Self::InvalidRuns => "INVALID_RUNS",
            Self::InvalidTeam => "INVALID_TEAM",
            Self::InvalidRules => "INVALID_RULES",
            Self::InvalidDismissal => "INVALID_DISMISSAL",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            Self::MatchNotFound => "MATCH_NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",

            Self::PersistenceFailure => "PERSISTENCE_FAILURE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
