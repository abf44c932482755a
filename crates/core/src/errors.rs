use thiserror::Error;

use crate::domain::participant::Identity;
use crate::registry::RegistryError;

/// Typed failures returned by the session controller and roster engine.
///
/// All variants are recoverable by the caller: the gateway renders them as
/// transient user notices. No variant implies partial mutation — an operation
/// that fails leaves the session untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already active in this scope")]
    SessionAlreadyActive,
    #[error("no session is active in this scope")]
    NoActiveSession,
    #[error("identity {0:?} has no registered profile")]
    NotRegistered(Identity),
    #[error("identity {0:?} is already signed up")]
    AlreadySignedUp(Identity),
    #[error("identity {0:?} is not signed up")]
    NotSignedUp(Identity),
    #[error("both teams are empty")]
    NoTeamsFormed,
    #[error("champion catalog holds {available} champions but {requested} were requested")]
    InsufficientChampionPool { requested: usize, available: usize },
    #[error("registry store failure: {0}")]
    Registry(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Session-state gating failed before any roster access.
    Precondition,
    /// The acting identity's roster membership did not allow the operation.
    Membership,
    /// A required external resource could not satisfy the request.
    Resource,
    /// The registry store itself failed; not a user mistake.
    Infrastructure,
}

impl SessionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SessionAlreadyActive | Self::NoActiveSession => FailureKind::Precondition,
            Self::NotRegistered(_) | Self::AlreadySignedUp(_) | Self::NotSignedUp(_) => {
                FailureKind::Membership
            }
            Self::NoTeamsFormed | Self::InsufficientChampionPool { .. } => FailureKind::Resource,
            Self::Registry(_) => FailureKind::Infrastructure,
        }
    }

    /// User-facing wording for the gateway's ephemeral notices.
    pub fn user_notice(&self) -> String {
        match self {
            Self::SessionAlreadyActive => "An ARAM session is already active!".to_owned(),
            Self::NoActiveSession => "There is no active ARAM session.".to_owned(),
            Self::NotRegistered(_) => {
                "You need to register first using `/register`.".to_owned()
            }
            Self::AlreadySignedUp(_) => {
                "You are already in the current ARAM session.".to_owned()
            }
            Self::NotSignedUp(_) => "You are not in the current ARAM session.".to_owned(),
            Self::NoTeamsFormed => {
                "At least one team needs to have players!".to_owned()
            }
            Self::InsufficientChampionPool { requested, available } => format!(
                "Not enough champions in the catalog: {requested} needed, {available} available."
            ),
            Self::Registry(_) => "Something went wrong talking to the player registry.".to_owned(),
        }
    }
}

impl From<RegistryError> for SessionError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::InsufficientChampions { requested, available } => {
                Self::InsufficientChampionPool { requested, available }
            }
            RegistryError::Lookup(message) => Self::Registry(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::participant::Identity;
    use crate::registry::RegistryError;

    use super::{FailureKind, SessionError};

    #[test]
    fn classifies_session_gating_as_precondition() {
        assert_eq!(SessionError::SessionAlreadyActive.kind(), FailureKind::Precondition);
        assert_eq!(SessionError::NoActiveSession.kind(), FailureKind::Precondition);
    }

    #[test]
    fn classifies_roster_failures_as_membership() {
        let identity = Identity("1234".to_owned());
        assert_eq!(SessionError::NotRegistered(identity.clone()).kind(), FailureKind::Membership);
        assert_eq!(SessionError::AlreadySignedUp(identity.clone()).kind(), FailureKind::Membership);
        assert_eq!(SessionError::NotSignedUp(identity).kind(), FailureKind::Membership);
    }

    #[test]
    fn classifies_pool_failures_as_resource() {
        assert_eq!(SessionError::NoTeamsFormed.kind(), FailureKind::Resource);
        assert_eq!(
            SessionError::InsufficientChampionPool { requested: 8, available: 3 }.kind(),
            FailureKind::Resource,
        );
    }

    #[test]
    fn registry_insufficiency_maps_to_insufficient_pool() {
        let error = SessionError::from(RegistryError::InsufficientChampions {
            requested: 8,
            available: 3,
        });
        assert_eq!(error, SessionError::InsufficientChampionPool { requested: 8, available: 3 });
    }

    #[test]
    fn registry_lookup_failure_maps_to_infrastructure() {
        let error = SessionError::from(RegistryError::Lookup("pool closed".to_owned()));
        assert_eq!(error.kind(), FailureKind::Infrastructure);
    }

    #[test]
    fn user_notices_never_leak_internals() {
        let notice = SessionError::Registry("SELECT failed: disk I/O error".to_owned()).user_notice();
        assert!(!notice.contains("SELECT"));
    }
}
