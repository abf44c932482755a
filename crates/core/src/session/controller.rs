use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::participant::{Identity, Participant};
use crate::domain::scope::ScopeId;
use crate::errors::SessionError;
use crate::registry::{ChampionCatalog, PlayerDirectory};
use crate::session::roster::Roster;
use crate::session::summary::SessionSummary;

/// Owns the per-scope session lifecycle and routes roster actions.
///
/// Presence in the scope map is the `Active` state; absence is `Inactive`.
/// Every roster action locks its scope's mutex for the whole operation,
/// including the registry awaits, so actions within one scope execute
/// strictly one at a time while scopes stay independent of each other.
pub struct SessionController {
    players: Arc<dyn PlayerDirectory>,
    champions: Arc<dyn ChampionCatalog>,
    scopes: Mutex<HashMap<ScopeId, Arc<Mutex<Roster>>>>,
}

impl SessionController {
    pub fn new(players: Arc<dyn PlayerDirectory>, champions: Arc<dyn ChampionCatalog>) -> Self {
        Self { players, champions, scopes: Mutex::new(HashMap::new()) }
    }

    /// Opens a fresh, empty session for the scope. Nothing carries over from
    /// a previously ended session.
    pub async fn start_session(&self, scope: &ScopeId) -> Result<SessionSummary, SessionError> {
        let mut scopes = self.scopes.lock().await;
        if scopes.contains_key(scope) {
            return Err(SessionError::SessionAlreadyActive);
        }

        let roster = Arc::new(Mutex::new(Roster::new()));
        let summary = roster.lock().await.summary();
        scopes.insert(scope.clone(), roster);
        Ok(summary)
    }

    /// Discards all roster, team, and pool state for the scope. Waits out an
    /// in-flight action on the same scope before tearing down, and re-checks
    /// the map entry afterwards so a concurrent end stays idempotent-safe.
    pub async fn end_session(&self, scope: &ScopeId) -> Result<(), SessionError> {
        let session = self.active_session(scope).await?;
        let _guard = session.lock().await;

        let mut scopes = self.scopes.lock().await;
        match scopes.get(scope) {
            Some(current) if Arc::ptr_eq(current, &session) => {
                scopes.remove(scope);
                Ok(())
            }
            _ => Err(SessionError::NoActiveSession),
        }
    }

    pub async fn join(
        &self,
        scope: &ScopeId,
        identity: Identity,
    ) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let mut roster = session.lock().await;

        let profile = self
            .players
            .find_profile(&identity)
            .await?
            .ok_or_else(|| SessionError::NotRegistered(identity.clone()))?;

        roster.sign_up(Participant { identity, profile })?;
        Ok(roster.summary())
    }

    pub async fn leave(
        &self,
        scope: &ScopeId,
        identity: &Identity,
    ) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let mut roster = session.lock().await;

        roster.withdraw(identity)?;
        Ok(roster.summary())
    }

    pub async fn roll_teams(&self, scope: &ScopeId) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let mut roster = session.lock().await;

        roster.shuffle_teams(&mut rand::thread_rng());
        Ok(roster.summary())
    }

    pub async fn roll_champions(&self, scope: &ScopeId) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let mut roster = session.lock().await;

        let count = roster.champion_draw_size()?;
        let drawn = self.champions.sample(count).await?;
        roster.assign_pools(drawn, &mut rand::thread_rng());
        Ok(roster.summary())
    }

    pub async fn swap_team(
        &self,
        scope: &ScopeId,
        identity: &Identity,
    ) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let mut roster = session.lock().await;

        roster.swap_team(identity)?;
        Ok(roster.summary())
    }

    pub async fn summary(&self, scope: &ScopeId) -> Result<SessionSummary, SessionError> {
        let session = self.active_session(scope).await?;
        let roster = session.lock().await;
        Ok(roster.summary())
    }

    /// Uniform session-state guard applied before every roster action.
    async fn active_session(&self, scope: &ScopeId) -> Result<Arc<Mutex<Roster>>, SessionError> {
        let scopes = self.scopes.lock().await;
        scopes.get(scope).cloned().ok_or(SessionError::NoActiveSession)
    }
}
