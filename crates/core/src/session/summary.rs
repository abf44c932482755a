use serde::Serialize;

use crate::domain::champion::Champion;
use crate::domain::participant::Identity;

/// One roster line: who signed up, shown under their registered game name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub identity: Identity,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    pub members: Vec<RosterEntry>,
    pub champions: Vec<Champion>,
}

/// Render-agnostic snapshot of the session, regenerated after every mutation.
///
/// Team blocks are present only once the corresponding team has members, so
/// the gateway can omit empty team sections from the display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub signed_up: Vec<RosterEntry>,
    pub team_a: Option<TeamSummary>,
    pub team_b: Option<TeamSummary>,
}

impl SessionSummary {
    pub fn participant_count(&self) -> usize {
        self.signed_up.len()
    }
}
