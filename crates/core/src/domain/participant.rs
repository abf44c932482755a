use serde::{Deserialize, Serialize};

/// Stable chat-platform user id. Opaque to this crate; used as the roster key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

/// Display profile cached from the registry store at join time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub game_name: String,
    pub tag_line: String,
    pub puuid: String,
}

impl PlayerProfile {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub identity: Identity,
    pub profile: PlayerProfile,
}
