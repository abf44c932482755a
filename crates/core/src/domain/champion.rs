use serde::{Deserialize, Serialize};

/// Static reference entity from the game-data mirror, cached in the registry
/// store. Read-only from this crate's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Champion {
    pub key: i64,
    pub id: String,
    pub name: String,
    pub emoji: Option<String>,
}
