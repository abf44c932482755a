use serde::{Deserialize, Serialize};

/// Isolation boundary for sessions (one chat channel or guild). Exactly one
/// session may be active per scope at a time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub String);
