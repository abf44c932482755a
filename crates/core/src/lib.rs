pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod session;

pub use domain::champion::Champion;
pub use domain::participant::{Identity, Participant, PlayerProfile};
pub use domain::scope::ScopeId;
pub use errors::{FailureKind, SessionError};
pub use registry::{ChampionCatalog, PlayerDirectory, RegistryError};
pub use session::controller::SessionController;
pub use session::roster::{Roster, CHAMPIONS_PER_PLAYER};
pub use session::summary::{RosterEntry, SessionSummary, TeamSummary};
