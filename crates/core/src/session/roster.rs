use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::champion::Champion;
use crate::domain::participant::{Identity, Participant};
use crate::errors::SessionError;
use crate::session::summary::{RosterEntry, SessionSummary, TeamSummary};

/// Champions offered per team slot on a champion roll.
pub const CHAMPIONS_PER_PLAYER: usize = 4;

/// Sign-up, team-partition, and champion-pool state for one active session.
///
/// Pure and synchronous: randomness comes in through the `Rng` parameters and
/// collaborator lookups happen in the controller, so every operation here is
/// deterministic under a seeded generator. Invariants held after every call:
/// a participant is in at most one team, and both teams only ever reference
/// signed-up participants.
#[derive(Debug, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    team_a: Vec<Identity>,
    team_b: Vec<Identity>,
    pool_a: Vec<Champion>,
    pool_b: Vec<Champion>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_up(&mut self, participant: Participant) -> Result<(), SessionError> {
        if self.contains(&participant.identity) {
            return Err(SessionError::AlreadySignedUp(participant.identity));
        }

        // New joiners stay unassigned until the next team roll.
        self.participants.push(participant);
        Ok(())
    }

    pub fn withdraw(&mut self, identity: &Identity) -> Result<(), SessionError> {
        if !self.contains(identity) {
            return Err(SessionError::NotSignedUp(identity.clone()));
        }

        self.participants.retain(|participant| participant.identity != *identity);
        self.team_a.retain(|member| member != identity);
        self.team_b.retain(|member| member != identity);
        Ok(())
    }

    /// Replaces both teams with a fresh uniform-random partition of the
    /// roster. With an odd roster the extra player lands on either team with
    /// equal probability. Champion pools are left as they are.
    ///
    /// Degenerate rosters (zero or one participants) are allowed and produce
    /// an empty or one-sided partition.
    pub fn shuffle_teams<R: Rng>(&mut self, rng: &mut R) {
        let mut identities: Vec<Identity> =
            self.participants.iter().map(|participant| participant.identity.clone()).collect();
        identities.shuffle(rng);

        let mut split = identities.len() / 2;
        if identities.len() % 2 == 1 && rng.gen_bool(0.5) {
            split += 1;
        }

        self.team_b = identities.split_off(split);
        self.team_a = identities;
    }

    /// How many champions the next roll must draw: four per slot on the
    /// larger team. Fails while both teams are empty.
    pub fn champion_draw_size(&self) -> Result<usize, SessionError> {
        if self.team_a.is_empty() && self.team_b.is_empty() {
            return Err(SessionError::NoTeamsFormed);
        }

        let team_size = self.team_a.len().max(self.team_b.len());
        Ok(team_size * CHAMPIONS_PER_PLAYER)
    }

    /// Shuffles the drawn champions and splits them at the midpoint: lower
    /// half to Team A, upper half to Team B. An odd draw leaves Team B's pool
    /// larger by one. Both pools are overwritten wholesale.
    pub fn assign_pools<R: Rng>(&mut self, mut drawn: Vec<Champion>, rng: &mut R) {
        drawn.shuffle(rng);
        let mid = drawn.len() / 2;
        self.pool_b = drawn.split_off(mid);
        self.pool_a = drawn;
    }

    /// Moves the participant to the opposite team; unassigned participants
    /// default onto Team A. Champion pools are not recomputed, so they go
    /// stale relative to the new membership until the next roll.
    pub fn swap_team(&mut self, identity: &Identity) -> Result<(), SessionError> {
        if !self.contains(identity) {
            return Err(SessionError::NotSignedUp(identity.clone()));
        }

        if let Some(position) = self.team_a.iter().position(|member| member == identity) {
            let member = self.team_a.remove(position);
            self.team_b.push(member);
        } else if let Some(position) = self.team_b.iter().position(|member| member == identity) {
            let member = self.team_b.remove(position);
            self.team_a.push(member);
        } else {
            self.team_a.push(identity.clone());
        }

        Ok(())
    }

    /// Pure read of the current state; safe to call any number of times.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            signed_up: self.participants.iter().map(entry_for).collect(),
            team_a: self.team_summary(&self.team_a, &self.pool_a),
            team_b: self.team_summary(&self.team_b, &self.pool_b),
        }
    }

    fn team_summary(&self, members: &[Identity], pool: &[Champion]) -> Option<TeamSummary> {
        if members.is_empty() {
            return None;
        }

        let members = members
            .iter()
            .filter_map(|identity| {
                self.participants
                    .iter()
                    .find(|participant| participant.identity == *identity)
                    .map(entry_for)
            })
            .collect();

        Some(TeamSummary { members, champions: pool.to_vec() })
    }

    fn contains(&self, identity: &Identity) -> bool {
        self.participants.iter().any(|participant| participant.identity == *identity)
    }
}

fn entry_for(participant: &Participant) -> RosterEntry {
    RosterEntry {
        identity: participant.identity.clone(),
        display_name: participant.profile.game_name.clone(),
    }
}
