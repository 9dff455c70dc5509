use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::models::{HistoricalGame, TeamProfile};
use crate::rpi;

/// The full league-season context handed to every team/conference
/// computation: team profiles plus the historical game log.
///
/// Loaded and kept current by the ingestion layer; read-only here. Every
/// computation builds its own derived state from this snapshot, so concurrent
/// requests over the same `LeagueData` need no locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueData {
    pub season: String,
    pub teams: Vec<TeamProfile>,
    pub games: Vec<HistoricalGame>,
}

impl LeagueData {
    /// Look up a team profile. Unknown identifiers are an explicit failure,
    /// never a silently fabricated default.
    pub fn team(&self, team_id: &str) -> Result<&TeamProfile, AnalyticsError> {
        self.teams
            .iter()
            .find(|t| t.team_id == team_id)
            .ok_or_else(|| AnalyticsError::TeamNotFound(team_id.to_string()))
    }

    /// All current members of a conference. A conference nobody belongs to is
    /// treated as unknown.
    pub fn conference_members(
        &self,
        conference_id: &str,
    ) -> Result<Vec<&TeamProfile>, AnalyticsError> {
        let members: Vec<&TeamProfile> = self
            .teams
            .iter()
            .filter(|t| t.conference_id.as_deref() == Some(conference_id))
            .collect();
        if members.is_empty() {
            return Err(AnalyticsError::ConferenceNotFound(conference_id.to_string()));
        }
        Ok(members)
    }

    /// Every recorded game the team appeared in.
    pub fn games_for(&self, team_id: &str) -> Vec<&HistoricalGame> {
        self.games.iter().filter(|g| g.involves(team_id)).collect()
    }

    /// National ranking over every team in the dataset, 1 = best.
    /// Ordered by effective RPI descending; equal ratings break by team id so
    /// the ranking never depends on input iteration order.
    pub fn national_ranks(&self) -> HashMap<String, usize> {
        let mut rated: Vec<(&str, f64)> = self
            .teams
            .iter()
            .map(|t| (t.team_id.as_str(), rpi::effective_rpi(self, t)))
            .collect();
        rated.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rated
            .into_iter()
            .enumerate()
            .map(|(i, (id, _))| (id.to_string(), i + 1))
            .collect()
    }
}
