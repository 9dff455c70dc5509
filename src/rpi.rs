//! Rating Percentage Index: baseline computation and shift projection.
//!
//! Baseline RPI follows the standard three-term blend — 25% own winning
//! percentage, 50% opponents' winning percentage, 25% opponents' opponents'
//! winning percentage — with the venue-weighted own-WP convention (road wins
//! count 1.3, home wins 0.7, mirrored for losses). Opponents' WP always
//! excludes games against the subject team.
//!
//! The projector then estimates how a set of hypothetical future games would
//! shift that baseline, exposing every per-matchup term so callers can audit
//! the projection rather than trust a single opaque number.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalyticsError;
use crate::league::LeagueData;
use crate::models::{HistoricalGame, ProspectiveMatchup, TeamProfile, Venue};
use crate::ranking;

// ── Policy constants ─────────────────────────────────────────────────────────

/// Weight of the team's own winning percentage in the RPI blend.
pub const WP_WEIGHT: f64 = 0.25;
/// Weight of opponents' winning percentage.
pub const OWP_WEIGHT: f64 = 0.50;
/// Weight of opponents' opponents' winning percentage.
pub const OOWP_WEIGHT: f64 = 0.25;

/// Venue weights for the own-WP term: a home win is discounted, a road win
/// is a premium, and losses mirror that.
const HOME_WIN_WEIGHT: f64 = 0.7;
const ROAD_WIN_WEIGHT: f64 = 1.3;
const HOME_LOSS_WEIGHT: f64 = 1.3;
const ROAD_LOSS_WEIGHT: f64 = 0.7;

/// Marginal RPI swing of a single added game, before the probability,
/// opponent-strength, and venue factors scale it.
pub const RPI_GAME_SWING: f64 = 0.012;

/// Matchup count at which the projection's sample-size confidence factor
/// saturates.
const FULL_CONFIDENCE_MATCHUPS: f64 = 5.0;
/// Confidence retained by a schedule of pure coin-flip probabilities.
const DECISIVENESS_FLOOR: f64 = 0.25;

// ── Baseline RPI ─────────────────────────────────────────────────────────────

/// The team's stored RPI when present, otherwise recomputed from the game
/// log.
pub fn effective_rpi(data: &LeagueData, team: &TeamProfile) -> f64 {
    team.rpi
        .unwrap_or_else(|| compute_rpi(data, &team.team_id))
}

/// Recompute RPI from historical games using the three-term formula.
/// A team with no recorded games sits at the 0.5 midpoint.
pub fn compute_rpi(data: &LeagueData, team_id: &str) -> f64 {
    let games = data.games_for(team_id);
    if games.is_empty() {
        return 0.5;
    }

    let opponents: Vec<&str> = games
        .iter()
        .filter_map(|g| g.opponent_of(team_id))
        .collect();

    let wp = weighted_win_pct(&games, team_id);
    let owp = opponents
        .iter()
        .map(|opp| win_pct_excluding(data, opp, team_id))
        .sum::<f64>()
        / opponents.len() as f64;
    let oowp = opponents
        .iter()
        .map(|opp| opponents_win_pct(data, opp))
        .sum::<f64>()
        / opponents.len() as f64;

    let rpi = WP_WEIGHT * wp + OWP_WEIGHT * owp + OOWP_WEIGHT * oowp;
    debug!(team = team_id, wp, owp, oowp, rpi, "recomputed RPI from game log");
    rpi
}

/// Venue-weighted own winning percentage.
fn weighted_win_pct(games: &[&HistoricalGame], team_id: &str) -> f64 {
    let mut wins = 0.0;
    let mut losses = 0.0;
    for g in games {
        if let Some(winner) = g.winner() {
            let at_home = g.home_team == team_id;
            if winner == team_id {
                wins += if at_home { HOME_WIN_WEIGHT } else { ROAD_WIN_WEIGHT };
            } else {
                losses += if at_home { HOME_LOSS_WEIGHT } else { ROAD_LOSS_WEIGHT };
            }
        }
    }
    if wins + losses == 0.0 {
        0.5
    } else {
        wins / (wins + losses)
    }
}

/// Unweighted winning percentage of `team_id` with games against
/// `excluded_opponent` removed. 0.5 when nothing remains.
fn win_pct_excluding(data: &LeagueData, team_id: &str, excluded_opponent: &str) -> f64 {
    let mut wins = 0u32;
    let mut games = 0u32;
    for g in data.games_for(team_id) {
        if g.opponent_of(team_id) == Some(excluded_opponent) {
            continue;
        }
        if let Some(winner) = g.winner() {
            games += 1;
            if winner == team_id {
                wins += 1;
            }
        }
    }
    if games == 0 {
        0.5
    } else {
        wins as f64 / games as f64
    }
}

/// OWP of a team: average of its opponents' winning percentages, each
/// excluding games against the team itself.
fn opponents_win_pct(data: &LeagueData, team_id: &str) -> f64 {
    let games = data.games_for(team_id);
    let opponents: Vec<&str> = games
        .iter()
        .filter_map(|g| g.opponent_of(team_id))
        .collect();
    if opponents.is_empty() {
        return 0.5;
    }
    opponents
        .iter()
        .map(|opp| win_pct_excluding(data, opp, team_id))
        .sum::<f64>()
        / opponents.len() as f64
}

// ── Projection ───────────────────────────────────────────────────────────────

/// One prospective matchup's audited projection terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupScenario {
    pub opponent_id: String,
    pub venue: Venue,
    pub win_probability: f64,
    /// Opponent RPI actually used (profile, supplied proxy, or 0.5 neutral).
    pub opponent_rpi: f64,
    /// Expected marginal RPI contribution of this game.
    pub rpi_contribution: f64,
}

/// Expected record after folding the prospective schedule into the current
/// one: added wins are the sum of win probabilities, added losses their
/// complements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRecord {
    pub current_wins: u32,
    pub current_losses: u32,
    pub expected_added_wins: f64,
    pub expected_added_losses: f64,
    pub projected_wins: f64,
    pub projected_losses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpiProjectionResult {
    pub team_id: String,
    pub season: String,
    pub baseline_rpi: f64,
    pub projected_rpi: f64,
    pub rpi_delta: f64,
    /// Conference ranks; absent when the team's peer set cannot be resolved.
    pub baseline_rank: Option<usize>,
    pub projected_rank: Option<usize>,
    pub confidence: f64,
    pub expected_record: Option<ExpectedRecord>,
    pub scenario_breakdown: Vec<MatchupScenario>,
    pub notes: Vec<String>,
}

/// Project how a set of prospective matchups would shift a team's RPI.
///
/// A win adds an increment proportional to `(1 − p)` times an
/// opponent-strength factor; a loss subtracts proportionally to `p` times the
/// mirrored factor, so beating a strong opponent is worth more than beating a
/// weak one and losing to a strong opponent costs less than losing to a weak
/// one. An empty matchup list returns the baseline unchanged with a note.
pub fn project_rpi_shift(
    data: &LeagueData,
    team_id: &str,
    matchups: &[ProspectiveMatchup],
) -> Result<RpiProjectionResult, AnalyticsError> {
    let team = data.team(team_id)?;
    validate_matchups(matchups)?;

    let mut notes = Vec::new();

    let historical = data.games_for(team_id);
    let baseline_rpi = effective_rpi(data, team);
    if team.rpi.is_none() {
        if historical.is_empty() {
            notes.push("no stored RPI and no historical games; baseline set to the 0.5 midpoint".to_string());
        } else {
            notes.push(format!(
                "baseline RPI recomputed from {} historical games",
                historical.len()
            ));
        }
    }

    let mut scenario_breakdown = Vec::with_capacity(matchups.len());
    let mut shift = 0.0;
    for m in matchups {
        let opponent_rpi = opponent_strength(data, m, &mut notes);
        let p = m.win_probability;
        let win_gain = RPI_GAME_SWING * (1.0 - p) * (0.5 + opponent_rpi) * venue_win_factor(m.venue);
        let loss_cost = RPI_GAME_SWING * p * (1.5 - opponent_rpi) * venue_loss_factor(m.venue);
        let rpi_contribution = p * win_gain - (1.0 - p) * loss_cost;
        shift += rpi_contribution;
        scenario_breakdown.push(MatchupScenario {
            opponent_id: m.opponent_id.clone(),
            venue: m.venue,
            win_probability: p,
            opponent_rpi,
            rpi_contribution,
        });
    }

    if matchups.is_empty() {
        notes.push("no prospective matchups supplied; projection equals baseline".to_string());
    }

    let projected_rpi = baseline_rpi + shift;
    let rpi_delta = projected_rpi - baseline_rpi;

    let (baseline_rank, projected_rank) = match &team.conference_id {
        Some(cid) => {
            let rows = ranking::build_conference_ranking(data, cid, team_id, projected_rpi)?;
            let row = rows.iter().find(|r| r.team_id == team_id);
            (row.map(|r| r.baseline_rank), row.map(|r| r.projected_rank))
        }
        None => {
            notes.push("team has no conference affiliation; ranks unavailable".to_string());
            (None, None)
        }
    };

    let expected_record = if matchups.is_empty() {
        None
    } else {
        let added_wins: f64 = matchups.iter().map(|m| m.win_probability).sum();
        let added_losses = matchups.len() as f64 - added_wins;
        Some(ExpectedRecord {
            current_wins: team.wins,
            current_losses: team.losses,
            expected_added_wins: added_wins,
            expected_added_losses: added_losses,
            projected_wins: team.wins as f64 + added_wins,
            projected_losses: team.losses as f64 + added_losses,
        })
    };

    let confidence = projection_confidence(matchups);

    debug!(
        team = team_id,
        baseline_rpi,
        projected_rpi,
        rpi_delta,
        confidence,
        "projected RPI shift"
    );

    Ok(RpiProjectionResult {
        team_id: team_id.to_string(),
        season: data.season.clone(),
        baseline_rpi,
        projected_rpi,
        rpi_delta,
        baseline_rank,
        projected_rank,
        confidence,
        expected_record,
        scenario_breakdown,
        notes,
    })
}

fn validate_matchups(matchups: &[ProspectiveMatchup]) -> Result<(), AnalyticsError> {
    for m in matchups {
        if !(0.0..=1.0).contains(&m.win_probability) {
            return Err(AnalyticsError::InvalidInput(format!(
                "win probability {} for opponent {} outside [0, 1]",
                m.win_probability, m.opponent_id
            )));
        }
        if let Some(pct) = m.opponent_win_pct {
            if !(0.0..=1.0).contains(&pct) {
                return Err(AnalyticsError::InvalidInput(format!(
                    "opponent win percentage {} for {} outside [0, 1]",
                    pct, m.opponent_id
                )));
            }
        }
    }
    Ok(())
}

/// Opponent strength used for a matchup: league profile RPI first, then the
/// supplied win-percentage proxy, then the 0.5 neutral with a note.
fn opponent_strength(
    data: &LeagueData,
    matchup: &ProspectiveMatchup,
    notes: &mut Vec<String>,
) -> f64 {
    if let Ok(profile) = data.team(&matchup.opponent_id) {
        return effective_rpi(data, profile);
    }
    if let Some(pct) = matchup.opponent_win_pct {
        return pct;
    }
    notes.push(format!(
        "opponent {} not in dataset and no win percentage supplied; using neutral 0.5",
        matchup.opponent_id
    ));
    0.5
}

fn venue_win_factor(venue: Venue) -> f64 {
    match venue {
        Venue::Home => HOME_WIN_WEIGHT,
        Venue::Neutral => 1.0,
        Venue::Away => ROAD_WIN_WEIGHT,
    }
}

fn venue_loss_factor(venue: Venue) -> f64 {
    match venue {
        Venue::Home => HOME_LOSS_WEIGHT,
        Venue::Neutral => 1.0,
        Venue::Away => ROAD_LOSS_WEIGHT,
    }
}

/// Fewer prospective games and coin-flip probabilities both shrink
/// confidence; a full slate of decisive probabilities saturates it.
fn projection_confidence(matchups: &[ProspectiveMatchup]) -> f64 {
    if matchups.is_empty() {
        return 0.0;
    }
    let count_factor = (matchups.len() as f64 / FULL_CONFIDENCE_MATCHUPS).min(1.0);
    let decisiveness = matchups
        .iter()
        .map(|m| (m.win_probability - 0.5).abs() * 2.0)
        .sum::<f64>()
        / matchups.len() as f64;
    count_factor * (DECISIVENESS_FLOOR + (1.0 - DECISIVENESS_FLOOR) * decisiveness)
}
