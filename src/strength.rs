//! Conference strength rating.
//!
//! Aggregates a conference's season into one bounded 0–100 rating: how its
//! members fared outside the conference, where their RPIs sit in the national
//! distribution, how they score relative to opponents, and what the quality
//! of their wins and losses looks like. A confidence value is always reported
//! alongside the rating so a thin sample is never mistaken for a strong
//! signal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AnalyticsError;
use crate::league::LeagueData;
use crate::percentile::pct_rank;
use crate::rpi;

// ── Rating policy ────────────────────────────────────────────────────────────
//
// Documented, tunable blend constants. The five component weights sum to 1.0
// (pinned by test).

/// Blend weight on the cross-conference winning percentage.
pub const CROSS_RECORD_WEIGHT: f64 = 0.20;
/// Blend weight on the nationally normalized average RPI.
pub const NORMALIZED_RPI_WEIGHT: f64 = 0.30;
/// Blend weight on the quadrant-based quality-win score.
pub const QUALITY_WIN_WEIGHT: f64 = 0.25;
/// Blend weight on the run-differential component.
pub const RUN_DIFF_WEIGHT: f64 = 0.15;
/// Blend weight on the top-50-win component.
pub const TOP50_WEIGHT: f64 = 0.10;

/// Quality points per quadrant outcome, averaged per member and centered
/// at 50 on the score band.
const QUAD1_WIN_VALUE: f64 = 3.0;
const QUAD2_WIN_VALUE: f64 = 1.5;
const QUAD3_LOSS_COST: f64 = 2.0;
const QUAD4_LOSS_COST: f64 = 3.0;
/// Scale from per-team quality points to the 0–100 band.
const QUALITY_POINT_SCALE: f64 = 5.0;

/// Points on the 0–100 band per run of average per-game differential.
const RUN_DIFF_SCALE: f64 = 10.0;

/// Rating credit per win over a top-50 opponent, saturating at 100.
const TOP50_WIN_VALUE: f64 = 12.5;
/// National-rank cutoff for a top-50-caliber win.
const TOP50_CUTOFF: usize = 50;

/// Member count at which the small-sample penalty vanishes.
const FULL_CONFIDENCE_TEAMS: f64 = 8.0;
/// Games per member at which the sample is considered full.
const FULL_CONFIDENCE_GAMES_PER_TEAM: f64 = 10.0;

/// A win/loss tally with its percentage (0.5 when empty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConferenceRecord {
    pub wins: u32,
    pub losses: u32,
    pub pct: f64,
}

impl ConferenceRecord {
    fn new(wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        let pct = if total == 0 {
            0.5
        } else {
            wins as f64 / total as f64
        };
        Self { wins, losses, pct }
    }
}

/// Itemized inputs behind the blended rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceMetrics {
    pub cross_conference: ConferenceRecord,
    /// Summed member perspective: every intra game is one member win and one
    /// member loss, so this record's percentage is 0.5 by construction. It is
    /// itemized for transparency; the rating's discriminating signal comes
    /// from the cross-conference record.
    pub intra_conference: ConferenceRecord,
    pub average_rpi: f64,
    /// Average member RPI ranked against the full league's RPI distribution.
    pub normalized_rpi: f64,
    pub run_diff_per_game: f64,
    pub quality_win_score: f64,
    pub top50_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceStrengthResult {
    pub conference_id: String,
    pub season: String,
    pub team_count: usize,
    /// Bounded 0–100 blend of the itemized metrics.
    pub rating: f64,
    /// Shrinks with member count and games played; 0 for an empty sample.
    pub confidence: f64,
    pub metrics: ConferenceMetrics,
    pub notes: Vec<String>,
}

/// Rate a conference from its members' profiles and game log.
///
/// A conference with zero recorded games gets the midpoint rating with
/// confidence 0 and an explanatory note — never a division failure.
pub fn calculate_conference_strength(
    data: &LeagueData,
    conference_id: &str,
) -> Result<ConferenceStrengthResult, AnalyticsError> {
    let members = data.conference_members(conference_id)?;
    let member_ids: HashSet<&str> = members.iter().map(|t| t.team_id.as_str()).collect();
    let team_count = members.len();

    // Partition the members' games: both sides in-conference vs. one side.
    let mut intra_games = 0u32;
    let mut cross_wins = 0u32;
    let mut cross_losses = 0u32;
    for g in &data.games {
        let home_in = member_ids.contains(g.home_team.as_str());
        let away_in = member_ids.contains(g.away_team.as_str());
        match (home_in, away_in) {
            (true, true) => intra_games += 1,
            (true, false) | (false, true) => {
                if let Some(winner) = g.winner() {
                    if member_ids.contains(winner) {
                        cross_wins += 1;
                    } else {
                        cross_losses += 1;
                    }
                }
            }
            (false, false) => {}
        }
    }
    let cross_conference = ConferenceRecord::new(cross_wins, cross_losses);
    let intra_conference = ConferenceRecord::new(intra_games, intra_games);
    let games_total = 2 * intra_games + cross_wins + cross_losses;

    // Average member RPI, then place it in the national distribution so a
    // decent average inside a weak league doesn't read as universally strong.
    let average_rpi = members
        .iter()
        .map(|t| rpi::effective_rpi(data, t))
        .sum::<f64>()
        / team_count as f64;
    let mut league_rpis: Vec<f64> = data
        .teams
        .iter()
        .map(|t| rpi::effective_rpi(data, t))
        .collect();
    league_rpis.sort_by(f64::total_cmp);
    let normalized_rpi = pct_rank(average_rpi, &league_rpis);

    let run_diff_per_game = members
        .iter()
        .map(|t| t.run_diff_per_game)
        .sum::<f64>()
        / team_count as f64;

    // Quality of wins: quad-1/2 wins credit, quad-3/4 losses cost, averaged
    // per member and centered at 50.
    let quality_points: f64 = members
        .iter()
        .map(|t| {
            QUAD1_WIN_VALUE * t.quad1_wins as f64 + QUAD2_WIN_VALUE * t.quad2_wins as f64
                - QUAD3_LOSS_COST * t.quad3_losses as f64
                - QUAD4_LOSS_COST * t.quad4_losses as f64
        })
        .sum();
    let quality_win_score =
        (50.0 + quality_points / team_count as f64 * QUALITY_POINT_SCALE).clamp(0.0, 100.0);

    // Wins over nationally top-50 opponents, counted from the game log.
    let national_ranks = data.national_ranks();
    let mut top50_wins = 0u32;
    for g in &data.games {
        if let Some(winner) = g.winner() {
            if !member_ids.contains(winner) {
                continue;
            }
            if let Some(loser) = g.opponent_of(winner) {
                if national_ranks.get(loser).is_some_and(|r| *r <= TOP50_CUTOFF) {
                    top50_wins += 1;
                }
            }
        }
    }

    let run_diff_component = (50.0 + run_diff_per_game * RUN_DIFF_SCALE).clamp(0.0, 100.0);
    let top50_component = (top50_wins as f64 * TOP50_WIN_VALUE).min(100.0);

    let mut rating = (CROSS_RECORD_WEIGHT * cross_conference.pct * 100.0
        + NORMALIZED_RPI_WEIGHT * normalized_rpi
        + QUALITY_WIN_WEIGHT * quality_win_score
        + RUN_DIFF_WEIGHT * run_diff_component
        + TOP50_WEIGHT * top50_component)
        .clamp(0.0, 100.0);

    let games_per_team = games_total as f64 / team_count as f64;
    let mut confidence = (team_count as f64 / FULL_CONFIDENCE_TEAMS).min(1.0)
        * (games_per_team / FULL_CONFIDENCE_GAMES_PER_TEAM).min(1.0);

    let mut notes = Vec::new();
    if games_total == 0 {
        warn!(conference = conference_id, "conference has no recorded games");
        notes.push(format!(
            "conference {} has no recorded games this season; rating held at the midpoint",
            conference_id
        ));
        rating = 50.0;
        confidence = 0.0;
    }

    let rating = round1(rating);

    debug!(
        conference = conference_id,
        team_count,
        rating,
        confidence,
        cross_pct = cross_conference.pct,
        normalized_rpi,
        quality_win_score,
        top50_wins,
        "blended conference strength"
    );

    Ok(ConferenceStrengthResult {
        conference_id: conference_id.to_string(),
        season: data.season.clone(),
        team_count,
        rating,
        confidence,
        metrics: ConferenceMetrics {
            cross_conference,
            intra_conference,
            average_rpi,
            normalized_rpi,
            run_diff_per_game,
            quality_win_score,
            top50_wins,
        },
        notes,
    })
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
