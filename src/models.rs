use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-player-season batting rates, as normalized by the ingestion layer.
///
/// All fields are finite rate stats; nothing here is re-validated or
/// re-normalized at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattingProfile {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    /// Weighted on-base average.
    pub woba: f64,
    /// Isolated power (SLG − AVG). Can legitimately be ~0 for slap hitters.
    pub iso: f64,
    pub walk_rate: f64,
    pub strikeout_rate: f64,
    /// Batting average on balls in play.
    pub babip: f64,
    /// Home runs per plate appearance.
    pub home_run_rate: f64,
}

/// Per-player-season fielding counts.
///
/// Range factor and assists-per-game are derived on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldingProfile {
    /// Fielding percentage (0–1).
    pub fielding_pct: f64,
    pub putouts: u32,
    pub assists: u32,
    pub errors: u32,
    pub games: u32,
}

impl FieldingProfile {
    /// (putouts + assists) / games, or 0.0 for a player with no games.
    pub fn range_factor(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (self.putouts + self.assists) as f64 / self.games as f64
        }
    }

    /// Assists per game, or 0.0 for a player with no games.
    pub fn assists_per_game(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.assists as f64 / self.games as f64
        }
    }
}

/// One member of a comparison peer group (same league, same season).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub batting: BattingProfile,
    pub fielding: FieldingProfile,
}

/// A team's season profile as maintained by the ingestion layer.
/// Read-only to every computation in this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team_id: String,
    pub name: String,
    /// None for independents; rank lookups are reported as absent for them.
    pub conference_id: Option<String>,
    pub wins: u32,
    pub losses: u32,
    /// NCAA-style quality buckets keyed by opponent rank and venue.
    pub quad1_wins: u32,
    pub quad2_wins: u32,
    pub quad3_wins: u32,
    pub quad4_wins: u32,
    pub quad1_losses: u32,
    pub quad2_losses: u32,
    pub quad3_losses: u32,
    pub quad4_losses: u32,
    /// Stored RPI. None (or a stale upstream value cleared by ingestion)
    /// triggers recomputation from historical games.
    pub rpi: Option<f64>,
    pub strength_of_schedule: Option<f64>,
    pub net_rating: Option<f64>,
    pub run_diff_per_game: f64,
}

impl TeamProfile {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Overall winning percentage; 0.5 for a team with no games.
    pub fn win_pct(&self) -> f64 {
        if self.games_played() == 0 {
            0.5
        } else {
            self.wins as f64 / self.games_played() as f64
        }
    }
}

/// A completed game. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalGame {
    pub home_team: String,
    pub away_team: String,
    pub date: NaiveDate,
    pub home_score: i32,
    pub away_score: i32,
    /// True when both sides belong to the same conference.
    pub conference_game: bool,
}

impl HistoricalGame {
    /// Winning team id, or None for a tied score line (should not occur in
    /// baseball; tied records are skipped by every tally).
    pub fn winner(&self) -> Option<&str> {
        if self.home_score > self.away_score {
            Some(&self.home_team)
        } else if self.away_score > self.home_score {
            Some(&self.away_team)
        } else {
            None
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team == team_id || self.away_team == team_id
    }

    /// The other side of the game, if `team_id` played in it.
    pub fn opponent_of(&self, team_id: &str) -> Option<&str> {
        if self.home_team == team_id {
            Some(&self.away_team)
        } else if self.away_team == team_id {
            Some(&self.home_team)
        } else {
            None
        }
    }
}

/// Where a prospective game would be played, from the subject team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
    Neutral,
}

/// A hypothetical future game used by the projector and simulator.
///
/// The win probability is produced by a separate model upstream; this crate
/// treats it as a given input and only validates its range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectiveMatchup {
    pub opponent_id: String,
    pub venue: Venue,
    /// Estimated probability that the subject team wins (0–1).
    pub win_probability: f64,
    /// Opponent overall winning percentage, used as a strength proxy when the
    /// opponent is not present in the league dataset.
    pub opponent_win_pct: Option<f64>,
}
