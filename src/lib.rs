//! Analytics core for the college-baseball platform: percentile-normalized
//! HAV-F player grades, conference strength ratings, RPI projections, and
//! Monte Carlo schedule simulation.
//!
//! Every entry point is a pure synchronous function over immutable inputs —
//! no I/O, no shared mutable state, no implicit global randomness (the
//! simulator takes an explicit seed). HTTP routing, provider adapters,
//! persistence, and caching are external collaborators; they hand this crate
//! normalized records and receive serializable results back.

pub mod error;
pub mod havf;
pub mod league;
pub mod models;
pub mod percentile;
pub mod ranking;
pub mod rpi;
pub mod simulate;
pub mod strength;

pub use error::AnalyticsError;
pub use havf::{compute_havf, HavfScore};
pub use league::LeagueData;
pub use models::{
    BattingProfile, FieldingProfile, HistoricalGame, PlayerStats, ProspectiveMatchup,
    TeamProfile, Venue,
};
pub use percentile::{build_percentile_table, pct_rank, PercentileTable};
pub use ranking::{build_conference_ranking, ProjectedRankingRow};
pub use rpi::{compute_rpi, project_rpi_shift, RpiProjectionResult};
pub use simulate::{simulate_scheduling_impact, ScheduleSimulationResult, SimulationOptions};
pub use strength::{calculate_conference_strength, ConferenceStrengthResult};
