//! Population-relative percentile tables.
//!
//! Every tracked statistic gets an ascending-sorted reference array built
//! from the comparison peer group (same league, same season). Scoring is
//! always population-relative: a .290 average means nothing until it is
//! ranked against the season's hitters.

use serde::{Deserialize, Serialize};

use crate::models::PlayerStats;

/// Neutral rank returned when a reference sequence has no members.
pub const EMPTY_POPULATION_RANK: f64 = 50.0;

/// Ascending-sorted reference values for the 12 tracked statistics: nine
/// batting rates plus the three derived fielding stats.
///
/// A table is built fresh on every call and never mutated afterwards, so a
/// concurrent scorer can never observe a half-sorted view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PercentileTable {
    pub avg: Vec<f64>,
    pub obp: Vec<f64>,
    pub slg: Vec<f64>,
    pub woba: Vec<f64>,
    pub iso: Vec<f64>,
    pub walk_rate: Vec<f64>,
    pub strikeout_rate: Vec<f64>,
    pub babip: Vec<f64>,
    pub home_run_rate: Vec<f64>,
    pub fielding_pct: Vec<f64>,
    pub range_factor: Vec<f64>,
    pub assists_per_game: Vec<f64>,
}

/// Build the per-statistic sorted reference arrays for a population.
///
/// No outlier filtering: zero and negative rates are retained as-is (ISO in
/// particular can legitimately sit at ~0). Input order never matters — the
/// same population in any permutation yields an identical table.
pub fn build_percentile_table(population: &[PlayerStats]) -> PercentileTable {
    PercentileTable {
        avg: sorted_values(population, |p| p.batting.avg),
        obp: sorted_values(population, |p| p.batting.obp),
        slg: sorted_values(population, |p| p.batting.slg),
        woba: sorted_values(population, |p| p.batting.woba),
        iso: sorted_values(population, |p| p.batting.iso),
        walk_rate: sorted_values(population, |p| p.batting.walk_rate),
        strikeout_rate: sorted_values(population, |p| p.batting.strikeout_rate),
        babip: sorted_values(population, |p| p.batting.babip),
        home_run_rate: sorted_values(population, |p| p.batting.home_run_rate),
        fielding_pct: sorted_values(population, |p| p.fielding.fielding_pct),
        range_factor: sorted_values(population, |p| p.fielding.range_factor()),
        assists_per_game: sorted_values(population, |p| p.fielding.assists_per_game()),
    }
}

fn sorted_values<F>(population: &[PlayerStats], extract: F) -> Vec<f64>
where
    F: Fn(&PlayerStats) -> f64,
{
    let mut values: Vec<f64> = population.iter().map(extract).collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Left-exclusive percentile rank of `value` against an ascending-sorted
/// sequence: the share of population values strictly below it, scaled to
/// 0–100.
///
/// Ties with the probed value are not counted as beaten, so the population
/// minimum scores 0 and a value strictly above everyone scores 100. An empty
/// sequence yields the neutral 50.
pub fn pct_rank(value: f64, sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return EMPTY_POPULATION_RANK;
    }
    let below = sorted.partition_point(|v| *v < value);
    below as f64 / sorted.len() as f64 * 100.0
}
