//! HAV-F composite player grade.
//!
//! Four percentile-normalized sub-scores on a 0–100 scale:
//! - **H** (hitting): contact and on-base production
//! - **A** (approach): at-bat quality — plate discipline, contact skill,
//!   batted-ball luck-adjusted production
//! - **V** (power): extra-base damage, the velocity proxy
//! - **F** (fielding): glove value from fielding percentage plus derived
//!   range stats
//!
//! Every input statistic is ranked against the peer population (same league,
//! same season) before weighting, so the grade is always relative to the
//! player's actual competition rather than to fixed cutoffs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::PlayerStats;
use crate::percentile::{pct_rank, PercentileTable};

// ── Weight policy ────────────────────────────────────────────────────────────
//
// Fixed, documented constants. Each family sums to 1.0, as does the top-level
// composite blend; the weight-sum tests below pin that invariant.

/// Composite weight on the hitting sub-score.
pub const HITTING_WEIGHT: f64 = 0.35;
/// Composite weight on the approach (at-bat quality) sub-score.
pub const APPROACH_WEIGHT: f64 = 0.25;
/// Composite weight on the power sub-score.
pub const POWER_WEIGHT: f64 = 0.25;
/// Composite weight on the fielding sub-score.
pub const FIELDING_WEIGHT: f64 = 0.15;

/// Hitting sub-weights: {avg, obp, slg, woba, iso}.
pub const HITTING_SUBWEIGHTS: [f64; 5] = [0.15, 0.25, 0.25, 0.25, 0.10];
/// Approach sub-weights: {walk rate, inverted strikeout rate, babip, hr rate}.
pub const APPROACH_SUBWEIGHTS: [f64; 4] = [0.30, 0.30, 0.20, 0.20];
/// Power sub-weights: {iso, slg, hr rate}.
pub const POWER_SUBWEIGHTS: [f64; 3] = [0.40, 0.30, 0.30];
/// Fielding sub-weights: {fielding pct, range factor, assists per game}.
pub const FIELDING_SUBWEIGHTS: [f64; 3] = [0.50, 0.30, 0.20];

/// A player's HAV-F grade. Sub-scores and composite are clamped to [0, 100]
/// and rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HavfScore {
    pub hitting: f64,
    pub approach: f64,
    pub power: f64,
    pub fielding: f64,
    pub composite: f64,
}

/// Grade one player against a population percentile table.
///
/// Never fails: an empty table ranks every statistic at the neutral 50, and a
/// zero-games fielder degrades through the derived-stat 0.0 fallback rather
/// than erroring.
pub fn compute_havf(player: &PlayerStats, table: &PercentileTable) -> HavfScore {
    let b = &player.batting;
    let f = &player.fielding;

    let [h_avg, h_obp, h_slg, h_woba, h_iso] = HITTING_SUBWEIGHTS;
    let hitting = h_avg * pct_rank(b.avg, &table.avg)
        + h_obp * pct_rank(b.obp, &table.obp)
        + h_slg * pct_rank(b.slg, &table.slg)
        + h_woba * pct_rank(b.woba, &table.woba)
        + h_iso * pct_rank(b.iso, &table.iso);

    // Strikeout rate is inverted: striking out less than the population is
    // the good outcome.
    let [a_walk, a_contact, a_babip, a_hr] = APPROACH_SUBWEIGHTS;
    let approach = a_walk * pct_rank(b.walk_rate, &table.walk_rate)
        + a_contact * (100.0 - pct_rank(b.strikeout_rate, &table.strikeout_rate))
        + a_babip * pct_rank(b.babip, &table.babip)
        + a_hr * pct_rank(b.home_run_rate, &table.home_run_rate);

    let [v_iso, v_slg, v_hr] = POWER_SUBWEIGHTS;
    let power = v_iso * pct_rank(b.iso, &table.iso)
        + v_slg * pct_rank(b.slg, &table.slg)
        + v_hr * pct_rank(b.home_run_rate, &table.home_run_rate);

    let [f_pct, f_range, f_assists] = FIELDING_SUBWEIGHTS;
    let fielding = f_pct * pct_rank(f.fielding_pct, &table.fielding_pct)
        + f_range * pct_rank(f.range_factor(), &table.range_factor)
        + f_assists * pct_rank(f.assists_per_game(), &table.assists_per_game);

    let hitting = round1(hitting.clamp(0.0, 100.0));
    let approach = round1(approach.clamp(0.0, 100.0));
    let power = round1(power.clamp(0.0, 100.0));
    let fielding = round1(fielding.clamp(0.0, 100.0));

    let composite = round1(
        (HITTING_WEIGHT * hitting
            + APPROACH_WEIGHT * approach
            + POWER_WEIGHT * power
            + FIELDING_WEIGHT * fielding)
            .clamp(0.0, 100.0),
    );

    debug!(hitting, approach, power, fielding, composite, "computed HAV-F grade");

    HavfScore {
        hitting,
        approach,
        power,
        fielding,
        composite,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BattingProfile, FieldingProfile};
    use crate::percentile::build_percentile_table;
    use approx::assert_relative_eq;

    /// Population member i (0-based) with every statistic strictly increasing
    /// in i, so member ranks are fully predictable.
    fn graded_player(i: u32) -> PlayerStats {
        let step = i as f64;
        PlayerStats {
            batting: BattingProfile {
                avg: 0.250 + 0.030 * step,
                obp: 0.300 + 0.050 * step,
                slg: 0.380 + 0.070 * step,
                woba: 0.310 + 0.030 * step,
                iso: 0.080 + 0.050 * step,
                walk_rate: 0.06 + 0.03 * step,
                strikeout_rate: 0.15 + 0.05 * step,
                babip: 0.280 + 0.020 * step,
                home_run_rate: 0.01 + 0.01 * step,
            },
            fielding: FieldingProfile {
                fielding_pct: 0.950 + 0.015 * step,
                putouts: 60 + 20 * i,
                assists: 30 + 15 * i,
                errors: 5,
                games: 30,
            },
        }
    }

    #[test]
    fn composite_weights_sum_to_one() {
        assert_relative_eq!(
            HITTING_WEIGHT + APPROACH_WEIGHT + POWER_WEIGHT + FIELDING_WEIGHT,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn sub_weight_families_sum_to_one() {
        assert_relative_eq!(HITTING_SUBWEIGHTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(APPROACH_SUBWEIGHTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(POWER_SUBWEIGHTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(FIELDING_SUBWEIGHTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn middle_player_of_three_grades_at_one_third() {
        let pop: Vec<PlayerStats> = (0..3).map(graded_player).collect();
        let table = build_percentile_table(&pop);
        let score = compute_havf(&pop[1], &table);

        // Every stat ranks at 33.333; weights within each family sum to 1,
        // except approach where the inverted strikeout term ranks at 66.667:
        // A = 0.3·33.3 + 0.3·66.7 + 0.2·33.3 + 0.2·33.3 = 43.333 → 43.3
        assert_relative_eq!(score.hitting, 33.3, epsilon = 1e-9);
        assert_relative_eq!(score.approach, 43.3, epsilon = 1e-9);
        assert_relative_eq!(score.power, 33.3, epsilon = 1e-9);
        assert_relative_eq!(score.fielding, 33.3, epsilon = 1e-9);

        // Composite from the rounded sub-scores:
        // 0.35·33.3 + 0.25·43.3 + 0.25·33.3 + 0.15·33.3 = 35.8
        assert_relative_eq!(score.composite, 35.8, epsilon = 1e-9);
    }

    #[test]
    fn empty_population_grades_everything_neutral() {
        let table = build_percentile_table(&[]);
        let score = compute_havf(&graded_player(1), &table);
        assert_relative_eq!(score.hitting, 50.0, epsilon = 1e-9);
        assert_relative_eq!(score.approach, 50.0, epsilon = 1e-9);
        assert_relative_eq!(score.power, 50.0, epsilon = 1e-9);
        assert_relative_eq!(score.fielding, 50.0, epsilon = 1e-9);
        assert_relative_eq!(score.composite, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_games_fielder_degrades_without_panic() {
        let pop: Vec<PlayerStats> = (0..4).map(graded_player).collect();
        let table = build_percentile_table(&pop);

        let mut bench = graded_player(3);
        bench.fielding.games = 0; // derived stats fall back to 0.0
        let score = compute_havf(&bench, &table);

        // Derived stats rank at 0 against a population with positive values;
        // only the fielding-pct term survives.
        assert!(score.fielding < 60.0, "bench fielding grade too high: {}", score.fielding);
        assert!((0.0..=100.0).contains(&score.composite));
    }

    #[test]
    fn better_population_member_never_grades_lower() {
        let pop: Vec<PlayerStats> = (0..5).map(graded_player).collect();
        let table = build_percentile_table(&pop);
        let scores: Vec<HavfScore> = pop.iter().map(|p| compute_havf(p, &table)).collect();
        for pair in scores.windows(2) {
            assert!(
                pair[1].hitting >= pair[0].hitting,
                "hitting not monotone: {:?} then {:?}",
                pair[0],
                pair[1]
            );
            assert!(pair[1].power >= pair[0].power);
            assert!(pair[1].fielding >= pair[0].fielding);
        }
    }

    #[test]
    fn all_grades_stay_in_range() {
        // Sweep a grid of players, including degenerate ones, against a small
        // population: every sub-score and composite must stay inside [0, 100].
        let pop: Vec<PlayerStats> = (0..3).map(graded_player).collect();
        let table = build_percentile_table(&pop);
        for avg_step in 0..8 {
            for games in [0u32, 1, 30] {
                let mut p = graded_player(avg_step % 3);
                p.batting.avg = 0.150 + 0.030 * avg_step as f64;
                p.batting.iso = 0.0;
                p.fielding.games = games;
                let s = compute_havf(&p, &table);
                for (label, v) in [
                    ("hitting", s.hitting),
                    ("approach", s.approach),
                    ("power", s.power),
                    ("fielding", s.fielding),
                    ("composite", s.composite),
                ] {
                    assert!(
                        (0.0..=100.0).contains(&v),
                        "{} out of range for avg_step={} games={}: {}",
                        label,
                        avg_step,
                        games,
                        v
                    );
                }
            }
        }
    }

    #[test]
    fn one_decimal_rounding_applied() {
        let pop: Vec<PlayerStats> = (0..3).map(graded_player).collect();
        let table = build_percentile_table(&pop);
        let score = compute_havf(&pop[1], &table);
        for v in [score.hitting, score.approach, score.power, score.fielding, score.composite] {
            assert_relative_eq!(v * 10.0, (v * 10.0).round(), epsilon = 1e-9);
        }
    }
}
