//! Monte Carlo simulation of prospective schedule outcomes.
//!
//! Each trial draws an independent Bernoulli outcome per matchup from its
//! stated win probability, and the trial's win total is bucketed into a
//! discrete distribution. The random stream is explicit and seedable: a fixed
//! seed reproduces a simulation exactly, and concurrent simulations for
//! different teams never share a generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalyticsError;
use crate::league::LeagueData;
use crate::models::ProspectiveMatchup;

// ── Simulation policy ────────────────────────────────────────────────────────

/// Default trial count.
pub const DEFAULT_SIMULATIONS: u32 = 1_000;
/// Trial count at which the confidence factor saturates.
const FULL_CONFIDENCE_TRIALS: f64 = 1_000.0;

/// End-of-season winning percentage at which postseason odds cross 50%.
/// The conference cutoff is a tunable policy value, not a league law.
pub const QUALIFYING_WIN_PCT: f64 = 0.55;
/// Steepness of the qualification curve around the cutoff.
pub const QUALIFICATION_STEEPNESS: f64 = 12.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Number of Monte Carlo trials.
    pub simulations: u32,
    /// Gate the simulator to the cheap closed-form mode (no trials).
    pub restrict_advanced: bool,
    /// Fixed seed for reproducible runs; None draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            restrict_advanced: false,
            seed: None,
        }
    }
}

/// One bar of the discrete win-count distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinBucket {
    pub wins: u32,
    /// Share of trials landing on this win total.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSimulationResult {
    pub team_id: String,
    pub season: String,
    pub simulations_run: u32,
    pub expected_added_wins: f64,
    pub expected_added_losses: f64,
    pub baseline_postseason_odds: f64,
    pub projected_postseason_odds: f64,
    pub postseason_odds_delta: f64,
    /// Empty when the run was gated.
    pub distribution: Vec<WinBucket>,
    /// True when preconditions suppressed the full simulation.
    pub gated: bool,
    pub confidence: f64,
    pub notes: Vec<String>,
}

/// Simulate how a prospective schedule shifts a team's postseason odds.
///
/// Gated (empty distribution, confidence 0, explanatory note) when the
/// matchup list is empty, the trial count is zero, or `restrict_advanced`
/// suppresses the full simulation — the result reports the gate instead of
/// fabricating a distribution.
pub fn simulate_scheduling_impact(
    data: &LeagueData,
    team_id: &str,
    matchups: &[ProspectiveMatchup],
    options: &SimulationOptions,
) -> Result<ScheduleSimulationResult, AnalyticsError> {
    let team = data.team(team_id)?;
    validate_probabilities(matchups)?;

    let wins = team.wins as f64;
    let losses = team.losses as f64;
    let baseline_odds = postseason_odds(wins, losses);

    let gate_note = if matchups.is_empty() {
        Some("no prospective matchups supplied; simulation skipped".to_string())
    } else if options.simulations == 0 {
        Some("trial count is zero; simulation skipped".to_string())
    } else if options.restrict_advanced {
        Some(
            "advanced simulation restricted; reporting closed-form expectation only"
                .to_string(),
        )
    } else {
        None
    };

    if let Some(note) = gate_note {
        // Cheap mode: linearity of expectation gives the record shift without
        // any trials; the odds use the expected record point estimate.
        let expected_added_wins: f64 = matchups.iter().map(|m| m.win_probability).sum();
        let expected_added_losses = matchups.len() as f64 - expected_added_wins;
        let projected_odds =
            postseason_odds(wins + expected_added_wins, losses + expected_added_losses);
        debug!(team = team_id, note = note.as_str(), "simulation gated");
        return Ok(ScheduleSimulationResult {
            team_id: team_id.to_string(),
            season: data.season.clone(),
            simulations_run: 0,
            expected_added_wins,
            expected_added_losses,
            baseline_postseason_odds: baseline_odds,
            projected_postseason_odds: projected_odds,
            postseason_odds_delta: projected_odds - baseline_odds,
            distribution: Vec::new(),
            gated: true,
            confidence: 0.0,
            notes: vec![note],
        });
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = matchups.len();
    let mut counts = vec![0u64; n + 1];
    for _ in 0..options.simulations {
        let mut trial_wins = 0usize;
        for m in matchups {
            if rng.gen::<f64>() < m.win_probability {
                trial_wins += 1;
            }
        }
        counts[trial_wins] += 1;
    }

    let trials = options.simulations as f64;
    let distribution: Vec<WinBucket> = counts
        .iter()
        .enumerate()
        .map(|(w, c)| WinBucket {
            wins: w as u32,
            probability: *c as f64 / trials,
        })
        .collect();

    let expected_added_wins: f64 = distribution
        .iter()
        .map(|b| b.wins as f64 * b.probability)
        .sum();
    let expected_added_losses = n as f64 - expected_added_wins;

    // Map the whole distribution through the qualification curve rather than
    // its mean alone, so a lumpy schedule is handled honestly.
    let projected_odds: f64 = distribution
        .iter()
        .map(|b| {
            b.probability * postseason_odds(wins + b.wins as f64, losses + (n - b.wins as usize) as f64)
        })
        .sum();

    let confidence = (trials / FULL_CONFIDENCE_TRIALS).min(1.0).sqrt();

    debug!(
        team = team_id,
        trials = options.simulations,
        expected_added_wins,
        projected_odds,
        "schedule simulation complete"
    );

    Ok(ScheduleSimulationResult {
        team_id: team_id.to_string(),
        season: data.season.clone(),
        simulations_run: options.simulations,
        expected_added_wins,
        expected_added_losses,
        baseline_postseason_odds: baseline_odds,
        projected_postseason_odds: projected_odds,
        postseason_odds_delta: projected_odds - baseline_odds,
        distribution,
        gated: false,
        confidence,
        notes: Vec::new(),
    })
}

/// Postseason-qualification odds for a record: a logistic curve on winning
/// percentage centered at the qualification cutoff. A team with no games
/// sits at even odds.
pub fn postseason_odds(wins: f64, losses: f64) -> f64 {
    let games = wins + losses;
    if games <= 0.0 {
        return 0.5;
    }
    let win_pct = wins / games;
    sigmoid(QUALIFICATION_STEEPNESS * (win_pct - QUALIFYING_WIN_PCT))
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn validate_probabilities(matchups: &[ProspectiveMatchup]) -> Result<(), AnalyticsError> {
    for m in matchups {
        if !(0.0..=1.0).contains(&m.win_probability) {
            return Err(AnalyticsError::InvalidInput(format!(
                "win probability {} for opponent {} outside [0, 1]",
                m.win_probability, m.opponent_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TeamProfile, Venue};
    use approx::assert_relative_eq;

    fn team(id: &str, wins: u32, losses: u32) -> TeamProfile {
        TeamProfile {
            team_id: id.into(),
            name: id.into(),
            conference_id: Some("SEC".into()),
            wins,
            losses,
            quad1_wins: 0,
            quad2_wins: 0,
            quad3_wins: 0,
            quad4_wins: 0,
            quad1_losses: 0,
            quad2_losses: 0,
            quad3_losses: 0,
            quad4_losses: 0,
            rpi: Some(0.580),
            strength_of_schedule: None,
            net_rating: None,
            run_diff_per_game: 0.5,
        }
    }

    fn league() -> LeagueData {
        LeagueData {
            season: "2025".into(),
            teams: vec![team("TEAM_X", 20, 10)],
            games: Vec::new(),
        }
    }

    fn matchup(p: f64) -> ProspectiveMatchup {
        ProspectiveMatchup {
            opponent_id: "OPP".into(),
            venue: Venue::Home,
            win_probability: p,
            opponent_win_pct: None,
        }
    }

    fn seeded(simulations: u32, seed: u64) -> SimulationOptions {
        SimulationOptions {
            simulations,
            restrict_advanced: false,
            seed: Some(seed),
        }
    }

    #[test]
    fn empty_schedule_is_gated_with_empty_distribution() {
        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &[], &SimulationOptions::default())
                .unwrap();
        assert!(result.gated);
        assert_relative_eq!(result.confidence, 0.0, epsilon = 1e-12);
        assert!(result.distribution.is_empty());
        assert_eq!(result.simulations_run, 0);
        assert_relative_eq!(result.postseason_odds_delta, 0.0, epsilon = 1e-12);
        assert!(!result.notes.is_empty());
    }

    #[test]
    fn zero_trial_request_is_gated() {
        let result = simulate_scheduling_impact(
            &league(),
            "TEAM_X",
            &[matchup(0.6)],
            &seeded(0, 7),
        )
        .unwrap();
        assert!(result.gated);
        assert!(result.notes.iter().any(|n| n.contains("zero")));
    }

    #[test]
    fn restricted_mode_reports_closed_form_expectation() {
        let schedule = vec![matchup(0.8), matchup(0.5), matchup(0.3)];
        let options = SimulationOptions {
            simulations: 500,
            restrict_advanced: true,
            seed: Some(11),
        };
        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &options).unwrap();
        assert!(result.gated);
        assert!(result.distribution.is_empty());
        assert_relative_eq!(result.expected_added_wins, 1.6, epsilon = 1e-12);
        assert_relative_eq!(result.expected_added_losses, 1.4, epsilon = 1e-12);
        assert_relative_eq!(result.confidence, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_team_is_rejected() {
        assert!(matches!(
            simulate_scheduling_impact(
                &league(),
                "GHOST",
                &[matchup(0.5)],
                &SimulationOptions::default()
            ),
            Err(AnalyticsError::TeamNotFound(_))
        ));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        assert!(matches!(
            simulate_scheduling_impact(
                &league(),
                "TEAM_X",
                &[matchup(-0.1)],
                &SimulationOptions::default()
            ),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn certain_outcomes_produce_a_degenerate_distribution() {
        let schedule = vec![matchup(1.0), matchup(1.0), matchup(0.0)];
        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(200, 3)).unwrap();
        assert_relative_eq!(result.expected_added_wins, 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.expected_added_losses, 1.0, epsilon = 1e-12);
        let two_wins = result.distribution.iter().find(|b| b.wins == 2).unwrap();
        assert_relative_eq!(two_wins.probability, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn distribution_probabilities_sum_to_one() {
        let schedule = vec![matchup(0.7), matchup(0.4), matchup(0.55), matchup(0.2)];
        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(2_000, 42)).unwrap();
        let total: f64 = result.distribution.iter().map(|b| b.probability).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        assert_eq!(result.distribution.len(), schedule.len() + 1);
    }

    #[test]
    fn fixed_seed_reproduces_the_run_exactly() {
        let schedule = vec![matchup(0.65), matchup(0.45), matchup(0.8)];
        let a = simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(1_000, 99))
            .unwrap();
        let b = simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(1_000, 99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empirical_mean_converges_to_the_closed_form_expectation() {
        // Linearity of expectation: mean added wins must approach Σpᵢ as the
        // trial count grows, regardless of the draws themselves.
        let probs = [0.9, 0.7, 0.5, 0.3, 0.6];
        let schedule: Vec<ProspectiveMatchup> = probs.iter().map(|p| matchup(*p)).collect();
        let expectation: f64 = probs.iter().sum();

        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(10_000, 1234))
                .unwrap();
        assert!(
            (result.expected_added_wins - expectation).abs() < 0.05,
            "empirical mean {} strayed from expectation {}",
            result.expected_added_wins,
            expectation
        );
    }

    #[test]
    fn favorable_schedule_raises_postseason_odds() {
        let schedule: Vec<ProspectiveMatchup> = (0..6).map(|_| matchup(0.9)).collect();
        let result =
            simulate_scheduling_impact(&league(), "TEAM_X", &schedule, &seeded(2_000, 5)).unwrap();
        assert!(
            result.postseason_odds_delta > 0.0,
            "odds delta {} should be positive",
            result.postseason_odds_delta
        );
    }

    #[test]
    fn qualification_curve_is_monotone_in_record() {
        assert!(postseason_odds(24.0, 6.0) > postseason_odds(15.0, 15.0));
        assert!(postseason_odds(15.0, 15.0) > postseason_odds(6.0, 24.0));
        assert_relative_eq!(postseason_odds(0.0, 0.0), 0.5, epsilon = 1e-12);
        // At the cutoff itself, odds sit at 50%.
        assert_relative_eq!(postseason_odds(55.0, 45.0), 0.5, epsilon = 1e-12);
    }
}
