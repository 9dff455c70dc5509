use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod config;

use config::Config;
use diamond_analytics::{
    calculate_conference_strength, project_rpi_shift, simulate_scheduling_impact, LeagueData,
    ProspectiveMatchup, SimulationOptions,
};

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let raw = std::fs::read_to_string(&config.data)
        .with_context(|| format!("failed to read league dataset {}", config.data))?;
    let league: LeagueData = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse league dataset {}", config.data))?;
    info!(
        season = %league.season,
        teams = league.teams.len(),
        games = league.games.len(),
        "league dataset loaded"
    );

    let matchups: Vec<ProspectiveMatchup> = match &config.schedule {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read schedule file {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse schedule file {}", path))?
        }
        None => Vec::new(),
    };

    let team = league.team(&config.team)?;
    let conference_id = config
        .conference
        .clone()
        .or_else(|| team.conference_id.clone());

    if let Some(cid) = conference_id {
        let strength = calculate_conference_strength(&league, &cid)?;
        info!(
            conference = %cid,
            rating = strength.rating,
            confidence = strength.confidence,
            cross_wins = strength.metrics.cross_conference.wins,
            cross_losses = strength.metrics.cross_conference.losses,
            top50_wins = strength.metrics.top50_wins,
            "conference strength"
        );
        for note in &strength.notes {
            info!(note = note.as_str(), "conference strength note");
        }
    } else {
        info!(team = %config.team, "team is independent; skipping conference rating");
    }

    let projection = project_rpi_shift(&league, &config.team, &matchups)?;
    info!(
        team = %config.team,
        baseline_rpi = projection.baseline_rpi,
        projected_rpi = projection.projected_rpi,
        rpi_delta = projection.rpi_delta,
        baseline_rank = projection.baseline_rank,
        projected_rank = projection.projected_rank,
        confidence = projection.confidence,
        "RPI projection"
    );
    for scenario in &projection.scenario_breakdown {
        info!(
            opponent = %scenario.opponent_id,
            win_probability = scenario.win_probability,
            opponent_rpi = scenario.opponent_rpi,
            rpi_contribution = scenario.rpi_contribution,
            "matchup scenario"
        );
    }
    for note in &projection.notes {
        info!(note = note.as_str(), "projection note");
    }

    let options = SimulationOptions {
        simulations: config.simulations,
        restrict_advanced: config.restrict_advanced,
        seed: config.seed,
    };
    let simulation = simulate_scheduling_impact(&league, &config.team, &matchups, &options)?;
    info!(
        trials = simulation.simulations_run,
        expected_added_wins = simulation.expected_added_wins,
        expected_added_losses = simulation.expected_added_losses,
        baseline_odds = simulation.baseline_postseason_odds,
        projected_odds = simulation.projected_postseason_odds,
        odds_delta = simulation.postseason_odds_delta,
        gated = simulation.gated,
        "schedule simulation"
    );
    for bucket in &simulation.distribution {
        info!(wins = bucket.wins, probability = bucket.probability, "win distribution");
    }
    for note in &simulation.notes {
        info!(note = note.as_str(), "simulation note");
    }

    Ok(())
}
