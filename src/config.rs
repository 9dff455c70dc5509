use clap::Parser;

/// College-baseball analytics runner: conference strength, RPI projection,
/// and schedule simulation over a league-season dataset.
#[derive(Parser, Debug, Clone)]
#[command(name = "diamond-analytics", version, about)]
pub struct Config {
    /// Path to the league-season dataset (JSON: season, teams, games)
    #[arg(long, env = "LEAGUE_DATA_PATH", default_value = "league.json")]
    pub data: String,

    /// Subject team identifier
    #[arg(long, env = "TEAM_ID")]
    pub team: String,

    /// Conference to rate (defaults to the subject team's own conference)
    #[arg(long, env = "CONFERENCE_ID")]
    pub conference: Option<String>,

    /// Path to a prospective-schedule file (JSON array of matchups)
    #[arg(long, env = "SCHEDULE_PATH")]
    pub schedule: Option<String>,

    /// Monte Carlo trial count
    #[arg(long, env = "SIMULATIONS", default_value = "1000")]
    pub simulations: u32,

    /// Restrict the simulator to the cheap closed-form mode
    #[arg(long, env = "RESTRICT_ADVANCED", default_value = "false")]
    pub restrict_advanced: bool,

    /// Fixed seed for reproducible simulation runs
    #[arg(long, env = "SIM_SEED")]
    pub seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.team.trim().is_empty() {
            anyhow::bail!("team identifier must not be empty");
        }
        if self.simulations > 1_000_000 {
            anyhow::bail!("simulations must be at most 1,000,000");
        }
        Ok(())
    }
}
