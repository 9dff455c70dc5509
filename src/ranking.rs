//! Before/after conference standings.
//!
//! Re-ranks a conference with one team's RPI replaced by a projected value,
//! returning a row for every member so callers can see conference-wide rank
//! churn from a single team's change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::league::LeagueData;
use crate::rpi;

/// One conference team's baseline and projected standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRankingRow {
    pub team_id: String,
    pub baseline_rank: usize,
    pub projected_rank: usize,
    pub baseline_rpi: f64,
    pub projected_rpi: f64,
}

/// Rank every conference member by RPI before and after replacing the
/// subject team's rating with `projected_rpi`.
///
/// Equal ratings are ordered by team id, so the result never depends on the
/// iteration order of the input data. Rows come back in baseline-rank order.
pub fn build_conference_ranking(
    data: &LeagueData,
    conference_id: &str,
    team_id: &str,
    projected_rpi: f64,
) -> Result<Vec<ProjectedRankingRow>, AnalyticsError> {
    let members = data.conference_members(conference_id)?;
    if !members.iter().any(|t| t.team_id == team_id) {
        return Err(AnalyticsError::InvalidInput(format!(
            "team {} is not a member of conference {}",
            team_id, conference_id
        )));
    }

    let baseline: Vec<(String, f64)> = members
        .iter()
        .map(|t| (t.team_id.clone(), rpi::effective_rpi(data, t)))
        .collect();
    let projected: Vec<(String, f64)> = baseline
        .iter()
        .map(|(id, rating)| {
            let value = if id == team_id { projected_rpi } else { *rating };
            (id.clone(), value)
        })
        .collect();

    let baseline_ranks = rank_positions(&baseline);
    let projected_ranks = rank_positions(&projected);

    let mut rows: Vec<ProjectedRankingRow> = baseline
        .iter()
        .zip(projected.iter())
        .map(|((id, baseline_rpi), (_, projected_rpi))| ProjectedRankingRow {
            team_id: id.clone(),
            baseline_rank: baseline_ranks[id],
            projected_rank: projected_ranks[id],
            baseline_rpi: *baseline_rpi,
            projected_rpi: *projected_rpi,
        })
        .collect();
    rows.sort_by_key(|r| r.baseline_rank);
    Ok(rows)
}

/// Descending-RPI rank positions (1 = best), ties broken by team id.
fn rank_positions(entries: &[(String, f64)]) -> HashMap<String, usize> {
    let mut ordered: Vec<&(String, f64)> = entries.iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (id, _))| (id.clone(), i + 1))
        .collect()
}
